use anyhow::Result;
use chrono::Local;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nosh_core::engine::Engine;

use super::helpers::{fmt_macros, no_neg_zero, parse_date, truncate};

pub(crate) fn cmd_day(engine: &Engine, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let day = engine.day(date);

    if json {
        println!("{}", serde_json::to_string_pretty(&day)?);
        return Ok(());
    }

    if day.is_empty() {
        eprintln!("No entries for {date}");
        process::exit(2);
    }

    println!("=== {date} ===\n");

    for (index, item) in day.items.iter().enumerate() {
        let name = truncate(&item.name, 35);
        let time = &item.time;
        let source = item.source;
        let line = fmt_macros(item.calories, item.protein, item.carbs, item.fat);
        println!("  [{index}] {name} — {time} — {line} ({source})");
    }

    let totals = fmt_macros(day.calories, day.protein, day.carbs, day.fat);
    println!("\n  TOTAL: {totals}");

    if let Some(profile) = engine.profile() {
        let t = profile.targets;
        let target = t.target;
        let protein = t.protein;
        let carbs = t.carbs;
        let fat = t.fat;
        println!("  TARGET: {target} kcal | P:{protein}g C:{carbs}g F:{fat}g");
        #[allow(clippy::cast_precision_loss)]
        let remaining = fmt_macros(
            target as f64 - day.calories,
            protein as f64 - day.protein,
            carbs as f64 - day.carbs,
            fat as f64 - day.fat,
        );
        println!("  REMAINING: {remaining}");
    }

    Ok(())
}

pub(crate) fn cmd_history(engine: &Engine, days: u32, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Carbs")]
        carbs: String,
        #[tabled(rename = "Fat")]
        fat: String,
        #[tabled(rename = "Items")]
        items: usize,
    }

    let today = Local::now().date_naive();
    let mut records = Vec::new();

    for i in 0..days {
        let date = today - chrono::Duration::days(i64::from(i));
        records.push(engine.day(date));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.iter().all(nosh_core::models::DayRecord::is_empty) {
        eprintln!("No entries in the last {days} days");
        process::exit(2);
    }

    let rows: Vec<HistoryRow> = records
        .iter()
        .map(|day| {
            let cal = no_neg_zero(day.calories);
            let p = no_neg_zero(day.protein);
            let c = no_neg_zero(day.carbs);
            let f = no_neg_zero(day.fat);
            HistoryRow {
                date: day.date.clone(),
                calories: format!("{cal:.0}"),
                protein: format!("{p:.0}g"),
                carbs: format!("{c:.0}g"),
                fat: format!("{f:.0}g"),
                items: day.items.len(),
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}
