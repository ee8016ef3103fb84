use std::path::Path;

use anyhow::{Context, Result};

use nosh_core::analysis::FoodAnalyzer;
use nosh_core::engine::Engine;
use nosh_core::models::{FoodItem, NutritionFacts};

use super::helpers::{fmt_macros, parse_date};

pub(crate) fn cmd_log(
    engine: &Engine,
    analyzer: &dyn FoodAnalyzer,
    text: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    engine.select_date(parse_date(date)?);
    let item = engine.record_from_text(analyzer, text)?;
    print_logged(engine, &item, json)
}

pub(crate) fn cmd_photo(
    engine: &Engine,
    analyzer: &dyn FoodAnalyzer,
    path: &Path,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    engine.select_date(parse_date(date)?);
    let image = std::fs::read(path)
        .with_context(|| format!("Failed to read image: {}", path.display()))?;
    let item = engine.record_from_image(analyzer, &image)?;
    print_logged(engine, &item, json)
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_add(
    engine: &Engine,
    name: &str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    engine.select_date(parse_date(date)?);
    let item = engine.record_manual(NutritionFacts {
        food_item: name.to_string(),
        calories,
        protein,
        carbs,
        fat,
    })?;
    print_logged(engine, &item, json)
}

pub(crate) fn cmd_remove(
    engine: &Engine,
    index: usize,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    engine.select_date(parse_date(date)?);
    let day = engine.remove_item(index)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&day)?);
        return Ok(());
    }

    let date = &day.date;
    let count = day.items.len();
    let totals = fmt_macros(day.calories, day.protein, day.carbs, day.fat);
    println!("Removed item {index} from {date}. {count} left — {totals}");
    Ok(())
}

fn print_logged(engine: &Engine, item: &FoodItem, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
        return Ok(());
    }

    let name = &item.name;
    let line = fmt_macros(item.calories, item.protein, item.carbs, item.fat);
    println!("Logged: {name} — {line}");

    let day = engine.selected_day();
    let totals = fmt_macros(day.calories, day.protein, day.carbs, day.fat);
    let date = &day.date;
    println!("{date} total: {totals}");

    if let Some(profile) = engine.profile() {
        #[allow(clippy::cast_precision_loss)]
        let remaining = profile.targets.target as f64 - day.calories;
        println!("Remaining: {remaining:.0} kcal");
    }
    Ok(())
}
