use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;

use nosh_core::engine::Engine;

use super::helpers::json_error;

pub(crate) fn cmd_export(engine: &Engine, file: Option<PathBuf>, json: bool) -> Result<()> {
    let snapshot = engine.export_snapshot();
    let path = file.unwrap_or_else(|| {
        let date = Local::now().date_naive();
        PathBuf::from(format!("nosh-backup-{date}.json"))
    });

    let payload = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(&path, payload)
        .with_context(|| format!("Failed to write backup: {}", path.display()))?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "path": path,
                "days": snapshot.ledger.len(),
                "items": snapshot.ledger.item_count(),
                "profile_included": snapshot.profile.is_some(),
            })
        );
    } else {
        let days = snapshot.ledger.len();
        let items = snapshot.ledger.item_count();
        let path = path.display();
        println!("Exported {days} days ({items} items) to {path}");
    }
    Ok(())
}

pub(crate) fn cmd_import(engine: &Engine, path: &Path, json: bool) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read backup: {}", path.display()))?;

    let outcome = match engine.import_snapshot(&raw) {
        Ok(outcome) => outcome,
        Err(err) => {
            if json {
                println!("{}", json_error(&err.to_string()));
                std::process::exit(1);
            }
            return Err(err.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("Import complete.\n");
        println!("  Days imported:  {}", outcome.days_imported);
        println!("  Items imported: {}", outcome.items_imported);
        if outcome.profile_imported {
            println!("  Profile replaced.");
        } else {
            println!("  Profile untouched (not in backup).");
        }
    }
    Ok(())
}

pub(crate) fn cmd_reset(engine: &Engine, yes: bool) -> Result<()> {
    if !yes {
        bail!("This permanently deletes your profile and ledger. Pass --yes to confirm.");
    }
    engine.reset()?;
    println!("All data cleared.");
    Ok(())
}
