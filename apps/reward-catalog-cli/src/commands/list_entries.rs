use crate::commands::load_catalog;
use crate::error::CliResult;
use reward_catalog::{QueryOptions, RewardEntry};
use std::path::PathBuf;

pub fn execute(
    manifest: PathBuf,
    reward_type: String,
    primary_only: bool,
    json: bool,
) -> CliResult<()> {
    let catalog = load_catalog(&manifest)?;
    let options = QueryOptions {
        primary_currency_only: primary_only,
    };
    let entries = catalog.by_type(&reward_type, options);
    let hint = undeclared_type_hint(catalog.declared_types(), &reward_type);

    if json {
        // stdout stays valid JSON
        if let Some(hint) = &hint {
            eprintln!("{}", hint);
        }
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if let Some(hint) = hint {
        println!("{}", hint);
        return Ok(());
    }

    for entry in &entries {
        println!("{}", format_entry(entry));
    }
    println!("\n{} {} entries", entries.len(), reward_type);

    Ok(())
}

fn undeclared_type_hint(declared: &[String], reward_type: &str) -> Option<String> {
    if declared.iter().any(|declared| declared == reward_type) {
        return None;
    }
    Some(format!(
        "No type '{}' is declared in this catalog\nDeclared types: {}",
        reward_type,
        declared.join(", ")
    ))
}

fn format_entry(entry: &RewardEntry) -> String {
    let cost = match &entry.cost {
        Some(cost) => format!("{} ({})", cost.display, cost.currency),
        None => "—".to_string(),
    };

    let mut line = format!("{}  {}  {}", entry.id, entry.name, cost);
    if let Some(phase) = &entry.phase {
        line.push_str(&format!("  phase {}", phase));
    }
    line
}
