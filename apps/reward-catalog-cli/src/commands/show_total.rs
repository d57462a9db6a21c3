use crate::commands::load_catalog;
use crate::error::CliResult;
use std::path::PathBuf;

pub fn execute(manifest: PathBuf, currency: Option<String>) -> CliResult<()> {
    let catalog = load_catalog(&manifest)?;

    match currency {
        Some(currency) => {
            println!("{} {}", format_total(catalog.total_for_currency(&currency)), currency);
        }
        None => {
            println!(
                "{} {}",
                catalog.total_primary_currency_cost(),
                catalog.primary_currency()
            );
        }
    }

    Ok(())
}

/// A currency total, or a marker for one that overflowed
pub fn format_total(total: Option<u64>) -> String {
    match total {
        Some(total) => total.to_string(),
        None => "overflow".to_string(),
    }
}
