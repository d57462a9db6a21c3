use crate::commands::load_catalog;
use crate::commands::show_total::format_total;
use crate::error::CliResult;
use reward_catalog::QueryOptions;
use std::path::PathBuf;

pub fn execute(manifest: PathBuf) -> CliResult<()> {
    println!("📋 Building catalog from {}", manifest.display());
    let catalog = load_catalog(&manifest)?;
    let currency = catalog.primary_currency();

    println!("\n📦 Tables:");
    for count in catalog.table_counts() {
        println!(
            "  {} ({}): {} entries, {} priced in {}",
            count.table_key, count.reward_type, count.rows, count.primary_priced, currency
        );
    }

    println!("\n🏷️  Types:");
    for reward_type in catalog.declared_types() {
        let all = catalog.by_type(reward_type, QueryOptions::default());
        let primary = catalog.by_type(reward_type, QueryOptions::primary_currency_only());
        println!(
            "  {}: {} entries, {} priced in {}",
            reward_type,
            all.len(),
            primary.len(),
            currency
        );
    }

    println!("\n💰 Totals:");
    for (label, total) in catalog.currency_totals() {
        println!("  {}: {}", label, format_total(*total));
    }

    println!(
        "\n✅ {} entries, {} {} total",
        catalog.len(),
        catalog.total_primary_currency_cost(),
        currency
    );

    Ok(())
}
