use crate::config::{manifest_dir, CatalogManifest};
use crate::error::CliResult;
use reward_catalog::{Catalog, SchemaRegistry};
use std::path::PathBuf;

pub fn execute(manifest_path: PathBuf) -> CliResult<()> {
    println!("🔍 Checking {}", manifest_path.display());

    let manifest = CatalogManifest::load(&manifest_path)?;
    let store = manifest.load_store(&manifest_dir(&manifest_path))?;
    println!("✅ Loaded {} reference tables", store.len());

    let registry = SchemaRegistry::new(&manifest.schemas, &store)?;
    println!("✅ Registered {} schemas", registry.len());

    let lints = registry.lint();
    if lints.is_empty() {
        println!("✅ Every schema field matches a table header");
    } else {
        println!("⚠️  {} schema fields do not match a header:", lints.len());
        for lint in &lints {
            println!("  {}: {} '{}'", lint.table, lint.role, lint.field);
        }
    }

    let unused: Vec<&str> = store
        .keys()
        .filter(|key| !manifest.schemas.iter().any(|schema| schema.table == *key))
        .collect();
    if !unused.is_empty() {
        println!("⚠️  Tables without a schema: {}", unused.join(", "));
    }

    let catalog = Catalog::build(&registry, &manifest.catalog)?;
    println!(
        "✅ Catalog builds: {} entries, {} {} total",
        catalog.len(),
        catalog.total_primary_currency_cost(),
        catalog.primary_currency()
    );

    Ok(())
}
