use crate::config::{manifest_dir, CatalogManifest};
use crate::error::CliResult;
use reward_catalog::Catalog;
use std::path::Path;

pub mod check_manifest;
pub mod export_entries;
pub mod list_entries;
pub mod show_total;
pub mod summarize_catalog;

/// Load a manifest, its tables, and build the catalog
pub fn load_catalog(manifest_path: &Path) -> CliResult<Catalog> {
    let manifest = CatalogManifest::load(manifest_path)?;
    let store = manifest.load_store(&manifest_dir(manifest_path))?;
    let catalog = Catalog::from_store(&manifest.schemas, &store, &manifest.catalog)?;
    Ok(catalog)
}
