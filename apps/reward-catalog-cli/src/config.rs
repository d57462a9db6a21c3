use crate::error::{CliError, CliResult};
use reward_catalog::{CatalogConfig, TableSchema};
use reward_catalog_tables::{read_reference_table, ReferenceStore};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Catalog manifest file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogManifest {
    /// Build options; every key is optional
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Reference tables to load
    pub tables: Vec<TableSource>,

    /// One schema per table, in catalog order
    pub schemas: Vec<TableSchema>,
}

/// Where to find one reference table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSource {
    /// Key the schemas refer to
    pub key: String,

    /// Path to a `.csv` or `.json` table, relative to the manifest
    pub file: PathBuf,

    /// Section heading for CSV tables (JSON tables carry their own)
    #[serde(default)]
    pub heading: Option<String>,
}

impl CatalogManifest {
    /// Read a manifest from a YAML file
    pub fn load(path: &Path) -> CliResult<Self> {
        let file = File::open(path)?;
        let manifest: CatalogManifest = serde_yaml::from_reader(file)?;

        if manifest.schemas.is_empty() {
            return Err(CliError::InvalidConfig(format!(
                "{} declares no schemas",
                path.display()
            )));
        }

        Ok(manifest)
    }

    /// Load every listed table, resolving paths against `base_dir`
    pub fn load_store(&self, base_dir: &Path) -> CliResult<ReferenceStore> {
        let mut store = ReferenceStore::new();

        for source in &self.tables {
            let path = base_dir.join(&source.file);
            debug!("Loading table '{}' from {}", source.key, path.display());
            let table = read_reference_table(&path, source.heading.clone())?;
            store.insert(source.key.clone(), table)?;
        }

        Ok(store)
    }
}

/// Directory manifest-relative paths are resolved against
pub fn manifest_dir(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reward_catalog::{CostParseMode, IdCollisionPolicy};
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
catalog:
  cost_parse_mode: first_digit_run
  id_collision_policy: reject
tables:
  - key: mounts
    file: tables/mounts.csv
    heading: Mounts
schemas:
  - table: mounts
    name_field: Mount
    cost_field: "Bronze*"
    phase_field: Phase
    category: collectibles
    type: mounts
"#;

    #[test]
    fn test_load_manifest_and_tables() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("tables")).unwrap();
        fs::write(
            dir.path().join("tables/mounts.csv"),
            "Mount,Phase,Bronze*\nReins of the Ashplague Fel Bat,1,\"10,000\"\n",
        )
        .unwrap();
        let manifest_path = dir.path().join("catalog.yaml");
        fs::write(&manifest_path, MANIFEST).unwrap();

        let manifest = CatalogManifest::load(&manifest_path).unwrap();
        assert_eq!(manifest.catalog.primary_currency, "Bronze");
        assert_eq!(manifest.catalog.cost_parse_mode, CostParseMode::FirstDigitRun);
        assert_eq!(manifest.catalog.id_collision_policy, IdCollisionPolicy::Reject);
        assert_eq!(manifest.schemas[0].cost_field.as_deref(), Some("Bronze*"));
        assert_eq!(manifest.schemas[0].reward_type, "mounts");

        let store = manifest
            .load_store(&manifest_dir(&manifest_path))
            .unwrap();
        let table = store.get("mounts").unwrap();
        assert_eq!(table.heading.as_deref(), Some("Mounts"));
        assert_eq!(table.rows[0].get("Bronze*"), Some("10,000"));
    }

    #[test]
    fn test_manifest_without_schemas_rejected() {
        let dir = TempDir::new().unwrap();
        let manifest_path = dir.path().join("catalog.yaml");
        fs::write(&manifest_path, "tables: []\nschemas: []\n").unwrap();

        let result = CatalogManifest::load(&manifest_path);
        assert!(matches!(result, Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn test_manifest_dir_of_bare_file_name() {
        assert_eq!(manifest_dir(Path::new("catalog.yaml")), PathBuf::from(""));
        assert_eq!(
            manifest_dir(Path::new("data/catalog.yaml")),
            PathBuf::from("data")
        );
    }
}
