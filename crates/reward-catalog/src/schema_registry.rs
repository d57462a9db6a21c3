/*!
# Table Schema Registry

Declarative mapping from reference tables to catalog entries.

A [`TableSchema`] names the columns of one reference table that hold an
entry's name, cost, and pass-through fields. [`SchemaRegistry::new`] pairs
every schema with its table up front; a schema naming a table the store does
not have fails here, before any row is normalized.
*/

use reward_catalog_tables::{ReferenceStore, ReferenceTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while registering schemas
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Schema references missing reference table '{0}'")]
    MissingTable(String),

    #[error("More than one schema registered for reference table '{0}'")]
    DuplicateSchema(String),

    #[error("Invalid schema for table '{table}': {reason}")]
    InvalidSchema { table: String, reason: String },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// How to read one reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Key of the reference table in the store
    pub table: String,

    /// Section label; falls back to the table's own heading
    #[serde(default)]
    pub heading: Option<String>,

    /// Column holding the display name
    pub name_field: String,

    #[serde(default)]
    pub cost_field: Option<String>,

    /// Currency label for `cost_field`; inferred from the field name when absent
    #[serde(default)]
    pub cost_currency: Option<String>,

    #[serde(default)]
    pub phase_field: Option<String>,

    #[serde(default)]
    pub source_field: Option<String>,

    #[serde(default)]
    pub requirement_field: Option<String>,

    #[serde(default)]
    pub achievement_field: Option<String>,

    pub category: String,

    #[serde(rename = "type")]
    pub reward_type: String,
}

impl TableSchema {
    /// Minimal schema: table, name column, category and type
    pub fn new(
        table: impl Into<String>,
        name_field: impl Into<String>,
        category: impl Into<String>,
        reward_type: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            heading: None,
            name_field: name_field.into(),
            cost_field: None,
            cost_currency: None,
            phase_field: None,
            source_field: None,
            requirement_field: None,
            achievement_field: None,
            category: category.into(),
            reward_type: reward_type.into(),
        }
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    pub fn with_cost(mut self, field: impl Into<String>, currency: Option<&str>) -> Self {
        self.cost_field = Some(field.into());
        self.cost_currency = currency.map(str::to_string);
        self
    }

    pub fn with_phase(mut self, field: impl Into<String>) -> Self {
        self.phase_field = Some(field.into());
        self
    }

    pub fn with_source(mut self, field: impl Into<String>) -> Self {
        self.source_field = Some(field.into());
        self
    }

    pub fn with_requirement(mut self, field: impl Into<String>) -> Self {
        self.requirement_field = Some(field.into());
        self
    }

    pub fn with_achievement(mut self, field: impl Into<String>) -> Self {
        self.achievement_field = Some(field.into());
        self
    }

    /// Every column name this schema reads, with the role it plays
    pub fn mapped_fields(&self) -> Vec<(&'static str, &str)> {
        let optional = [
            ("cost_field", &self.cost_field),
            ("phase_field", &self.phase_field),
            ("source_field", &self.source_field),
            ("requirement_field", &self.requirement_field),
            ("achievement_field", &self.achievement_field),
        ];

        std::iter::once(("name_field", self.name_field.as_str()))
            .chain(
                optional
                    .into_iter()
                    .filter_map(|(role, field)| field.as_deref().map(|f| (role, f))),
            )
            .collect()
    }

    fn validate(&self) -> RegistryResult<()> {
        let required = [
            ("name_field", &self.name_field),
            ("category", &self.category),
            ("type", &self.reward_type),
        ];
        for (what, value) in required {
            if value.trim().is_empty() {
                return Err(RegistryError::InvalidSchema {
                    table: self.table.clone(),
                    reason: format!("{} must not be empty", what),
                });
            }
        }
        Ok(())
    }
}

/// A schema paired with the table it reads
#[derive(Debug, Clone, Copy)]
pub struct RegisteredTable<'a> {
    pub schema: &'a TableSchema,
    pub table: &'a ReferenceTable,
}

impl<'a> RegisteredTable<'a> {
    /// Key of the reference table
    pub fn key(&self) -> &'a str {
        &self.schema.table
    }

    /// Schema heading, else the table's heading
    pub fn section_title(&self) -> Option<&'a str> {
        self.schema
            .heading
            .as_deref()
            .or(self.table.heading.as_deref())
    }
}

/// A schema field that names a column the table's headers do not have
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLint {
    pub table: String,
    pub role: &'static str,
    pub field: String,
}

/// Schemas paired with their reference tables, in registration order
#[derive(Debug)]
pub struct SchemaRegistry<'a> {
    entries: Vec<RegisteredTable<'a>>,
}

impl<'a> SchemaRegistry<'a> {
    /// Pair every schema with its table.
    ///
    /// # Errors
    ///
    /// * `InvalidSchema` - A schema has an empty name field, category, or type
    /// * `DuplicateSchema` - Two schemas name the same table
    /// * `MissingTable` - A schema names a table the store does not have
    pub fn new(schemas: &'a [TableSchema], store: &'a ReferenceStore) -> RegistryResult<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(schemas.len());

        for schema in schemas {
            schema.validate()?;

            if !seen.insert(schema.table.as_str()) {
                return Err(RegistryError::DuplicateSchema(schema.table.clone()));
            }

            let table = store
                .get(&schema.table)
                .ok_or_else(|| RegistryError::MissingTable(schema.table.clone()))?;

            debug!(
                "Registered schema for table '{}' ({} rows, type '{}')",
                schema.table,
                table.row_count(),
                schema.reward_type
            );
            entries.push(RegisteredTable { schema, table });
        }

        let registry = Self { entries };
        for lint in registry.lint() {
            warn!(
                "Table '{}': {} '{}' is not among its headers",
                lint.table, lint.role, lint.field
            );
        }

        Ok(registry)
    }

    /// Schema fields that do not match any header exactly.
    ///
    /// These are not errors: rows missing a mapped column fall back per field.
    pub fn lint(&self) -> Vec<SchemaLint> {
        self.entries
            .iter()
            .flat_map(|entry| {
                entry
                    .schema
                    .mapped_fields()
                    .into_iter()
                    .filter(|(_, field)| !entry.table.has_header(field))
                    .map(|(role, field)| SchemaLint {
                        table: entry.schema.table.clone(),
                        role,
                        field: field.to_string(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Distinct reward types, in registration order
    pub fn declared_types(&self) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .map(|entry| entry.schema.reward_type.as_str())
            .filter(|reward_type| seen.insert(*reward_type))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredTable<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reward_catalog_tables::ReferenceRow;

    fn store() -> ReferenceStore {
        let mut store = ReferenceStore::new();
        store
            .insert(
                "mounts",
                ReferenceTable::new(
                    Some("Mounts".into()),
                    vec!["Mount".into(), "Phase".into(), "Bronze".into()],
                    vec![[("Mount", "Reins"), ("Phase", "1"), ("Bronze", "10,000")]
                        .into_iter()
                        .collect::<ReferenceRow>()],
                ),
            )
            .unwrap();
        store
            .insert(
                "toys",
                ReferenceTable::new(None, vec!["Toy".into(), "Bronze*".into()], vec![]),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_registers_in_order() {
        let store = store();
        let schemas = vec![
            TableSchema::new("toys", "Toy", "collectibles", "toys"),
            TableSchema::new("mounts", "Mount", "collectibles", "mounts"),
        ];

        let registry = SchemaRegistry::new(&schemas, &store).unwrap();
        let keys: Vec<&str> = registry.iter().map(|entry| entry.key()).collect();

        assert_eq!(keys, vec!["toys", "mounts"]);
        assert_eq!(registry.declared_types(), vec!["toys", "mounts"]);
    }

    #[test]
    fn test_missing_table_fails_at_construction() {
        let store = store();
        let schemas = vec![
            TableSchema::new("mounts", "Mount", "collectibles", "mounts"),
            TableSchema::new("transmog", "Appearance", "cosmetics", "transmog"),
        ];

        let result = SchemaRegistry::new(&schemas, &store);
        assert_eq!(
            result.unwrap_err(),
            RegistryError::MissingTable("transmog".to_string())
        );
    }

    #[test]
    fn test_duplicate_schema_rejected() {
        let store = store();
        let schemas = vec![
            TableSchema::new("mounts", "Mount", "collectibles", "mounts"),
            TableSchema::new("mounts", "Mount", "collectibles", "mounts"),
        ];

        let result = SchemaRegistry::new(&schemas, &store);
        assert_eq!(
            result.unwrap_err(),
            RegistryError::DuplicateSchema("mounts".to_string())
        );
    }

    #[test]
    fn test_empty_type_rejected() {
        let store = store();
        let schemas = vec![TableSchema::new("mounts", "Mount", "collectibles", " ")];

        let result = SchemaRegistry::new(&schemas, &store);
        assert!(matches!(
            result,
            Err(RegistryError::InvalidSchema { ref table, .. }) if table == "mounts"
        ));
    }

    #[test]
    fn test_lint_matches_headers_exactly() {
        let store = store();
        let schemas = vec![
            TableSchema::new("toys", "Toy", "collectibles", "toys").with_cost("Bronze", None),
            TableSchema::new("mounts", "Mount", "collectibles", "mounts")
                .with_cost("Bronze", None)
                .with_source("Vendor"),
        ];

        let registry = SchemaRegistry::new(&schemas, &store).unwrap();
        let lints = registry.lint();

        assert_eq!(
            lints,
            vec![
                SchemaLint {
                    table: "toys".into(),
                    role: "cost_field",
                    field: "Bronze".into(),
                },
                SchemaLint {
                    table: "mounts".into(),
                    role: "source_field",
                    field: "Vendor".into(),
                },
            ]
        );
    }

    #[test]
    fn test_section_title_falls_back_to_table_heading() {
        let store = store();
        let schemas = vec![
            TableSchema::new("mounts", "Mount", "collectibles", "mounts"),
            TableSchema::new("toys", "Toy", "collectibles", "toys").with_heading("Toy Box"),
        ];

        let registry = SchemaRegistry::new(&schemas, &store).unwrap();
        let titles: Vec<Option<&str>> = registry.iter().map(|e| e.section_title()).collect();

        assert_eq!(titles, vec![Some("Mounts"), Some("Toy Box")]);
    }

    #[test]
    fn test_schema_deserializes_type_key() {
        let schema: TableSchema = serde_json::from_str(
            r#"{"table": "mounts", "name_field": "Mount", "cost_field": "Bronze",
                "category": "collectibles", "type": "mounts"}"#,
        )
        .unwrap();

        assert_eq!(schema.reward_type, "mounts");
        assert_eq!(schema.cost_field.as_deref(), Some("Bronze"));
        assert_eq!(schema.phase_field, None);
    }
}
