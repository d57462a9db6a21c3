/*!
# Row Normalizer

Applies one registered schema to one reference row, producing a
[`RewardEntry`]. Normalization never fails: a row missing its name column
borrows the first non-empty value, a missing cost column is an empty cost,
and unmapped or absent pass-through columns are `None`.
*/

use crate::config::CatalogConfig;
use crate::cost_parser::{parse_cost, Cost};
use crate::schema_registry::{RegisteredTable, TableSchema};
use reward_catalog_tables::ReferenceRow;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One normalized reward record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEntry {
    /// Slug of `(table_key, name)`; unique within a catalog
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub reward_type: String,
    pub category: String,
    pub section_title: Option<String>,
    pub table_key: String,
    pub cost: Option<Cost>,
    pub phase: Option<String>,
    pub source: Option<String>,
    pub requirement: Option<String>,
    pub achievement: Option<String>,
    /// The row this entry was built from
    pub metadata: ReferenceRow,
}

impl RewardEntry {
    /// Parsed amount, if the entry has a cost with one
    pub fn amount(&self) -> Option<u64> {
        self.cost.as_ref().and_then(|cost| cost.amount)
    }
}

/// Normalize `row` using the schema of `registered`.
pub fn normalize_row(
    registered: &RegisteredTable<'_>,
    row: &ReferenceRow,
    config: &CatalogConfig,
) -> RewardEntry {
    let schema = registered.schema;
    let name = resolve_name(schema, row, &config.placeholder_name);

    let cost = schema.cost_field.as_deref().and_then(|cost_field| {
        let currency = resolve_currency(schema, cost_field, &config.primary_currency);
        let raw = row.get(cost_field).unwrap_or_default();
        parse_cost(raw, &currency, config.cost_parse_mode)
    });

    RewardEntry {
        id: entry_id(registered.key(), &name),
        name,
        reward_type: schema.reward_type.clone(),
        category: schema.category.clone(),
        section_title: registered.section_title().map(str::to_string),
        table_key: registered.key().to_string(),
        cost,
        phase: optional_field(row, schema.phase_field.as_deref()).map(str::to_string),
        source: optional_field(row, schema.source_field.as_deref()).map(str::to_string),
        requirement: optional_field(row, schema.requirement_field.as_deref()).map(str::to_string),
        achievement: optional_field(row, schema.achievement_field.as_deref()).map(str::to_string),
        metadata: row.clone(),
    }
}

/// Value of a schema-mapped column.
///
/// `None` when the schema maps no column, the row lacks it, or the cell is blank.
/// Present values are returned verbatim.
pub fn optional_field<'r>(row: &'r ReferenceRow, field: Option<&str>) -> Option<&'r str> {
    let value = row.get(field?)?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Display name: the name column, else the first non-empty cell, else `placeholder`.
pub fn resolve_name(schema: &TableSchema, row: &ReferenceRow, placeholder: &str) -> String {
    if let Some(name) = optional_field(row, Some(schema.name_field.as_str())) {
        return name.trim().to_string();
    }

    match row.iter().map(|(_, value)| value.trim()).find(|v| !v.is_empty()) {
        Some(fallback) => {
            debug!(
                "Table '{}': row has no '{}', using '{}' as name",
                schema.table, schema.name_field, fallback
            );
            fallback.to_string()
        }
        None => placeholder.to_string(),
    }
}

/// Currency label for `cost_field`.
///
/// An explicit `cost_currency` wins. Otherwise a field name containing the
/// primary currency (case-insensitive) maps to the primary currency, and any
/// other field name is used as its own label.
pub fn resolve_currency(schema: &TableSchema, cost_field: &str, primary_currency: &str) -> String {
    if let Some(currency) = &schema.cost_currency {
        return currency.clone();
    }

    if cost_field
        .to_lowercase()
        .contains(&primary_currency.to_lowercase())
    {
        primary_currency.to_string()
    } else {
        cost_field.to_string()
    }
}

/// Deterministic id for an entry named `name` in table `table_key`.
pub fn entry_id(table_key: &str, name: &str) -> String {
    slugify(&format!("{} {}", table_key, name))
}

/// Lowercase ASCII alphanumerics; every other run of characters becomes one `-`.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_dash = true;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
