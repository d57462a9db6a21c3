/*!
# Reference Table Definitions

This module defines the in-memory shape of the reference data the catalog is
built from. Every table is a `(heading, headers, rows)` triple; rows carry no
fixed shape and are looked up by exact column name, punctuation included
(a column may literally be named `"Bronze*"`).

## Column Order

Rows remember the order their columns were read in. The catalog relies on it
when a row lacks its configured name column and the first non-empty value has
to stand in for the name.
*/

use crate::errors::{TableError, TableResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// ================================================================================================
// Reference Row
// ================================================================================================

/// One row of a reference table: column name → cell text, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceRow {
    cells: Vec<(String, String)>,
}

impl ReferenceRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell. Re-inserting an existing column replaces its value in place,
    /// so the column keeps its original position.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Cell text for `column`, or `None` when the row has no such column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Column names in the order they were read.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// `(column, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ReferenceRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = ReferenceRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl Serialize for ReferenceRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Reads a JSON object in document order. `serde_json::Map` would sort the keys.
struct ReferenceRowVisitor;

impl<'de> Visitor<'de> for ReferenceRowVisitor {
    type Value = ReferenceRow;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of column name to string cell")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut row = ReferenceRow::new();
        while let Some((column, value)) = access.next_entry::<String, String>()? {
            row.insert(column, value);
        }
        Ok(row)
    }
}

impl<'de> Deserialize<'de> for ReferenceRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ReferenceRowVisitor)
    }
}

// ================================================================================================
// Reference Table
// ================================================================================================

/// A heterogeneous reference table.
///
/// **JSON shape**: `{ "heading": string | null, "headers": [string], "rows": [{column: value}] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTable {
    /// Human label of the section the table came from
    #[serde(default)]
    pub heading: Option<String>,

    /// Column names as they appear in the source, not normalized
    pub headers: Vec<String>,

    #[serde(default)]
    pub rows: Vec<ReferenceRow>,
}

impl ReferenceTable {
    pub fn new(heading: Option<String>, headers: Vec<String>, rows: Vec<ReferenceRow>) -> Self {
        Self {
            heading,
            headers,
            rows,
        }
    }

    pub fn has_header(&self, column: &str) -> bool {
        self.headers.iter().any(|header| header == column)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// ================================================================================================
// Reference Store
// ================================================================================================

/// The named reference tables a catalog is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceStore {
    tables: BTreeMap<String, ReferenceTable>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table under `key`. Each key may only be used once.
    pub fn insert(&mut self, key: impl Into<String>, table: ReferenceTable) -> TableResult<()> {
        let key = key.into();
        if self.tables.contains_key(&key) {
            return Err(TableError::DuplicateTable(key));
        }
        self.tables.insert(key, table);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&ReferenceTable> {
        self.tables.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tables.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_keeps_column_order() {
        let row: ReferenceRow = [("Mount", "Reins"), ("Phase", "1"), ("Bronze", "10,000")]
            .into_iter()
            .collect();

        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["Mount", "Phase", "Bronze"]);
        assert_eq!(row.get("Bronze"), Some("10,000"));
        assert_eq!(row.get("bronze"), None);
    }

    #[test]
    fn test_row_reinsert_replaces_in_place() {
        let mut row = ReferenceRow::new();
        row.insert("Toy", "Spinner");
        row.insert("Bronze", "500");
        row.insert("Toy", "Top");

        assert_eq!(row.len(), 2);
        assert_eq!(row.iter().next(), Some(("Toy", "Top")));
    }

    #[test]
    fn test_row_json_preserves_document_order() {
        let json = r#"{"Zeta": "1", "Alpha": "2", "Bronze*": "3"}"#;
        let row: ReferenceRow = serde_json::from_str(json).unwrap();

        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["Zeta", "Alpha", "Bronze*"]);

        let back = serde_json::to_string(&row).unwrap();
        assert_eq!(back, r#"{"Zeta":"1","Alpha":"2","Bronze*":"3"}"#);
    }

    #[test]
    fn test_table_json_null_heading() {
        let json = r#"{"heading": null, "headers": ["Pet"], "rows": [{"Pet": "Lil' Ragnaros"}]}"#;
        let table: ReferenceTable = serde_json::from_str(json).unwrap();

        assert_eq!(table.heading, None);
        assert!(table.has_header("Pet"));
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_store_rejects_duplicate_keys() {
        let mut store = ReferenceStore::new();
        store.insert("mounts", ReferenceTable::default()).unwrap();

        let result = store.insert("mounts", ReferenceTable::default());
        assert!(matches!(result, Err(TableError::DuplicateTable(key)) if key == "mounts"));
        assert_eq!(store.len(), 1);
    }
}
