/*!
# Reward Catalog Reference Tables

This crate provides the **reference data layer** of the reward catalog: the
tables every catalog is built from, and the readers that load them.

## Purpose

Reference tables are heterogeneous. Each has its own column set, cells are
free text, and nothing about a column name is normalized. This crate keeps
them exactly as read so the catalog's schemas can map columns by their
literal names.

## Table Files

### CSV (`*.csv`)
A header line followed by data rows. The heading is supplied by the caller.
Short rows are accepted; their missing cells are absent columns.

### JSON (`*.json`)
```json
{ "heading": "Mounts", "headers": ["Mount", "Bronze"], "rows": [{ "Mount": "...", "Bronze": "10,000" }] }
```
Row objects keep their document column order.

## Usage

```rust
use reward_catalog_tables::{read_reference_table, ReferenceStore, TableResult};

fn example() -> TableResult<()> {
    let mut store = ReferenceStore::new();
    store.insert("mounts", read_reference_table("tables/mounts.csv", Some("Mounts".into()))?)?;
    store.insert("pets", read_reference_table("tables/pets.json", None)?)?;
    Ok(())
}
```
*/

pub mod errors;
pub mod schemas;
pub mod validation;

// Re-export main types for convenience
pub use errors::{TableError, TableResult};
pub use schemas::{ReferenceRow, ReferenceStore, ReferenceTable};
pub use validation::{
    parse_reference_table_csv, parse_reference_table_json, read_reference_table,
    read_reference_table_csv, read_reference_table_json, validate_headers,
    write_reference_table_csv,
};
