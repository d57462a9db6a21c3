/*!
# Reward Catalog

Normalizes heterogeneous reference tables into one uniform catalog of reward
entries, with parsed costs, stable ids, and precomputed currency totals.

## Pipeline

```text
ReferenceStore ──▶ SchemaRegistry ──▶ normalize_row ──▶ Catalog ──▶ queries
  (tables)         (schema ↔ table)    (one entry/row)   (indexes, totals)
```

Construction happens once. A schema naming a missing table fails the build;
everything that can go wrong with a single row degrades to a fallback value.

## Example

```rust
use reward_catalog::{
    Catalog, CatalogConfig, QueryOptions, ReferenceRow, ReferenceStore, ReferenceTable,
    TableSchema,
};

let row: ReferenceRow = [
    ("Mount", "Reins of the Ashplague Fel Bat"),
    ("Phase", "1"),
    ("Bronze", "10,000"),
]
.into_iter()
.collect();

let mut store = ReferenceStore::new();
store
    .insert(
        "mounts",
        ReferenceTable::new(
            Some("Mounts".into()),
            vec!["Mount".into(), "Phase".into(), "Bronze".into()],
            vec![row],
        ),
    )
    .unwrap();

let schemas = vec![TableSchema::new("mounts", "Mount", "collectibles", "mounts")
    .with_cost("Bronze", None)
    .with_phase("Phase")];

let catalog = Catalog::from_store(&schemas, &store, &CatalogConfig::default()).unwrap();

let mounts = catalog.by_type("mounts", QueryOptions::primary_currency_only());
assert_eq!(mounts[0].name, "Reins of the Ashplague Fel Bat");
assert_eq!(catalog.total_primary_currency_cost(), 10_000);
```
*/

mod catalog;
mod config;
mod cost_parser;
mod row_normalizer;
mod schema_registry;

pub use catalog::{Catalog, CatalogError, CatalogResult, QueryOptions, TableCount};
pub use config::{
    CatalogConfig, CostParseMode, IdCollisionPolicy, DEFAULT_PLACEHOLDER_NAME,
    DEFAULT_PRIMARY_CURRENCY,
};
pub use cost_parser::{
    extract_amount, is_placeholder, normalize_cost_text, parse_cost, Cost, COST_PLACEHOLDERS,
};
pub use row_normalizer::{
    entry_id, normalize_row, optional_field, resolve_currency, resolve_name, slugify, RewardEntry,
};
pub use schema_registry::{
    RegisteredTable, RegistryError, RegistryResult, SchemaLint, SchemaRegistry, TableSchema,
};

// Re-export the reference data types the API is expressed in
pub use reward_catalog_tables::{ReferenceRow, ReferenceStore, ReferenceTable};
