/*!
# Catalog Aggregator & Query API

Builds the catalog from a [`SchemaRegistry`] and answers queries against it.

## Build

1. Normalize every row of every registered table, in registration order and
   then row order. Each row yields exactly one entry.
2. Disambiguate colliding ids per [`IdCollisionPolicy`]. An id a row derives
   from its own table and name always wins over a generated suffix.
3. Partition entries by type. Every declared type gets a key, even if empty.
4. Partition again, keeping only entries priced in the primary currency with
   a parsed amount.
5. Sum amounts per currency and for the primary currency. Only the primary
   total is fatal on overflow; other currencies record the overflow as `None`.

The build is all-or-nothing: any error returns `Err` and no catalog exists.

## Queries

After the build a [`Catalog`] is read-only. It owns all its data, so it can
be shared between readers (e.g. in an `Arc`) without locking.
*/

use crate::config::{currency_matches, CatalogConfig, IdCollisionPolicy};
use crate::row_normalizer::{normalize_row, RewardEntry};
use crate::schema_registry::{RegistryError, SchemaRegistry, TableSchema};
use reward_catalog_tables::ReferenceStore;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a catalog build
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Schema registration failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("Duplicate entry id '{id}' in table '{table}'")]
    DuplicateId { id: String, table: String },

    #[error("Calculation overflow: {0}")]
    Overflow(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Options for [`Catalog::by_type`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Only entries priced in the primary currency with a parsed amount
    pub primary_currency_only: bool,
}

impl QueryOptions {
    pub fn primary_currency_only() -> Self {
        Self {
            primary_currency_only: true,
        }
    }
}

/// Per-table build statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table_key: String,
    pub reward_type: String,
    /// Rows in the reference table, which is also the number of entries built
    pub rows: usize,
    /// Entries priced in the primary currency with a parsed amount
    pub primary_priced: usize,
}

/// The normalized reward catalog
#[derive(Debug)]
pub struct Catalog {
    primary_currency: String,
    entries: Vec<RewardEntry>,
    declared_types: Vec<String>,
    by_type: HashMap<String, Vec<usize>>,
    primary_by_type: HashMap<String, Vec<usize>>,
    by_id: HashMap<String, usize>,
    currency_totals: BTreeMap<String, Option<u64>>,
    total_primary_currency_cost: u64,
    table_counts: Vec<TableCount>,
}

impl Catalog {
    /// Register `schemas` against `store` and build the catalog.
    pub fn from_store(
        schemas: &[TableSchema],
        store: &ReferenceStore,
        config: &CatalogConfig,
    ) -> CatalogResult<Self> {
        let registry = SchemaRegistry::new(schemas, store)?;
        Self::build(&registry, config)
    }

    /// Build the catalog from an already validated registry.
    ///
    /// # Errors
    ///
    /// * `DuplicateId` - Two entries share an id and the policy is `Reject`
    /// * `Overflow` - The primary currency total does not fit in a `u64`
    pub fn build(registry: &SchemaRegistry<'_>, config: &CatalogConfig) -> CatalogResult<Self> {
        let declared_types = declared_types(registry, config);

        let mut entries = Vec::new();
        let mut table_counts = Vec::with_capacity(registry.len());

        // Step 1: Flatten every table, one entry per row
        for registered in registry.iter() {
            let mut primary_priced = 0;

            for row in &registered.table.rows {
                let entry = normalize_row(registered, row, config);
                if is_primary_priced(&entry, config) {
                    primary_priced += 1;
                }
                entries.push(entry);
            }

            debug!(
                "Normalized {} rows from table '{}'",
                registered.table.row_count(),
                registered.key()
            );
            table_counts.push(TableCount {
                table_key: registered.key().to_string(),
                reward_type: registered.schema.reward_type.clone(),
                rows: registered.table.row_count(),
                primary_priced,
            });
        }

        // Step 2: Unique ids. Suffixes never take an id some row derives naturally.
        let natural_ids: HashSet<String> = entries.iter().map(|entry| entry.id.clone()).collect();
        let mut by_id = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter_mut().enumerate() {
            let id = std::mem::take(&mut entry.id);
            entry.id = assign_id(
                &by_id,
                &natural_ids,
                id,
                &entry.table_key,
                config.id_collision_policy,
            )?;
            by_id.insert(entry.id.clone(), index);
        }

        // Step 3: Type partitions, with an empty list for every declared type
        let mut by_type: HashMap<String, Vec<usize>> = declared_types
            .iter()
            .map(|reward_type| (reward_type.clone(), Vec::new()))
            .collect();
        let mut primary_by_type = by_type.clone();

        for (index, entry) in entries.iter().enumerate() {
            by_type
                .entry(entry.reward_type.clone())
                .or_default()
                .push(index);

            if is_primary_priced(entry, config) {
                primary_by_type
                    .entry(entry.reward_type.clone())
                    .or_default()
                    .push(index);
            }
        }

        // Step 4: Totals
        let currency_totals = currency_totals(&entries);
        let total_primary_currency_cost = entries
            .iter()
            .filter(|entry| is_primary_priced(entry, config))
            .filter_map(RewardEntry::amount)
            .try_fold(0u64, u64::checked_add)
            .ok_or_else(|| {
                CatalogError::Overflow(format!("{} total", config.primary_currency))
            })?;

        info!(
            "Built reward catalog: {} entries from {} tables, {} types, {} {} total",
            entries.len(),
            table_counts.len(),
            declared_types.len(),
            total_primary_currency_cost,
            config.primary_currency
        );

        Ok(Self {
            primary_currency: config.primary_currency.clone(),
            entries,
            declared_types,
            by_type,
            primary_by_type,
            by_id,
            currency_totals,
            total_primary_currency_cost,
            table_counts,
        })
    }

    /// Entries of `reward_type`, in catalog order. Unknown types yield an empty list.
    pub fn by_type(&self, reward_type: &str, options: QueryOptions) -> Vec<&RewardEntry> {
        let index = if options.primary_currency_only {
            &self.primary_by_type
        } else {
            &self.by_type
        };

        index
            .get(reward_type)
            .map(|positions| positions.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// Sum of amounts over every entry priced in the primary currency
    pub fn total_primary_currency_cost(&self) -> u64 {
        self.total_primary_currency_cost
    }

    /// Every entry, in table registration order then row order
    pub fn all_entries(&self) -> &[RewardEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&RewardEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// Declared types in registration order, followed by configured extra types
    pub fn declared_types(&self) -> &[String] {
        &self.declared_types
    }

    pub fn primary_currency(&self) -> &str {
        &self.primary_currency
    }

    /// Total over currencies whose label starts with `currency` (case-insensitive).
    ///
    /// `None` if the total does not fit in a `u64`.
    pub fn total_for_currency(&self, currency: &str) -> Option<u64> {
        self.currency_totals
            .iter()
            .filter(|(label, _)| currency_matches(label, currency))
            .try_fold(0u64, |acc, (_, total)| acc.checked_add((*total)?))
    }

    /// Total amount per exact currency label, `None` where the sum overflowed
    pub fn currency_totals(&self) -> &BTreeMap<String, Option<u64>> {
        &self.currency_totals
    }

    pub fn table_counts(&self) -> &[TableCount] {
        &self.table_counts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn declared_types(registry: &SchemaRegistry<'_>, config: &CatalogConfig) -> Vec<String> {
    let mut types: Vec<String> = registry
        .declared_types()
        .into_iter()
        .map(str::to_string)
        .collect();

    for extra in &config.extra_types {
        if !types.contains(extra) {
            types.push(extra.clone());
        }
    }
    types
}

fn is_primary_priced(entry: &RewardEntry, config: &CatalogConfig) -> bool {
    entry
        .cost
        .as_ref()
        .is_some_and(|cost| cost.amount.is_some() && config.is_primary_currency(&cost.currency))
}

/// Resolve an id collision according to `policy`.
///
/// Generated suffixes skip every id in `natural`, so a row whose own name
/// slugs to `x-2` keeps that id even when a duplicate `x` comes first.
fn assign_id(
    taken: &HashMap<String, usize>,
    natural: &HashSet<String>,
    id: String,
    table: &str,
    policy: IdCollisionPolicy,
) -> CatalogResult<String> {
    if !taken.contains_key(&id) {
        return Ok(id);
    }

    match policy {
        IdCollisionPolicy::Reject => Err(CatalogError::DuplicateId {
            id,
            table: table.to_string(),
        }),
        IdCollisionPolicy::Suffix => {
            let unique = (2..)
                .map(|n| format!("{}-{}", id, n))
                .find(|candidate| !taken.contains_key(candidate) && !natural.contains(candidate))
                .unwrap_or_default();
            warn!(
                "Table '{}': id '{}' already used, assigned '{}'",
                table, id, unique
            );
            Ok(unique)
        }
    }
}

fn currency_totals(entries: &[RewardEntry]) -> BTreeMap<String, Option<u64>> {
    let mut totals: BTreeMap<String, Option<u64>> = BTreeMap::new();

    for cost in entries.iter().filter_map(|entry| entry.cost.as_ref()) {
        let Some(amount) = cost.amount else {
            continue;
        };
        let total = totals.entry(cost.currency.clone()).or_insert(Some(0));
        let Some(sum) = *total else {
            continue;
        };
        *total = sum.checked_add(amount);
        if total.is_none() {
            warn!("{} total overflows u64, reported as unavailable", cost.currency);
        }
    }

    totals
}
