/*!
# Catalog Configuration

[`CatalogConfig`] carries the settings a catalog build depends on: the primary
currency, the placeholder name, how cost text is parsed, and how colliding
ids are resolved. Every field has a default, so a partial config deserializes.
*/

use serde::{Deserialize, Serialize};

/// Currency the catalog-wide budgeting total is computed in
pub const DEFAULT_PRIMARY_CURRENCY: &str = "Bronze";

/// Display name given to rows with no usable text at all
pub const DEFAULT_PLACEHOLDER_NAME: &str = "Unknown Reward";

/// How the cost parser turns cost text into an amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostParseMode {
    /// Strip every non-digit and parse what remains. `"2 for 500"` becomes 2500.
    #[default]
    ConcatenateDigits,

    /// Only the first numeric token counts. `"2 for 500"` becomes 2.
    FirstDigitRun,
}

/// What to do when two entries generate the same id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdCollisionPolicy {
    /// Later duplicates get `-2`, `-3`, ... appended
    #[default]
    Suffix,

    /// Abort the catalog build
    Reject,
}

/// Configuration for building a catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Currency used for the budgeting total and the primary-currency index
    pub primary_currency: String,

    /// Name used when a row has no non-empty value
    pub placeholder_name: String,

    pub cost_parse_mode: CostParseMode,

    pub id_collision_policy: IdCollisionPolicy,

    /// Types that must be queryable even when no table declares them
    pub extra_types: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            primary_currency: DEFAULT_PRIMARY_CURRENCY.to_string(),
            placeholder_name: DEFAULT_PLACEHOLDER_NAME.to_string(),
            cost_parse_mode: CostParseMode::default(),
            id_collision_policy: IdCollisionPolicy::default(),
            extra_types: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// Whether `currency` counts as the primary currency (case-insensitive prefix match).
    pub fn is_primary_currency(&self, currency: &str) -> bool {
        currency_matches(currency, &self.primary_currency)
    }
}

/// Case-insensitive prefix match of a currency label against `currency`.
///
/// Both sides are lowercased with full Unicode case mapping.
pub(crate) fn currency_matches(label: &str, currency: &str) -> bool {
    label.to_lowercase().starts_with(&currency.to_lowercase())
}
