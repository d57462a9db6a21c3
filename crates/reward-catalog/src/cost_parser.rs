/*!
# Cost Parser

Turns a free-text cost cell into a [`Cost`].

Cost cells are written by hand: `"10,000"`, `"1,000 Nethershard"`, `"–"`,
`"N/A"`, or whole sentences. The parser never fails. Placeholders yield no
cost at all; anything else yields a cost whose `amount` may be `None` while
the literal text is kept for display.
*/

use crate::config::CostParseMode;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Cell values (compared case-insensitively after normalization) meaning "no cost"
pub const COST_PLACEHOLDERS: &[&str] = &["", "-", "—", "–", "n/a", "na", "none", "no cost"];

/// Characters allowed between digit groups of a single number
const THOUSANDS_SEPARATORS: &[char] = &[',', '.', '\'', ' '];

/// A parsed cost. Created once per entry and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    /// Positive integer amount, when the text yields one
    pub amount: Option<u64>,

    /// Trimmed text with non-breaking spaces normalized
    pub display: String,

    /// Currency label taken from the schema, never from the text
    pub currency: String,

    /// The cell exactly as read
    pub raw: String,
}

/// Parse a cost cell. Returns `None` for empty and placeholder values.
pub fn parse_cost(raw: &str, currency: &str, mode: CostParseMode) -> Option<Cost> {
    let display = normalize_cost_text(raw);
    if is_placeholder(&display) {
        return None;
    }

    Some(Cost {
        amount: extract_amount(&display, mode),
        display,
        currency: currency.to_string(),
        raw: raw.to_string(),
    })
}

/// Trim, turn non-breaking spaces into plain spaces, and collapse whitespace runs.
pub fn normalize_cost_text(raw: &str) -> String {
    raw.replace(['\u{00A0}', '\u{202F}'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether normalized cost text is one of [`COST_PLACEHOLDERS`].
pub fn is_placeholder(text: &str) -> bool {
    let lowered = text.to_lowercase();
    COST_PLACEHOLDERS.contains(&lowered.as_str())
}

/// Extract a positive amount from normalized cost text.
///
/// Zero, overflowing, and digit-free text all yield `None`.
pub fn extract_amount(text: &str, mode: CostParseMode) -> Option<u64> {
    let digits = match mode {
        CostParseMode::ConcatenateDigits => {
            if numeric_token_count(text) > 1 {
                warn!(
                    "Cost text '{}' contains more than one number; digits are concatenated",
                    text
                );
            }
            text.chars().filter(char::is_ascii_digit).collect::<String>()
        }
        CostParseMode::FirstDigitRun => first_numeric_token(text).unwrap_or_default(),
    };

    if digits.is_empty() {
        return None;
    }

    match digits.parse::<u64>() {
        Ok(0) => None,
        Ok(amount) => Some(amount),
        Err(_) => {
            warn!("Cost text '{}' overflows a 64-bit amount", text);
            None
        }
    }
}

/// Digits of the first number in `text`, skipping thousands separators that
/// sit between two digits.
fn first_numeric_token(text: &str) -> Option<String> {
    numeric_tokens(text).into_iter().next()
}

fn numeric_token_count(text: &str) -> usize {
    numeric_tokens(text).len()
}

fn numeric_tokens(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_ascii_digit() {
            current.push(ch);
            continue;
        }

        let joins_digits = !current.is_empty()
            && THOUSANDS_SEPARATORS.contains(&ch)
            && chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if !joins_digits && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
