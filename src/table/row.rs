//! Schema-free tabular rows
//!
//! A row is an ordered mapping from column name to a JSON scalar. Which columns
//! exist is only known at runtime, and column order is significant (it defines
//! chart axis order), so rows are stored as an `IndexMap` rather than a hash map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Display name column, the stable external identity of an entity
pub const ENTITY_NAME: &str = "Entity Name";

/// Canonical identifier column
pub const ENTITY_ID: &str = "EntID";

/// Identifier column names, probed in priority order
pub const ID_CANDIDATES: [&str; 3] = [ENTITY_ID, "ent_id", "ID"];

/// Prefix of raw dimension columns in the raw score pivot
pub const DIMENSION_PREFIX: &str = "Dim";

/// How a column name is compared against the reserved set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    /// Byte-for-byte comparison
    Exact,
    /// Trimmed, lower-cased comparison
    Normalized,
}

/// Columns that identify a row rather than carry a score
#[derive(Debug, Clone, Copy)]
pub struct ReservedColumns {
    names: &'static [&'static str],
}

impl ReservedColumns {
    /// `EntID` and `Entity Name`
    pub const ENTITY: ReservedColumns = ReservedColumns {
        names: &[ENTITY_ID, ENTITY_NAME],
    };

    pub fn contains(&self, key: &str, mode: KeyMatch) -> bool {
        match mode {
            KeyMatch::Exact => self.names.iter().any(|name| *name == key),
            KeyMatch::Normalized => {
                let key = key.trim().to_lowercase();
                self.names.iter().any(|name| name.to_lowercase() == key)
            }
        }
    }
}

/// One row of a table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for fixtures and demos
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a cell. Replacing keeps the original column position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.cells.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.cells.get(key)
    }

    /// Whether the column is present at all (a JSON `null` counts as present)
    pub fn contains(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    /// Column names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell coerced to trimmed text
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(value_text)
    }

    /// Cell coerced to a number
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(value_number)
    }

    /// Trimmed `Entity Name`; blank names count as absent
    pub fn entity_name(&self) -> Option<String> {
        self.text(ENTITY_NAME).filter(|name| !name.is_empty())
    }

    /// First identifier column present on this row
    pub fn identifier_key(&self) -> Option<&'static str> {
        ID_CANDIDATES.iter().copied().find(|key| self.contains(key))
    }

    /// Integer identifier from the first present identifier column.
    ///
    /// Returns `None` when no candidate column exists or its value has no
    /// leading integer.
    pub fn identifier(&self) -> Option<i64> {
        let key = self.identifier_key()?;
        self.get(key).and_then(parse_identifier)
    }

    /// Non-reserved column names, in row order
    pub fn data_columns(&self, reserved: ReservedColumns, mode: KeyMatch) -> Vec<&str> {
        self.keys()
            .filter(|key| !reserved.contains(key, mode))
            .collect()
    }

    /// Values of all `Dim*` columns in row order. Non-numeric cells are `None`.
    pub fn dimensions(&self) -> Vec<Option<f64>> {
        self.cells
            .iter()
            .filter(|(key, _)| key.starts_with(DIMENSION_PREFIX))
            .map(|(_, value)| value_number(value))
            .collect()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

/// Coerce a scalar to trimmed text. `null`, arrays and objects have no text form.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerce a scalar to a finite number.
///
/// Empty strings and `null` count as zero, booleans as 0/1. Strings that do not
/// parse, and non-finite results, yield `None`.
pub fn value_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(0.0);
            }
            s.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parse an integer identifier.
///
/// Integers pass through, floats are truncated, and strings contribute their
/// leading (optionally signed) digit run, so `" 12abc"` parses as 12.
pub fn parse_identifier(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_integer(s),
        _ => None,
    }
}

fn parse_leading_integer(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_preserves_column_order() {
        let row: Row = serde_json::from_value(json!({
            "EntID": 1, "Entity Name": "X", "Zeta": 0.1, "Alpha": 0.2
        }))
        .unwrap();
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, vec!["EntID", "Entity Name", "Zeta", "Alpha"]);
    }

    #[test]
    fn test_identifier_candidates_priority() {
        let row = Row::new().with("ID", 9).with("ent_id", 4);
        assert_eq!(row.identifier_key(), Some("ent_id"));
        assert_eq!(row.identifier(), Some(4));

        let row = Row::new().with("ID", " 12abc ");
        assert_eq!(row.identifier(), Some(12));

        let row = Row::new().with("EntID", "n/a").with("ID", 3);
        // The first present column wins even when it does not parse
        assert_eq!(row.identifier(), None);

        assert_eq!(Row::new().with("Entity Name", "X").identifier(), None);
    }

    #[test]
    fn test_parse_identifier_forms() {
        assert_eq!(parse_identifier(&json!(7)), Some(7));
        assert_eq!(parse_identifier(&json!(7.9)), Some(7));
        assert_eq!(parse_identifier(&json!("-15")), Some(-15));
        assert_eq!(parse_identifier(&json!("")), None);
        assert_eq!(parse_identifier(&json!("-")), None);
        assert_eq!(parse_identifier(&json!(null)), None);
    }

    #[test]
    fn test_value_number_coercion() {
        assert_eq!(value_number(&json!(0.25)), Some(0.25));
        assert_eq!(value_number(&json!(" 3.5 ")), Some(3.5));
        assert_eq!(value_number(&json!("")), Some(0.0));
        assert_eq!(value_number(&json!(null)), Some(0.0));
        assert_eq!(value_number(&json!(true)), Some(1.0));
        assert_eq!(value_number(&json!("abc")), None);
        assert_eq!(value_number(&json!("NaN")), None);
        assert_eq!(value_number(&json!([1])), None);
    }

    #[test]
    fn test_reserved_columns_match_modes() {
        let reserved = ReservedColumns::ENTITY;
        assert!(reserved.contains("EntID", KeyMatch::Exact));
        assert!(!reserved.contains(" entid ", KeyMatch::Exact));
        assert!(reserved.contains(" entid ", KeyMatch::Normalized));
        assert!(reserved.contains("ENTITY NAME", KeyMatch::Normalized));
        assert!(!reserved.contains("Speed", KeyMatch::Normalized));
    }

    #[test]
    fn test_dimensions_in_row_order() {
        let row = Row::new()
            .with("EntID", 1)
            .with("Dim2", 5)
            .with("Label", "x")
            .with("Dim1", "oops")
            .with("Dimension3", -2.5);
        assert_eq!(row.dimensions(), vec![Some(5.0), None, Some(-2.5)]);
    }

    #[test]
    fn test_entity_name_trimmed_and_blank_absent() {
        assert_eq!(
            Row::new().with("Entity Name", "  Alpha ").entity_name(),
            Some("Alpha".to_string())
        );
        assert_eq!(Row::new().with("Entity Name", "   ").entity_name(), None);
        assert_eq!(Row::new().with("Entity Name", 42).entity_name(), Some("42".to_string()));
    }
}
