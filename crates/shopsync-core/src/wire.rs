//! # Wire Normalization
//!
//! Lenient readers that turn loosely-typed remote records into the strict
//! internal representation.
//!
//! ## Why Lenient?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The same column arrives in several shapes depending on which code      │
//! │  path wrote it:                                                         │
//! │                                                                         │
//! │    units:       "12"        or  12        or absent                     │
//! │    product_id:  42          or  "42"      or derivable from "product-42"│
//! │    price:       10.99       or  "10.99"                                 │
//! │    sale_date:   RFC3339     or  "2025-06-15"                            │
//! │    product name: top-level  or  joined {"products": {"product_name"}}   │
//! │                                                                         │
//! │  Normalization happens ONCE, at the repository boundary. Nothing past   │
//! │  it ever sees a wire shape.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readers return `Option`; the per-entity decoders decide which fields are
//! required and which default.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::money::Money;

// =============================================================================
// Field Readers
// =============================================================================

/// Reads a string field. Numbers are stringified; empty strings read as
/// absent.
pub fn str_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a string through a path of nested objects, for joined sub-records
/// like `{"products": {"product_name": ...}}`.
pub fn nested_str(record: &Value, path: &[&str]) -> Option<String> {
    let mut current = record;
    for key in &path[..path.len() - 1] {
        current = current.get(key)?;
    }
    str_field(current, path[path.len() - 1])
}

/// Reads an integer field. Accepts integers, floats (rounded), and
/// string-encoded numbers.
pub fn int_field(record: &Value, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64().map(|f| f.round() as i64)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    }
}

/// Reads a monetary field. Wire decimals and string-encoded decimals both
/// convert to integer minor units exactly once, here.
pub fn money_field(record: &Value, key: &str) -> Option<Money> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64().map(Money::from_decimal),
        Value::String(s) => s.trim().parse::<f64>().ok().map(Money::from_decimal),
        _ => None,
    }
}

/// Reads a timestamp field. Accepts RFC3339, naive datetimes, and bare
/// `YYYY-MM-DD` dates (read as midnight UTC).
pub fn datetime_field(record: &Value, key: &str) -> Option<DateTime<Utc>> {
    let raw = match record.get(key)? {
        Value::String(s) if !s.is_empty() => s,
        _ => return None,
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Reads a calendar-date field. Accepts `YYYY-MM-DD` and full timestamps
/// (date part taken).
pub fn date_field(record: &Value, key: &str) -> Option<NaiveDate> {
    let raw = match record.get(key)? {
        Value::String(s) if !s.is_empty() => s,
        _ => return None,
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if raw.len() >= 10 {
        if let Ok(date) = NaiveDate::parse_from_str(&raw[..10], "%Y-%m-%d") {
            return Some(date);
        }
    }
    None
}

/// Extracts the trailing decimal digits of an id like `"product-42"`.
///
/// Used to derive the legacy numeric id when the remote omits it.
pub fn trailing_digits(id: &str) -> Option<i64> {
    let digits: String = id
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

// =============================================================================
// Serde Helpers for Drafts/Patches
// =============================================================================

/// Serializes `Money` as a wire decimal (`10.99`), the shape the remote
/// stores prices in.
pub mod money_decimal {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::money::Money;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Money::from_decimal(value))
    }
}

/// `Option<Money>` as an optional wire decimal.
pub mod money_decimal_opt {
    use serde::Serializer;

    use crate::money::Money;

    pub fn serialize<S: Serializer>(
        money: &Option<Money>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match money {
            Some(m) => serializer.serialize_f64(m.to_decimal()),
            None => serializer.serialize_none(),
        }
    }
}

/// Serializes an integer as a string, for columns the remote stores as text
/// (product `units`).
pub mod int_string {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }
}

/// `Option<i64>` as an optional string.
pub mod int_string_opt {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &Option<i64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.to_string()),
            None => serializer.serialize_none(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
