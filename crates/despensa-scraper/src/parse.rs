//! Parsing helpers shared by the vendor normalizers: loosely-typed JSON
//! numbers, JSON truthiness, and the Consum free-text size description.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+").expect("valid decimal regex"));
static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid integer regex"));

/// Largest magnitude the `products.size` column (`NUMERIC(12,3)`) accepts.
pub const MAX_SIZE: f64 = 999_999_999.0;

/// Whether `size` is finite and fits the `products.size` column.
#[must_use]
pub fn size_fits_column(size: f64) -> bool {
    size.is_finite() && size.abs() <= MAX_SIZE
}

/// A JSON value that vendors send either as a number or as a numeric string
/// (`1.25` vs `"1.25"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Parses the value as `f64`.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if a text value is not a float.
    pub fn to_f64(&self) -> Result<f64, String> {
        match self {
            Numeric::Number(n) => Ok(*n),
            Numeric::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("\"{s}\" is not a number: {e}")),
        }
    }

    /// `None` for falsy values (`0`, `""`), otherwise the parsed float.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if a non-empty text value is not a float.
    pub fn to_optional_f64(&self) -> Result<Option<f64>, String> {
        if self.is_falsy() {
            return Ok(None);
        }
        self.to_f64().map(Some)
    }

    /// `None` for falsy values, otherwise the value as a whole unit count.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the value is fractional,
    /// negative, or not a number.
    pub fn to_optional_u32(&self) -> Result<Option<u32>, String> {
        if self.is_falsy() {
            return Ok(None);
        }
        match self {
            Numeric::Number(n) => {
                if n.fract() != 0.0 || *n < 0.0 || *n > f64::from(u32::MAX) {
                    return Err(format!("{n} is not a whole unit count"));
                }
                // Range and integrality checked above.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                Ok(Some(*n as u32))
            }
            Numeric::Text(s) => s
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|e| format!("\"{s}\" is not a whole unit count: {e}")),
        }
    }

    fn is_falsy(&self) -> bool {
        match self {
            Numeric::Number(n) => *n == 0.0,
            Numeric::Text(s) => s.is_empty(),
        }
    }
}

/// Deserializes an id sent as either a JSON number or a string into a `String`.
///
/// # Errors
///
/// Fails for any JSON type other than a string or an integer.
pub fn deserialize_external_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]`, and `{}` are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Size and pack information recovered from a product description.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SizeDescription {
    pub size: Option<f64>,
    pub size_format: Option<String>,
    pub is_pack: bool,
    pub total_units: Option<u32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("more than one pack separator in \"{0}\"")]
    AmbiguousPack(String),
    #[error("pack count \"{0}\" is not a whole number")]
    InvalidPackCount(String),
    #[error("no quantity found in \"{0}\"")]
    MissingQuantity(String),
    #[error("size \"{0}\" is out of range")]
    SizeOutOfRange(String),
}

/// Parses size, unit, and pack count out of a free-text description such as
/// `"Leche entera 1,5l"` or `"Cerveza 6 x 330 ml"`.
///
/// Rules, applied in order:
/// 1. Remove `name` from the description, then all whitespace.
/// 2. An empty remainder yields no size and no unit.
/// 3. A literal `x` splits the pack count (left) from the size (right).
/// 4. With a comma the size is a decimal (`1,5` → `1.5`); otherwise the
///    first run of digits. The unit is what remains once the number is
///    removed, or `None` when nothing remains.
///
/// # Errors
///
/// Returns [`DescriptionError`] when the text has several `x` separators, a
/// non-numeric pack count, no number at all, or a size too large to store.
pub fn parse_description(
    description: &str,
    name: &str,
) -> Result<SizeDescription, DescriptionError> {
    let without_name = if name.is_empty() {
        description.to_owned()
    } else {
        description.replace(name, "")
    };
    let cleaned: String = without_name.chars().filter(|c| !c.is_whitespace()).collect();

    if cleaned.is_empty() {
        return Ok(SizeDescription::default());
    }

    let mut parsed = SizeDescription::default();
    let mut size_text = cleaned.as_str();

    if let Some((units, rest)) = cleaned.split_once('x') {
        if rest.contains('x') {
            return Err(DescriptionError::AmbiguousPack(cleaned.clone()));
        }
        parsed.is_pack = true;
        parsed.total_units = if units.is_empty() {
            None
        } else {
            Some(
                units
                    .parse::<u32>()
                    .map_err(|_| DescriptionError::InvalidPackCount(units.to_owned()))?,
            )
        };
        size_text = rest;
    }

    let (size_text, pattern) = if size_text.contains(',') {
        (size_text.replace(',', "."), &*DECIMAL_RE)
    } else {
        (size_text.to_owned(), &*INTEGER_RE)
    };

    let number = pattern
        .find(&size_text)
        .ok_or_else(|| DescriptionError::MissingQuantity(size_text.clone()))?
        .as_str();
    let size = number
        .parse::<f64>()
        .map_err(|_| DescriptionError::MissingQuantity(size_text.clone()))?;
    if !size_fits_column(size) {
        return Err(DescriptionError::SizeOutOfRange(number.to_owned()));
    }

    let unit = size_text.replace(number, "");
    parsed.size = Some(size);
    parsed.size_format = Some(unit.trim().to_owned()).filter(|u| !u.is_empty());
    Ok(parsed)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
