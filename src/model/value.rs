// src/model/value.rs
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// A single cell value.
///
/// Dates that fail to parse become [`Value::Null`]; numeric text that fails
/// to parse becomes 0. See [`parse_date`] and [`parse_currency`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Null,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null, or text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Canonical string form: what the value looks like in a table cell or a
    /// CSV field. Facet selections match against this form.
    pub fn canonical(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Null => String::new(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Integral numbers render without a decimal point, everything else with the
/// shortest round-trip form.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

static CURRENCY_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[$,]").unwrap());

/// Coerce a currency-like value to a number. `$12,500.50` becomes 12500.5;
/// unparsable text becomes 0; null stays null-equivalent (returns `None`).
pub fn parse_currency(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Text(s) => {
            let cleaned = CURRENCY_CHARS.replace_all(s.trim(), "");
            if cleaned.is_empty() {
                return None;
            }
            Some(cleaned.parse::<f64>().unwrap_or(0.0))
        }
        Value::Date(_) | Value::Null => None,
    }
}

/// Permissive date parsing: ISO first, then common US forms. A trailing time
/// component is ignored. Unparsable input yields `None`.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Text(s) => parse_date_str(s),
        _ => None,
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%d-%b-%Y"];

fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    // Strip a time suffix ("2024-03-01 00:00:00" or ISO "T" form).
    let date_part = text.split([' ', 'T']).next().unwrap_or(text);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}
