//! Polars `AnyValue` conversion and numeric parsing.

use polars::prelude::AnyValue;

/// Converts a Polars `AnyValue` to its text form.
///
/// Returns an empty string for `Null`; floats are rendered without trailing
/// zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use chemo_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::String("ec50")), "ec50");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Like [`any_to_string`] but `None` for nulls and empty strings.
///
/// Assay sheets use empty cells for "not reported", so they map to missing.
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    if matches!(value, AnyValue::Null) {
        return None;
    }
    let s = any_to_string(value);
    if s.is_empty() { None } else { Some(s) }
}

/// Formats a floating-point number without trailing zeros.
///
/// ```
/// use chemo_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(0.25), "0.25");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parses a float, tolerating surrounding whitespace. Empty input is not a number.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses an integer, tolerating surrounding whitespace. `"3.0"` is not an integer.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_to_string_null() {
        assert_eq!(any_to_string(AnyValue::Null), "");
        assert_eq!(any_to_text(AnyValue::Null), None);
    }

    #[test]
    fn test_any_to_text_empty_string() {
        assert_eq!(any_to_text(AnyValue::String("")), None);
        assert_eq!(any_to_text(AnyValue::String(" x")), Some(" x".to_string()));
    }

    #[test]
    fn test_any_to_string_numbers() {
        assert_eq!(any_to_string(AnyValue::Int64(-1)), "-1");
        assert_eq!(any_to_string(AnyValue::Float64(10.0)), "10");
        assert_eq!(any_to_string(AnyValue::Float64(0.5)), "0.5");
    }

    #[test]
    fn test_format_numeric_keeps_integers() {
        assert_eq!(format_numeric(100.0), "100");
        assert_eq!(format_numeric(-0.0), "-0");
    }

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(" 1.5 "), Some(1.5));
        assert_eq!(parse_f64("1e-6"), Some(1e-6));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("ec50"), None);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64("2"), Some(2));
        assert_eq!(parse_i64("-1"), Some(-1));
        assert_eq!(parse_i64("3.0"), None);
    }
}
