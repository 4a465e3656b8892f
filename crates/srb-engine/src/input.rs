//! Parsing of raw form values.
//!
//! Form fields arrive as strings. A blank, unparseable or zero id counts as
//! "nothing selected", the same way the select boxes post an empty value for
//! their placeholder entry.

/// Parses a selected id. Ids start at 1, so `0` is treated as no selection.
pub fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|&id| id != 0)
}

pub fn parse_year(raw: Option<&str>) -> Option<i32> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i32>().ok())
        .filter(|&y| y != 0)
}

/// Parses an SRB value. Non-finite numbers are rejected.
pub fn parse_value(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
