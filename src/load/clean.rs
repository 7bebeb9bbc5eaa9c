// src/load/clean.rs

/// Placeholder written for counts that do not exist (e.g. Sejong before 2012).
pub const PLACEHOLDER: &str = "-";

/// 1) Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// 2) Header cells may carry a UTF-8 BOM when exported from spreadsheets.
pub fn clean_header(raw: &str) -> &str {
    clean_str(raw.trim_start_matches('\u{feff}'))
}

/// 3) Rewrite the placeholder to a literal zero, leaving everything else as-is.
pub fn replace_placeholder(raw: &str) -> &str {
    if clean_str(raw) == PLACEHOLDER {
        "0"
    } else {
        raw
    }
}

/// 4) Coerce a count cell: parse as a number, truncate toward zero, clamp at
/// zero. Anything unparsable (empty, text, NaN, inf, beyond `i64`) becomes `None`.
pub fn parse_count(raw: &str) -> Option<i64> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v.max(0));
    }
    let v = s.parse::<f64>().ok().filter(|v| v.is_finite())?.trunc();
    if v >= i64::MAX as f64 {
        return None;
    }
    Some((v as i64).max(0))
}

/// Years must be integral; `2020.0` is accepted since spreadsheet exports
/// sometimes write them that way.
pub fn parse_year(raw: &str) -> Option<i32> {
    let s = clean_str(raw);
    if let Ok(y) = s.parse::<i32>() {
        return Some(y);
    }
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64 {
        Some(v as i32)
    } else {
        None
    }
}
