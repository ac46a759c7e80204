//! Normalization of raw field values handed over by request handlers

use crate::{Result, StoreError};

/// Trimmed text, `None` when absent or blank
pub fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Event capacity. Anything absent or not a non-negative whole number
/// becomes 0, which means unlimited.
pub fn parse_capacity(raw: Option<&str>) -> u32 {
    let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return 0;
    };

    if let Ok(n) = text.parse::<u32>() {
        return n;
    }

    // Accept "12.0" from form fields and JSON numbers rendered as floats
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => n as u32,
        _ => 0,
    }
}

/// Logged hours must be a finite number greater than zero
pub fn parse_hours(raw: &str) -> Result<f64> {
    let text = raw.trim();
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(StoreError::Validation(format!(
            "hours must be a positive number, got {:?}",
            text
        ))),
    }
}
