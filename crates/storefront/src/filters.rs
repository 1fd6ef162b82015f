//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats an item count: `1 item`, `3 items`.
///
/// Usage in templates: `{{ cart.item_count|items }}`
#[askama::filter_fn]
pub fn items(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = value.to_string();
    Ok(if count == "1" {
        "1 item".to_string()
    } else {
        format!("{count} items")
    })
}

/// Returns the content hash for main.css.
///
/// Computed by `build.rs`, which also writes the fingerprinted copy.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}
