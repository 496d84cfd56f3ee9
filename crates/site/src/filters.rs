//! Askama filters used by the page templates.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::Datelike;

/// Content hash of main.css, set by the build script. Empty when the build
/// could not read the file.
const CSS_HASH: &str = env!("CSS_HASH");

/// Copyright year for the footer.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(chrono::Utc::now().year())
}

/// Public path of the site stylesheet.
///
/// Usage in templates: `{{ ""|stylesheet }}`
#[askama::filter_fn]
pub fn stylesheet(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(stylesheet_path(CSS_HASH))
}

/// Fingerprinted copy when a hash exists, else the source file.
fn stylesheet_path(hash: &str) -> String {
    if hash.is_empty() {
        "/static/css/main.css".to_string()
    } else {
        format!("/static/css/derived/main.{hash}.css")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_path() {
        assert_eq!(stylesheet_path(""), "/static/css/main.css");
        assert_eq!(
            stylesheet_path("1a2b3c4d"),
            "/static/css/derived/main.1a2b3c4d.css"
        );
    }
}
