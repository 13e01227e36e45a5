//! Askama template filters for asset management

// Include compile-time generated asset hashes
include!(concat!(env!("OUT_DIR"), "/asset_hashes.rs"));

/// Append cache-busting hash to static asset URLs.
///
/// Usage in templates:
/// ```html
/// <script src="{{ "/static/js/study.js"|asset_url }}"></script>
/// ```
#[askama::filter_fn]
pub fn asset_url(path: impl std::fmt::Display, _: &dyn askama::Values) -> askama::Result<String> {
    let path = path.to_string();
    let hash = match path.as_str() {
        "/static/js/study.js" => STUDY_JS_HASH,
        "/static/css/styles.css" => STYLES_CSS_HASH,
        _ => return Ok(path),
    };
    Ok(format!("{}?v={}", path, hash))
}
