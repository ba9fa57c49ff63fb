//! Request URL handling.

/// Normalize URL: decode, strip query string, keep a single leading slash
pub fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;
    let decoded = percent_decode_str(url)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();

    let path = decoded.split(['?', '#']).next().unwrap_or(&decoded);
    format!("/{}", path.trim_start_matches('/'))
}

/// Whether `path` names the index page.
pub fn is_index(path: &str) -> bool {
    matches!(path, "/" | "/index.html")
}

/// Whether `path` lies under the asset `prefix` (`/min/`).
pub fn is_asset(path: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
}
