//! Endpoint selection and sanity checks
//!
//! A demo backend only counts as connected when its URL looks like a real
//! deployment. Template placeholders, documentation domains and local
//! addresses disable submission instead of failing at request time.

/// Substrings that mark a URL as a placeholder or a local-only address
const NOT_CONNECTED_MARKERS: &[&str] = &["your-", "example.com", "localhost"];

/// Whether `url` points at a usable deployment
///
/// # Example
/// ```
/// use folio_client::endpoint::is_connected;
///
/// assert!(is_connected("https://agent.koyeb.app/api"));
/// assert!(!is_connected("https://your-agent.koyeb.app/api"));
/// assert!(!is_connected("http://localhost:8000"));
/// ```
pub fn is_connected(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();

    if !lower.starts_with("http://") && !lower.starts_with("https://") {
        return false;
    }

    !NOT_CONNECTED_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Picks a base URL: an explicit non-blank value, then `env_var`, then `default`
pub fn resolve_base_url(explicit: Option<&str>, env_var: &str, default: &str) -> String {
    explicit
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var(env_var)
                .ok()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
        })
        .unwrap_or_else(|| default.to_string())
}
