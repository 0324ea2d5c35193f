//! URL utilities for consistent endpoint construction.

/// Normalize a base URL by removing trailing slashes so that appending an
/// endpoint never produces a double slash.
///
/// # Examples
///
/// ```
/// use spicechat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:5000"), "http://localhost:5000");
/// assert_eq!(normalize_base_url("http://localhost:5000/"), "http://localhost:5000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a server base URL and an endpoint path.
///
/// # Examples
///
/// ```
/// use spicechat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:5000/", "/check_session"),
///     "http://localhost:5000/check_session"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}
