//! URL helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};

/// Prefix `path` with the site root
///
/// # Examples
/// ```ignore
/// url_for("/blog/", "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Encode a single URL path segment
pub fn encode_url(segment: &str) -> String {
    utf8_percent_encode(segment, NON_ALPHANUMERIC).to_string()
}

/// Decode a percent-encoded path segment
pub fn decode_url(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// URL of a post page
pub fn post_url(root: &str, name: &str) -> String {
    url_for(root, &format!("blog/{}", encode_url(name)))
}
