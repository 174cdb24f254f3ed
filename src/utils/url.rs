//! URL handling for redirect destinations.
//!
//! Destinations come out of user-authored link records, so they arrive with
//! HTML-entity ampersands, missing schemes, stray whitespace, and the
//! occasional outright dangerous scheme. These helpers normalize a
//! destination into something safe to send a `Location` header for.

use std::fmt::Write as _;

/// Replaces HTML-entity ampersands (`&amp;`) with literal ampersands.
pub fn decode_entity_ampersands(url: &str) -> String {
    url.replace("&amp;", "&")
}

/// Appends query pairs to a URL, using `?` or `&` as appropriate. Keys and
/// values are percent-encoded.
pub fn append_query(url: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return url.to_string();
    }

    let mut result = url.to_string();
    let mut separator = if url.contains('?') { '&' } else { '?' };

    for (key, value) in pairs {
        result.push(separator);
        result.push_str(&percent_encode(key));
        result.push('=');
        result.push_str(&percent_encode(value));
        separator = '&';
    }

    result
}

/// Normalizes a destination into an absolute URL: trims surrounding
/// whitespace, upgrades scheme-relative URLs, and defaults to `http://` when
/// no scheme is present at all.
pub fn sanitize_absolute_url(url: &str) -> String {
    let trimmed: String = url.trim().chars().filter(|c| !c.is_control()).collect();

    if trimmed.starts_with("//") {
        return format!("http:{}", trimmed);
    }

    if !trimmed.contains("://") {
        return format!("http://{}", trimmed);
    }

    trimmed
}

/// Whether a sanitized URL is acceptable as a redirect target: an `http` or
/// `https` scheme, a non-empty host, and no embedded whitespace.
pub fn is_valid_url(url: &str) -> bool {
    let rest = match url.split_once("://") {
        Some(("http", rest)) | Some(("https", rest)) => rest,
        _ => return false,
    };

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();

    !host.is_empty() && !url.chars().any(|c| c.is_whitespace() || c.is_control())
}

fn percent_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());

    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => {
                let _ = write!(encoded, "%{:02X}", byte);
            }
        }
    }

    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entity_ampersands() {
        assert_eq!(
            decode_entity_ampersands("https://example.com/?a=1&amp;b=2"),
            "https://example.com/?a=1&b=2"
        );
    }

    #[test]
    fn test_append_query() {
        let pairs = vec![
            ("utm_source".to_string(), "news letter".to_string()),
            ("b".to_string(), "2".to_string()),
        ];

        assert_eq!(
            append_query("https://example.com/", &pairs),
            "https://example.com/?utm_source=news%20letter&b=2"
        );
        assert_eq!(
            append_query("https://example.com/?a=1", &pairs[1..]),
            "https://example.com/?a=1&b=2"
        );
        assert_eq!(append_query("https://example.com/", &[]), "https://example.com/");
    }

    #[test]
    fn test_sanitize_absolute_url() {
        assert_eq!(
            sanitize_absolute_url("  https://example.com/x "),
            "https://example.com/x"
        );
        assert_eq!(
            sanitize_absolute_url("//example.com/x"),
            "http://example.com/x"
        );
        assert_eq!(
            sanitize_absolute_url("example.com/x"),
            "http://example.com/x"
        );
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com/path?q=1"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url("javascript://alert(1)"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("http://"));
        assert!(!is_valid_url("https://exa mple.com"));
    }
}
