//! Hostname normalisation for tab URLs and denylist entries.

use url::Url;

use crate::error::ValidationError;

/// Extract the comparable hostname from a tab URL.
///
/// Only `http` and `https` pages count; browser-internal pages
/// (`chrome://`, `about:`, extension pages) yield `None`, which the
/// controller treats as "not distracting".
pub fn hostname_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?;
    Some(canonical(host))
}

/// Normalise a user-entered denylist entry. Accepts either a bare hostname
/// (`youtube.com`) or a full URL (`https://www.youtube.com/feed`).
pub fn normalize_hostname(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidHostname(input.to_string()));
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };
    hostname_from_url(&candidate).ok_or_else(|| ValidationError::InvalidHostname(input.to_string()))
}

fn canonical(host: &str) -> String {
    let lower = host.to_ascii_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_www_and_lowercases() {
        assert_eq!(
            hostname_from_url("https://WWW.YouTube.com/watch?v=1").as_deref(),
            Some("youtube.com")
        );
    }

    #[test]
    fn internal_pages_have_no_hostname() {
        assert_eq!(hostname_from_url("chrome://extensions"), None);
        assert_eq!(hostname_from_url("about:blank"), None);
        assert_eq!(hostname_from_url("not a url"), None);
    }

    #[test]
    fn normalize_accepts_bare_hosts_and_urls() {
        assert_eq!(normalize_hostname("reddit.com").unwrap(), "reddit.com");
        assert_eq!(
            normalize_hostname("https://www.reddit.com/r/rust").unwrap(),
            "reddit.com"
        );
        assert_eq!(normalize_hostname("  News.ycombinator.com ").unwrap(), "news.ycombinator.com");
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(normalize_hostname("").is_err());
        assert!(normalize_hostname("two words").is_err());
        assert!(normalize_hostname("ftp://example.com").is_err());
    }
}
