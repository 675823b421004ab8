//! Ticket URL validation

use url::Url;

/// Whether `candidate` is an absolute http(s) URL with a host
///
/// Enqueue responses are only trusted as tickets when they pass this check.
pub fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_urls() {
        assert!(is_valid_url("https://qanvas.test/document/processed/a.pdf"));
        assert!(is_valid_url("http://localhost:8080/highchart/processed/b.svg"));
        assert!(is_valid_url(" https://qanvas.test/x \n"));
    }

    #[test]
    fn test_rejects_everything_else() {
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("/document/processed/a.pdf"));
        assert!(!is_valid_url("ftp://qanvas.test/a.pdf"));
        assert!(!is_valid_url("mailto:ops@qanvas.test"));
        assert!(!is_valid_url("<html>Internal Server Error</html>"));
    }
}
