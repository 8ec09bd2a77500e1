//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;

use crate::config::SiteConfig;

/// Characters left untouched in a path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Route serving the next page of the listing
pub const LOAD_MORE_ROUTE: &str = "/page";

/// Public path of a post
///
/// # Examples
/// ```ignore
/// post_url(&config, "como-utilizar-hooks") // -> "/post/como-utilizar-hooks"
/// ```
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    format!(
        "/{}/{}",
        config.post_dir.trim_matches('/'),
        utf8_percent_encode(slug, PATH_SEGMENT)
    )
}

/// Link behind the "load more" button for a continuation URL
///
/// # Examples
/// ```ignore
/// load_more_url("https://x.cdn.prismic.io/api/v2/documents/search?page=2")
/// // -> "/page?next=https%3A%2F%2Fx%2Ecdn..."
/// ```
pub fn load_more_url(next_page: &str) -> String {
    format!("{}?next={}", LOAD_MORE_ROUTE, encode_url(next_page))
}

/// Whether a continuation URL points at the configured content API
///
/// Only such URLs may be fetched on behalf of a visitor.
pub fn is_content_api_url(config: &SiteConfig, url: &str) -> bool {
    let (Ok(endpoint), Ok(candidate)) = (Url::parse(&config.api_endpoint), Url::parse(url)) else {
        return false;
    };
    matches!(candidate.scheme(), "http" | "https")
        && candidate.username().is_empty()
        && candidate.password().is_none()
        && candidate.origin() == endpoint.origin()
}

/// Encode a URL component
pub fn encode_url(path: &str) -> String {
    utf8_percent_encode(path, NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            api_endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_post_url() {
        let config = test_config();
        assert_eq!(
            post_url(&config, "como-utilizar-hooks"),
            "/post/como-utilizar-hooks"
        );
        assert_eq!(post_url(&config, "a b"), "/post/a%20b");
    }

    #[test]
    fn test_load_more_url_round_trip() {
        let next = "https://spacetraveling.cdn.prismic.io/api/v2/documents/search?page=2&pageSize=5";
        let link = load_more_url(next);
        assert!(link.starts_with("/page?next=https%3A%2F%2F"));
        assert!(!link.contains('&'));
        let encoded = link.trim_start_matches("/page?next=");
        assert_eq!(
            percent_encoding::percent_decode_str(encoded).decode_utf8().unwrap(),
            next
        );
    }

    #[test]
    fn test_is_content_api_url() {
        let config = test_config();
        assert!(is_content_api_url(
            &config,
            "https://spacetraveling.cdn.prismic.io/api/v2/documents/search?page=2"
        ));
        assert!(!is_content_api_url(
            &config,
            "https://spacetraveling.cdn.prismic.io.evil.com/api"
        ));
        assert!(!is_content_api_url(
            &config,
            "https://spacetraveling.cdn.prismic.io@evil.com/api"
        ));
        assert!(!is_content_api_url(&config, "file:///etc/passwd"));
        assert!(!is_content_api_url(
            &config,
            "http://spacetraveling.cdn.prismic.io/api/v2/documents/search"
        ));
        assert!(!is_content_api_url(&config, "not a url"));
    }

    #[test]
    fn test_is_content_api_url_normalizes_origin() {
        let config = test_config();
        assert!(is_content_api_url(
            &config,
            "https://spacetraveling.cdn.prismic.io:443/api/v2/documents/search?page=2"
        ));
        assert!(is_content_api_url(
            &config,
            "HTTPS://spacetraveling.cdn.prismic.io/api/v2/documents/search?page=2"
        ));
        assert!(is_content_api_url(
            &config,
            "https://SpaceTraveling.CDN.prismic.io/api/v2/documents/search?page=2"
        ));
        assert!(!is_content_api_url(
            &config,
            "https://spacetraveling.cdn.prismic.io:8443/api/v2/documents/search"
        ));
    }
}
