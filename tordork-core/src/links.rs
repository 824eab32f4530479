//! Result link extraction
//!
//! Pulls absolute outbound links out of a search results page and drops
//! anything pointing back at a search engine or a cache/preview host.

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Deduplicated, lexicographically ordered set of result URLs
pub type LinkSet = BTreeSet<String>;

/// Host markers for non-result domains.
///
/// A marker matches at the start of the host or right after a label dot,
/// so `google.` covers `www.google.com` and `google.co.uk` but not
/// `notgoogle.com`.
pub const EXCLUDED_DOMAIN_MARKERS: &[&str] = &[
    "startpage.",
    "yandex.",
    "webcache.",
    "google.",
    "bing.",
    "duckduckgo.",
];

/// Extract external result links from raw HTML.
///
/// Empty or anchor-free input yields an empty set. Broken markup is
/// tolerated by the HTML5 parser and unusable hrefs are skipped.
pub fn extract_links(html: &str) -> LinkSet {
    let mut links = LinkSet::new();

    if html.trim().is_empty() {
        return links;
    }

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return links;
    };

    let document = Html::parse_document(html);

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(url) = normalize_href(href) {
            links.insert(url);
        }
    }

    links
}

/// Decode an href and keep it only if it is an absolute external link
fn normalize_href(href: &str) -> Option<String> {
    let href = href.trim();
    if !is_absolute_http(href) {
        return None;
    }

    let decoded = match urlencoding::decode(href) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => href.to_string(),
    };

    let parsed = Url::parse(&decoded).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let host = parsed.host_str()?;
    if is_excluded_host(host) {
        return None;
    }

    Some(decoded)
}

fn is_absolute_http(href: &str) -> bool {
    let lower = href
        .get(..8)
        .unwrap_or(href)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Whether a host belongs to a search engine or cache/preview service
pub fn is_excluded_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    EXCLUDED_DOMAIN_MARKERS.iter().any(|marker| {
        host.starts_with(marker) || host.contains(&format!(".{}", marker))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(extract_links("").is_empty());
        assert!(extract_links("   \n").is_empty());
    }

    #[test]
    fn test_no_anchors() {
        let html = "<html><body><p>Nothing to see at https://example.com</p></body></html>";
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_filters_engine_domains() {
        let html = r#"
            <html><body>
                <a href="https://target.example/doc.pdf">Doc</a>
                <a href="https://www.startpage.com/x">Startpage</a>
                <a href="https://yandex.ru/images">Yandex</a>
                <a href="https://webcache.googleusercontent.com/search?q=cache:x">Cache</a>
                <a href="http://www.bing.com/search?q=x">Bing</a>
                <a href="https://google.co.uk/">Google</a>
            </body></html>
        "#;

        let links = extract_links(html);
        assert_eq!(links.len(), 1);
        assert!(links.contains("https://target.example/doc.pdf"));
    }

    #[test]
    fn test_marker_needs_label_boundary() {
        assert!(is_excluded_host("www.google.com"));
        assert!(is_excluded_host("WWW.STARTPAGE.COM"));
        assert!(!is_excluded_host("notgoogle.com"));
        assert!(!is_excluded_host("target.example"));
    }

    #[test]
    fn test_skips_relative_and_non_http() {
        let html = r##"
            <a href="/sp/search?page=2">Next</a>
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:someone@example.com">Mail</a>
            <a href="#top">Top</a>
            <a>No href</a>
            <a href="ftp://files.example/">FTP</a>
            <a href="HTTPS://Files.Example/report.xls">Upper</a>
        "##;

        let links: Vec<_> = extract_links(html).into_iter().collect();
        assert_eq!(links, vec!["HTTPS://Files.Example/report.xls".to_string()]);
    }

    #[test]
    fn test_percent_decoding() {
        let html = r#"<a href="https://target.example/my%20file%2Epdf">x</a>"#;
        let links = extract_links(html);
        assert!(links.contains("https://target.example/my file.pdf"));
    }

    #[test]
    fn test_dedup_and_sorted() {
        let html = r#"
            <a href="https://zeta.example/">z</a>
            <a href="https://alpha.example/">a</a>
            <a href="https://zeta.example/">z again</a>
            <a href="https://mid.example/%7Euser">m</a>
            <a href="https://mid.example/~user">m decoded</a>
        "#;

        let links: Vec<_> = extract_links(html).into_iter().collect();
        assert_eq!(
            links,
            vec![
                "https://alpha.example/".to_string(),
                "https://mid.example/~user".to_string(),
                "https://zeta.example/".to_string(),
            ]
        );
    }

    #[test]
    fn test_malformed_markup() {
        let html = r#"<div><a href="https://ok.example/a">ok<a href="https://also.example/b"
            <a href=><a href="https://">broken</p></div><a href="https://last.example/c"#;

        let links = extract_links(html);
        assert!(links.contains("https://ok.example/a"));
        assert!(!links.iter().any(|l| l == "https://"));
    }

    #[test]
    fn test_idempotent() {
        let html = r#"
            <a href="https://one.example/">1</a>
            <a href="https://two.example/">2</a>
            <a href="https://www.google.com/">g</a>
        "#;
        assert_eq!(extract_links(html), extract_links(html));
    }

    #[test]
    fn test_every_link_is_an_input_href() {
        let html = r#"
            <a href="https://one.example/a%20b">1</a>
            <a href="https://two.example/">2</a>
            <a href="https://duckduckgo.com/?q=x">d</a>
        "#;

        for link in extract_links(html) {
            let encoded = link.replace(' ', "%20");
            assert!(html.contains(&link) || html.contains(&encoded));
            let host = Url::parse(&link).unwrap().host_str().unwrap().to_string();
            assert!(!is_excluded_host(&host));
        }
    }
}
