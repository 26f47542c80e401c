use std::collections::HashSet;

use reqwest::Url;
use scraper::Html;

use crate::error::FetchError;
use crate::extract::selector;

/// Collects absolute `http`/`https` links from anchor tags.
///
/// Relative `href`s are resolved against `base`. Fragment-only, `mailto:` and
/// `javascript:` targets are skipped, as is anything that does not resolve to
/// an absolute http(s) URL. Each link appears once, in document order.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] if the anchor selector fails to parse.
pub fn links_from_html(html: &str, base: &Url) -> Result<Vec<String>, FetchError> {
    let document = Html::parse_document(html);
    let anchors = selector(base.as_str(), "a[href]")?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in document
        .select(&anchors)
        .filter_map(|el| el.value().attr("href"))
    {
        let href = href.trim();
        if href.is_empty() || is_skipped(href) {
            continue;
        }

        let Ok(resolved) = base.join(href) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") || resolved.host_str().is_none() {
            continue;
        }

        let resolved = resolved.to_string();
        if seen.insert(resolved.clone()) {
            links.push(resolved);
        }
    }

    Ok(links)
}

fn is_skipped(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    href.starts_with('#') || lower.starts_with("mailto:") || lower.starts_with("javascript:")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn resolves_relative_links() {
        let html = r#"<a href="/about">About</a><a href="next">Next</a>"#;
        let links = links_from_html(html, &base()).unwrap();
        assert_eq!(
            links,
            vec![
                "https://example.com/about".to_string(),
                "https://example.com/blog/next".to_string(),
            ]
        );
    }

    #[test]
    fn skips_fragments_mailto_and_javascript() {
        let html = r##"
            <a href="#top">Top</a>
            <a href="mailto:me@example.com">Mail</a>
            <a href="JavaScript:void(0)">JS</a>
            <a href="ftp://files.example.com/x">FTP</a>
            <a href="https://other.example.org/">Other</a>
        "##;
        let links = links_from_html(html, &base()).unwrap();
        assert_eq!(links, vec!["https://other.example.org/".to_string()]);
    }

    #[test]
    fn deduplicates_preserving_first_occurrence() {
        let html = r#"
            <a href="/a">1</a>
            <a href="https://example.com/b">2</a>
            <a href="https://example.com/a">3</a>
        "#;
        let links = links_from_html(html, &base()).unwrap();
        assert_eq!(
            links,
            vec![
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ]
        );
    }

    #[test]
    fn anchors_without_href_are_ignored() {
        let html = r#"<a name="x">no link</a><a href="  ">blank</a>"#;
        let links = links_from_html(html, &base()).unwrap();
        assert!(links.is_empty());
    }
}
