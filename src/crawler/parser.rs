//! HTML link extraction
//!
//! The traversal engine only needs raw `href` strings; resolution,
//! normalization and scope filtering happen afterwards.

use scraper::{Html, Selector};

/// Link-extraction capability consumed by the crawler
pub trait LinkExtractor: Send + Sync {
    /// Returns the raw `href` values of every anchor in `content`
    fn extract_links(&self, content: &str) -> Vec<String>;
}

/// Extracts `<a href>` values with the scraper HTML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, content: &str) -> Vec<String> {
        extract_hrefs(content)
    }
}

/// Extracts raw `href` attribute values from `<a>` tags
///
/// Values are returned unresolved and in document order, duplicates
/// included. Anchors without an `href` are skipped.
///
/// # Example
///
/// ```
/// use link_auditor::crawler::extract_hrefs;
///
/// let html = r#"<a href="/about.html">About</a><a name="top"></a>"#;
/// assert_eq!(extract_hrefs(html), vec!["/about.html".to_string()]);
/// ```
pub fn extract_hrefs(content: &str) -> Vec<String> {
    let document = Html::parse_document(content);

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(e) => {
            tracing::warn!("Invalid anchor selector: {:?}", e);
            return Vec::new();
        }
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_relative_and_absolute() {
        let html = r#"
            <html>
            <body>
                <a href="/page1.html">Link 1</a>
                <a href="page2.html">Link 2</a>
                <a href="https://other.com/page3">Link 3</a>
            </body>
            </html>
        "#;
        assert_eq!(
            extract_hrefs(html),
            vec!["/page1.html", "page2.html", "https://other.com/page3"]
        );
    }

    #[test]
    fn test_fragments_and_schemes_are_kept_raw() {
        let html = r##"<a href="#top">Top</a><a href="mailto:a@b.com">Mail</a>"##;
        assert_eq!(extract_hrefs(html), vec!["#top", "mailto:a@b.com"]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let html = r#"<a href="/a.html">A</a><a href="/a.html">A again</a>"#;
        assert_eq!(extract_hrefs(html).len(), 2);
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let html = r#"<a name="anchor">No link</a><a href="">Empty</a>"#;
        assert_eq!(extract_hrefs(html), vec![""]);
    }

    #[test]
    fn test_non_anchor_links_are_ignored() {
        let html = r#"
            <link rel="stylesheet" href="/style.css">
            <script src="/app.js"></script>
            <img src="/logo.png">
        "#;
        assert!(extract_hrefs(html).is_empty());
    }

    #[test]
    fn test_malformed_html_still_yields_links() {
        let html = r#"<div><a href="/ok.html">unclosed <p>text"#;
        assert_eq!(extract_hrefs(html), vec!["/ok.html"]);
    }

    #[test]
    fn test_extractor_trait() {
        let extractor = HtmlLinkExtractor;
        let links = extractor.extract_links(r#"<a href="/x">x</a>"#);
        assert_eq!(links, vec!["/x"]);
    }
}
