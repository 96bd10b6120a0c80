//! Page snapshot construction and query API.
//!
//! A [`PageSnapshot`] is the immutable, per-analysis view of one page that
//! signature probes run against. It is built once from the fetched body and
//! distills the document into plain extracted data:
//! - script `src` and link `href` values (lowercased)
//! - meta tag name → content pairs
//! - script tag `id` values (markers like `__NEXT_DATA__` live there)
//! - concatenated inline script text
//! - global identifier names statically extracted from inline scripts
//!
//! No JavaScript is executed: global markers come from pattern extraction
//! over inline script text (assignments to `window` properties and top-level
//! declarations). Dynamically created globals are therefore invisible, which
//! is an accepted accuracy limitation of this kind of heuristic detection.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

// CSS selector strings
const SCRIPT_SRC_SELECTOR_STR: &str = "script[src]";
const SCRIPT_SELECTOR_STR: &str = "script";
const LINK_HREF_SELECTOR_STR: &str = "link[href]";
const META_SELECTOR_STR: &str = "meta[content]";
const HTML_ROOT_SELECTOR_STR: &str = "html";

// Regex patterns for static global extraction
const WINDOW_ASSIGNMENT_PATTERN: &str =
    r#"window\s*(?:\.\s*([A-Za-z_$][A-Za-z0-9_$]*)|\[\s*['"]([A-Za-z_$][A-Za-z0-9_$]*)['"]\s*\])\s*=[^=]"#;
const TOP_LEVEL_DECLARATION_PATTERN: &str =
    r"(?m)^\s*(?:var|let|const|function)\s+([A-Za-z_$][A-Za-z0-9_$]*)";

static SCRIPT_SRC_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(SCRIPT_SRC_SELECTOR_STR)
        .expect("Failed to parse script src selector - this is a bug")
});

static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(SCRIPT_SELECTOR_STR).expect("Failed to parse script selector - this is a bug")
});

static LINK_HREF_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(LINK_HREF_SELECTOR_STR)
        .expect("Failed to parse link href selector - this is a bug")
});

static META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(META_SELECTOR_STR).expect("Failed to parse meta selector - this is a bug")
});

static HTML_ROOT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(HTML_ROOT_SELECTOR_STR)
        .expect("Failed to parse html root selector - this is a bug")
});

static WINDOW_ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(WINDOW_ASSIGNMENT_PATTERN)
        .expect("Failed to compile window assignment pattern - this is a bug")
});

static TOP_LEVEL_DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(TOP_LEVEL_DECLARATION_PATTERN)
        .expect("Failed to compile declaration pattern - this is a bug")
});

/// Error building a snapshot from a fetched page.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The page URL could not be parsed.
    #[error("Invalid page URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Error evaluating a single probe against a snapshot.
///
/// Probe evaluation errors are recovered by the prober's isolating runner;
/// they never abort a scan.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// A CSS selector used by the probe failed to parse.
    #[error("Invalid selector `{selector}`: {message}")]
    InvalidSelector {
        /// The offending selector string
        selector: String,
        /// Parser error description
        message: String,
    },
}

/// An immutable view of one page, queried by signature probes.
pub struct PageSnapshot {
    url: Url,
    document: Html,
    script_sources: Vec<String>,
    link_hrefs: Vec<String>,
    meta_tags: HashMap<String, String>,
    script_tag_ids: HashSet<String>,
    inline_script: String,
    globals: HashSet<String>,
}

impl PageSnapshot {
    /// Parses a fetched page body into a snapshot.
    ///
    /// Extraction never fails on malformed markup (the parser is lenient);
    /// only an unparseable page URL is an error.
    pub fn parse(url: &str, body: &str) -> Result<Self, SnapshotError> {
        let url = Url::parse(url)?;
        let document = Html::parse_document(body);

        let script_sources: Vec<String> = document
            .select(&SCRIPT_SRC_SELECTOR)
            .filter_map(|element| element.value().attr("src"))
            .map(|src| src.to_lowercase())
            .collect();

        let link_hrefs: Vec<String> = document
            .select(&LINK_HREF_SELECTOR)
            .filter_map(|element| element.value().attr("href"))
            .map(|href| href.to_lowercase())
            .collect();

        // Meta tags keyed by whichever of name/property/http-equiv is present;
        // first occurrence wins.
        let mut meta_tags: HashMap<String, String> = HashMap::new();
        for element in document.select(&META_SELECTOR) {
            let value = element.value();
            let key = value
                .attr("name")
                .or_else(|| value.attr("property"))
                .or_else(|| value.attr("http-equiv"));
            if let (Some(key), Some(content)) = (key, value.attr("content")) {
                meta_tags
                    .entry(key.to_lowercase())
                    .or_insert_with(|| content.to_string());
            }
        }

        let mut script_tag_ids: HashSet<String> = HashSet::new();
        let mut inline_script = String::new();
        for element in document.select(&SCRIPT_SELECTOR) {
            if let Some(id) = element.value().attr("id") {
                script_tag_ids.insert(id.to_string());
            }
            if element.value().attr("src").is_none() {
                for text in element.text() {
                    inline_script.push_str(text);
                    inline_script.push('\n');
                }
            }
        }

        let globals = extract_globals(&inline_script);

        Ok(Self {
            url,
            document,
            script_sources,
            link_hrefs,
            meta_tags,
            script_tag_ids,
            inline_script,
            globals,
        })
    }

    /// The page URL the snapshot was built from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// True if an inline script assigns or declares a global named `name`.
    pub fn has_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }

    /// True if any of `names` is a detected global.
    pub fn any_global(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.has_global(name))
    }

    /// True if any element matches the CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidSelector`] if the selector fails to parse.
    pub fn matches_selector(&self, selector: &str) -> Result<bool, ProbeError> {
        let parsed = Selector::parse(selector).map_err(|e| ProbeError::InvalidSelector {
            selector: selector.to_string(),
            message: e.to_string(),
        })?;
        Ok(self.document.select(&parsed).next().is_some())
    }

    /// True if any script `src` contains `needle` (case-insensitive).
    pub fn script_src_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.script_sources.iter().any(|src| src.contains(&needle))
    }

    /// True if any link `href` contains `needle` (case-insensitive).
    pub fn link_href_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.link_hrefs.iter().any(|href| href.contains(&needle))
    }

    /// True if any script `src` or link `href` contains `needle`.
    pub fn asset_url_contains(&self, needle: &str) -> bool {
        self.script_src_contains(needle) || self.link_href_contains(needle)
    }

    /// True if a `<script>` tag carries the given `id`.
    pub fn has_script_tag_id(&self, id: &str) -> bool {
        self.script_tag_ids.contains(id)
    }

    /// True if the meta tag `name` exists and its content contains `needle`
    /// (case-insensitive).
    pub fn meta_content_contains(&self, name: &str, needle: &str) -> bool {
        self.meta_tags
            .get(&name.to_lowercase())
            .map(|content| content.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false)
    }

    /// True if the page URL's path or query contains `needle` (case-insensitive).
    pub fn url_contains(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        if self.url.path().to_lowercase().contains(&needle) {
            return true;
        }
        self.url
            .query()
            .map(|query| query.to_lowercase().contains(&needle))
            .unwrap_or(false)
    }

    /// True if the concatenated inline script text contains `needle`.
    pub fn inline_script_contains(&self, needle: &str) -> bool {
        self.inline_script.contains(needle)
    }

    /// True if the `<html>` root element carries any of the given attributes.
    ///
    /// Needed for attribute names a CSS selector cannot express (the AMP
    /// `⚡` attribute).
    pub fn html_root_has_attr(&self, names: &[&str]) -> bool {
        self.document
            .select(&HTML_ROOT_SELECTOR)
            .next()
            .map(|root| {
                root.value()
                    .attrs()
                    .any(|(name, _)| names.contains(&name))
            })
            .unwrap_or(false)
    }

    /// Iterates script `src` and link `href` values for supplementary scans.
    pub fn asset_urls(&self) -> impl Iterator<Item = &str> {
        self.script_sources
            .iter()
            .chain(self.link_hrefs.iter())
            .map(String::as_str)
    }
}

/// Statically extracts global identifier names from inline script text.
///
/// Two shapes count as a global: an assignment to a `window` property
/// (`window.React = …`, `window['React'] = …`) and a top-level
/// `var`/`let`/`const`/`function` declaration.
fn extract_globals(inline_script: &str) -> HashSet<String> {
    let mut globals = HashSet::new();

    for captures in WINDOW_ASSIGNMENT_RE.captures_iter(inline_script) {
        if let Some(name) = captures.get(1).or_else(|| captures.get(2)) {
            globals.insert(name.as_str().to_string());
        }
    }

    for captures in TOP_LEVEL_DECLARATION_RE.captures_iter(inline_script) {
        if let Some(name) = captures.get(1) {
            globals.insert(name.as_str().to_string());
        }
    }

    globals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(body: &str) -> PageSnapshot {
        PageSnapshot::parse("https://example.com/index.php?page=1", body)
            .expect("Failed to build snapshot")
    }

    #[test]
    fn test_extracts_script_sources_lowercased() {
        let snap = snapshot(r#"<html><head><script src="/JS/jQuery.MIN.js"></script></head></html>"#);
        assert!(snap.script_src_contains("jquery"));
        assert!(!snap.script_src_contains("react"));
    }

    #[test]
    fn test_extracts_link_hrefs() {
        let snap = snapshot(r#"<html><head><link rel="stylesheet" href="/wp-content/themes/x/style.css"></head></html>"#);
        assert!(snap.link_href_contains("wp-content"));
        assert!(snap.asset_url_contains("wp-content"));
    }

    #[test]
    fn test_extracts_meta_tags_by_name_and_property() {
        let snap = snapshot(
            r#"<html><head>
                <meta name="generator" content="WordPress 6.4">
                <meta property="og:site_name" content="Example">
            </head></html>"#,
        );
        assert!(snap.meta_content_contains("generator", "wordpress"));
        assert!(snap.meta_content_contains("og:site_name", "example"));
        assert!(!snap.meta_content_contains("generator", "drupal"));
    }

    #[test]
    fn test_extracts_window_assignment_globals() {
        let snap = snapshot(
            r#"<html><body><script>
                window.React = { version: "18.2.0" };
                window['Shopify'] = { shop: "x" };
            </script></body></html>"#,
        );
        assert!(snap.has_global("React"));
        assert!(snap.has_global("Shopify"));
        assert!(!snap.has_global("Vue"));
    }

    #[test]
    fn test_window_comparison_is_not_an_assignment() {
        let snap = snapshot(
            r#"<html><body><script>
                if (window.React == null) { console.log("no react"); }
            </script></body></html>"#,
        );
        assert!(!snap.has_global("React"));
    }

    #[test]
    fn test_extracts_top_level_declarations() {
        let snap = snapshot(
            r#"<html><body><script>
                var dataLayer = dataLayer || [];
                function gtag(){dataLayer.push(arguments);}
            </script></body></html>"#,
        );
        assert!(snap.has_global("dataLayer"));
        assert!(snap.has_global("gtag"));
        assert!(snap.any_global(&["missing", "gtag"]));
    }

    #[test]
    fn test_script_tag_ids() {
        let snap = snapshot(
            r#"<html><body><script id="__NEXT_DATA__" type="application/json">{}</script></body></html>"#,
        );
        assert!(snap.has_script_tag_id("__NEXT_DATA__"));
        assert!(!snap.has_script_tag_id("__NUXT__"));
    }

    #[test]
    fn test_matches_selector() {
        let snap = snapshot(r#"<html><body><div data-reactroot=""></div></body></html>"#);
        assert!(snap
            .matches_selector("[data-reactroot]")
            .expect("Selector should parse"));
        assert!(!snap
            .matches_selector("#__nuxt")
            .expect("Selector should parse"));
    }

    #[test]
    fn test_invalid_selector_is_an_error_not_a_panic() {
        let snap = snapshot("<html></html>");
        let result = snap.matches_selector("[[not-a-selector");
        assert!(matches!(result, Err(ProbeError::InvalidSelector { .. })));
    }

    #[test]
    fn test_url_contains() {
        let snap = snapshot("<html></html>");
        assert!(snap.url_contains(".php"));
        assert!(!snap.url_contains(".aspx"));
    }

    #[test]
    fn test_html_root_attrs() {
        let snap = snapshot(r#"<html amp><body></body></html>"#);
        assert!(snap.html_root_has_attr(&["amp", "⚡"]));
        let plain = snapshot("<html><body></body></html>");
        assert!(!plain.html_root_has_attr(&["amp", "⚡"]));
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let result = PageSnapshot::parse("not a url", "<html></html>");
        assert!(matches!(result, Err(SnapshotError::UrlError(_))));
    }

    #[test]
    fn test_malformed_markup_still_extracts() {
        let snap = snapshot(
            r#"<html><head><script src="/vendor/vue.js"><link href="/x.less"</head><body><div"#,
        );
        assert!(snap.script_src_contains("vue"));
    }
}
