//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the
//! application: network timeouts, the restricted-target prefix lists, the
//! renderer placeholder strings, and the CDN library marker table.

use std::time::Duration;

/// Default HTTP User-Agent header value.
/// Pages routinely serve reduced or blocked content to obvious bots, which
/// would starve the signature probes of the markup they inspect.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// URL prefixes that must never be analyzed: browser-internal pages,
/// extension pages, and local files across browser variants.
pub const RESTRICTED_URL_PREFIXES: &[&str] = &[
    "chrome://",
    "chrome-extension://",
    "moz-extension://",
    "about:",
    "file://",
    "edge://",
    "opera://",
    "brave://",
    "vivaldi://",
];

/// URL prefixes for inline content that is not a page at all.
pub const UNANALYZABLE_URL_PREFIXES: &[&str] = &["data:", "javascript:", "blob:"];

/// How long the delivery channel waits for a page agent to acknowledge
/// readiness before skipping the messaging method entirely.
pub const AGENT_READY_TIMEOUT: Duration = Duration::from_millis(500);

/// How long the delivery channel waits for a page agent's reply.
pub const AGENT_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Row text rendered for a category with no detected technologies.
pub const NONE_DETECTED_PLACEHOLDER: &str = "None detected";

/// Diagnostic entry returned when the probing routine fails as a whole.
pub const LIMITED_DETECTION_PLACEHOLDER: &str = "Analysis completed with limited detection";

/// Entry returned by the basic prober when nothing at all matched.
pub const BASIC_DETECTION_PLACEHOLDER: &str = "Basic detection completed";

/// Entry substituted into the frontend region when the renderer receives a
/// malformed detection payload.
pub const NO_DATA_PLACEHOLDER: &str = "No data available";

/// CDN library-name substrings scanned against script `src` and link `href`
/// values, with the technology name each marker maps to.
pub const CDN_LIBRARY_MARKERS: &[(&str, &str)] = &[
    ("axios", "Axios"),
    ("moment", "Moment.js"),
    ("chart", "Chart.js"),
    ("fontawesome", "Font Awesome"),
    ("font-awesome", "Font Awesome"),
];
