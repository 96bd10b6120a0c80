// Shared test helpers: fixture pages and scripted collaborator doubles.
//
// This module provides common utilities used across multiple test files to
// reduce duplication.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use tech_probe::{
    AgentRequest, AgentResponse, ChannelError, FetchError, FetchMode, FetchedPage, PageAgent,
    PageSource,
};

/// Builds a fetched page from a body, rooted at a plain https URL.
#[allow(dead_code)] // Used by other test files
pub fn page(body: &str) -> FetchedPage {
    FetchedPage {
        url: "https://example.com/".to_string(),
        body: body.to_string(),
    }
}

/// A page with one frontend marker and nothing else.
#[allow(dead_code)]
pub fn vue_only_page() -> FetchedPage {
    page(r#"<html><body><script>window.Vue = { version: "3.4.0" };</script></body></html>"#)
}

/// A page exercising all four categories plus a CDN-scanned asset.
#[allow(dead_code)]
pub fn rich_page() -> FetchedPage {
    page(
        r#"<html>
<head>
    <link rel="stylesheet" href="/wp-content/themes/storefront/style.css">
    <script src="https://www.google-analytics.com/analytics.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/axios/dist/axios.min.js"></script>
</head>
<body>
    <form method="post">
        <input type="hidden" name="csrfmiddlewaretoken" value="token">
    </form>
    <script>window.React = {};</script>
</body>
</html>"#,
    )
}

/// A page that only the basic prober's raw markers would notice.
#[allow(dead_code)]
pub fn basic_markers_page() -> FetchedPage {
    page(
        r#"<html><head>
    <script src="/assets/jquery-3.6.0.min.js"></script>
    <link rel="stylesheet" href="/wp-content/themes/x/style.css">
</head></html>"#,
    )
}

/// A page with no technology markers at all.
#[allow(dead_code)]
pub fn blank_page() -> FetchedPage {
    page("<html><head><title>hi</title></head><body><p>plain</p></body></html>")
}

/// Scripted page source: serves a fixed page per fetch mode (`None` means
/// that mode fails) and counts every fetch call.
pub struct ScriptedSource {
    standard: Option<FetchedPage>,
    lenient: Option<FetchedPage>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    /// Creates a source plus a handle to its fetch-call counter (the source
    /// itself is consumed by the channel).
    #[allow(dead_code)]
    pub fn new(
        standard: Option<FetchedPage>,
        lenient: Option<FetchedPage>,
    ) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                standard,
                lenient,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

#[async_trait]
impl PageSource for ScriptedSource {
    async fn fetch(&self, _url: &str, mode: FetchMode) -> Result<FetchedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = match mode {
            FetchMode::Standard => &self.standard,
            FetchMode::Lenient => &self.lenient,
        };
        scripted.clone().ok_or(FetchError::StatusError(503))
    }
}

/// Scripted page agent: fixed readiness plus a fixed reply or transport
/// error.
pub struct ScriptedAgent {
    ready: bool,
    reply: Result<AgentResponse, String>,
}

impl ScriptedAgent {
    /// A ready agent that answers every request with `reply`.
    #[allow(dead_code)]
    pub fn replying(reply: AgentResponse) -> Self {
        Self {
            ready: true,
            reply: Ok(reply),
        }
    }

    /// A ready agent whose transport always fails.
    #[allow(dead_code)]
    pub fn failing(message: &str) -> Self {
        Self {
            ready: true,
            reply: Err(message.to_string()),
        }
    }

    /// An agent that never acknowledges readiness.
    #[allow(dead_code)]
    pub fn never_ready() -> Self {
        Self {
            ready: false,
            reply: Err("unreachable".to_string()),
        }
    }
}

#[async_trait]
impl PageAgent for ScriptedAgent {
    async fn ready(&self, _timeout: Duration) -> bool {
        self.ready
    }

    async fn request(&self, _request: AgentRequest) -> Result<AgentResponse, ChannelError> {
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(message) => Err(ChannelError::Transport(message.clone())),
        }
    }
}
