//! Delivery channel: obtaining a detection result for a target page.
//!
//! The channel tries up to three methods in a fixed order, taking the first
//! that produces a result. There is no retry or backoff; each method either
//! yields a result or the channel falls through to the next:
//!
//! 1. *Messaging*: ask an attached page agent (the most capable prober — the
//!    full signature set plus the CDN asset scan runs where the page lives).
//! 2. *Direct probe*: fetch the page under the standard mode and run the
//!    direct prober over a snapshot.
//! 3. *Basic probe*: fetch leniently and run the raw-text basic prober.
//!
//! Restricted targets (browser-internal pages, extension pages, local files,
//! and `data:`/`javascript:`/`blob:` content) are rejected before method 1 —
//! no fetch is ever issued against them.

mod agent;
mod envelope;

pub use agent::{PageAgent, ResidentAgent};
pub use envelope::{AgentRequest, AgentResponse, AgentSignal};

use std::sync::Arc;

use thiserror::Error;

use crate::config::{
    AGENT_MESSAGE_TIMEOUT, AGENT_READY_TIMEOUT, RESTRICTED_URL_PREFIXES, UNANALYZABLE_URL_PREFIXES,
};
use crate::detection::DetectionResult;
use crate::error_handling::{ErrorStats, ErrorType};
use crate::fetch::{FetchError, FetchMode, PageSource};
use crate::prober::{basic_probe, probe_page, ProbeDepth};

/// Error types for the delivery channel.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The target is a browser-internal, extension, or local-file URL.
    #[error("Cannot analyze browser internal pages, extensions, or local files. Please navigate to a regular website.")]
    RestrictedTarget,

    /// The target is inline content (`data:`/`javascript:`/`blob:`), not a page.
    #[error("Cannot analyze this type of content. Please navigate to a regular website.")]
    UnanalyzableContent,

    /// The agent transport failed (send error, closed channel, …).
    #[error("Agent transport error: {0}")]
    Transport(String),

    /// The agent did not reply within the message timeout.
    #[error("Agent reply timed out")]
    Timeout,

    /// The agent replied, but the reply failed shape validation.
    #[error("Malformed agent reply: {0}")]
    MalformedReply(String),

    /// Every delivery method failed.
    #[error("Unable to analyze this webpage. The page may have security restrictions or be blocking script execution.")]
    Exhausted,
}

/// True if `url` targets a browser-internal page, an extension page, or a
/// local file. Comparison is case-insensitive.
pub fn is_restricted_url(url: &str) -> bool {
    let url = url.trim().to_lowercase();
    RESTRICTED_URL_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

/// True if `url` is inline content rather than a page.
pub fn is_unanalyzable_url(url: &str) -> bool {
    let url = url.trim().to_lowercase();
    UNANALYZABLE_URL_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

/// Rejects targets that must never be probed.
///
/// # Errors
///
/// [`ChannelError::RestrictedTarget`] or [`ChannelError::UnanalyzableContent`]
/// depending on which list the target matches.
pub fn ensure_analyzable(url: &str) -> Result<(), ChannelError> {
    if is_restricted_url(url) {
        return Err(ChannelError::RestrictedTarget);
    }
    if is_unanalyzable_url(url) {
        return Err(ChannelError::UnanalyzableContent);
    }
    Ok(())
}

/// The popup-to-page hand-off: acquires one detection result per call using
/// the most capable method that succeeds.
pub struct DeliveryChannel<S: PageSource> {
    source: S,
    agent: Option<Arc<dyn PageAgent>>,
    stats: Arc<ErrorStats>,
}

impl<S: PageSource> DeliveryChannel<S> {
    /// Creates a channel over a page source, with no agent attached.
    pub fn new(source: S, stats: Arc<ErrorStats>) -> Self {
        Self {
            source,
            agent: None,
            stats,
        }
    }

    /// Attaches a page agent for the messaging method.
    pub fn with_agent(mut self, agent: Arc<dyn PageAgent>) -> Self {
        self.agent = Some(agent);
        self
    }

    /// Obtains one detection result for `target`.
    ///
    /// # Errors
    ///
    /// Fails fast on restricted targets; otherwise only
    /// [`ChannelError::Exhausted`] once every method has failed.
    pub async fn acquire(&self, target: &str) -> Result<DetectionResult, ChannelError> {
        ensure_analyzable(target)?;

        if let Some(result) = self.try_messaging().await {
            return Ok(result);
        }
        if let Some(result) = self.try_direct_probe(target).await {
            return Ok(result);
        }
        match self.try_basic_probe(target).await {
            Some(result) => Ok(result),
            None => Err(ChannelError::Exhausted),
        }
    }

    /// Method 1: ask the attached page agent.
    async fn try_messaging(&self) -> Option<DetectionResult> {
        let agent = match &self.agent {
            Some(agent) => agent,
            None => {
                log::debug!("No page agent attached; skipping messaging method");
                return None;
            }
        };

        if !agent.ready(AGENT_READY_TIMEOUT).await {
            log::debug!("Page agent did not acknowledge readiness");
            self.stats.increment(ErrorType::AgentNotReady);
            return None;
        }

        let reply = match tokio::time::timeout(
            AGENT_MESSAGE_TIMEOUT,
            agent.request(AgentRequest::AnalyzeTech),
        )
        .await
        {
            Err(_) => {
                log::debug!("Messaging method timed out");
                self.stats.increment(ErrorType::AgentMessagingTimeout);
                return None;
            }
            Ok(Err(e)) => {
                log::debug!("Messaging method failed: {}", e);
                self.stats.increment(ErrorType::AgentMessagingError);
                return None;
            }
            Ok(Ok(reply)) => reply,
        };

        match validate_reply(reply) {
            Ok(technologies) => Some(technologies),
            Err(reason) => {
                log::debug!("Messaging method returned a malformed reply: {}", reason);
                self.stats.increment(ErrorType::AgentMalformedReply);
                None
            }
        }
    }

    /// Method 2: fetch and run the direct prober.
    async fn try_direct_probe(&self, target: &str) -> Option<DetectionResult> {
        let page = match self.source.fetch(target, FetchMode::Standard).await {
            Ok(page) => page,
            Err(e) => {
                log::debug!("Direct probe fetch failed: {}", e);
                self.stats.increment(fetch_error_type(&e));
                return None;
            }
        };
        Some(probe_page(
            &page.url,
            &page.body,
            ProbeDepth::Direct,
            &self.stats,
        ))
    }

    /// Method 3: lenient fetch and the raw-text basic prober.
    async fn try_basic_probe(&self, target: &str) -> Option<DetectionResult> {
        let page = match self.source.fetch(target, FetchMode::Lenient).await {
            Ok(page) => page,
            Err(e) => {
                log::debug!("Basic probe fetch failed: {}", e);
                self.stats.increment(fetch_error_type(&e));
                return None;
            }
        };
        Some(basic_probe(&page.body))
    }
}

/// Maps a fetch failure onto its error-stats category.
fn fetch_error_type(error: &FetchError) -> ErrorType {
    match error {
        FetchError::StatusError(_) => ErrorType::PageFetchStatusError,
        FetchError::NotHtml => ErrorType::PageFetchBodyError,
        _ => ErrorType::PageFetchError,
    }
}

/// Shape validation for an agent reply: the success flag must be set and the
/// payload present.
fn validate_reply(reply: AgentResponse) -> Result<DetectionResult, String> {
    if !reply.success {
        return Err(match reply.error {
            Some(error) => format!("agent reported failure: {}", error),
            None => "success flag not set".to_string(),
        });
    }
    reply
        .technologies
        .ok_or_else(|| "missing technologies payload".to_string())
}
