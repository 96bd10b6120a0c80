//! Page agent collaborator seam.
//!
//! A page agent is a page-resident collaborator that accepts an analyze
//! request and returns a detection result or an error descriptor. The
//! delivery channel only ever talks to the [`PageAgent`] trait; the concrete
//! transport is the implementor's business.
//!
//! [`ResidentAgent`] is the in-process reference implementation: it holds one
//! fetched page and answers requests by running the full prober over it. It
//! announces itself with a best-effort readiness signal on creation, and its
//! readiness acknowledgment replaces the fixed "assume the agent is up after
//! a delay" timing of naive implementations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::envelope::{AgentRequest, AgentResponse, AgentSignal};
use super::ChannelError;
use crate::error_handling::ErrorStats;
use crate::fetch::FetchedPage;
use crate::prober::{probe_page, ProbeDepth};

/// A page-resident collaborator that can execute a prober on request.
#[async_trait]
pub trait PageAgent: Send + Sync {
    /// Waits up to `timeout` for the agent to acknowledge it is resident and
    /// accepting requests. Returns `false` if the acknowledgment does not
    /// arrive in time.
    async fn ready(&self, timeout: Duration) -> bool;

    /// Sends one request and awaits the reply.
    ///
    /// # Errors
    ///
    /// Returns a [`ChannelError`] for transport-level failures; protocol
    /// failures travel inside the [`AgentResponse`].
    async fn request(&self, request: AgentRequest) -> Result<AgentResponse, ChannelError>;
}

/// In-process page agent holding one fetched page.
pub struct ResidentAgent {
    page: FetchedPage,
    stats: Arc<ErrorStats>,
}

impl ResidentAgent {
    /// Creates an agent for a fetched page.
    pub fn new(page: FetchedPage, stats: Arc<ErrorStats>) -> Self {
        Self { page, stats }
    }

    /// Creates an agent and announces readiness on `notifier`.
    ///
    /// The signal is best-effort: a closed receiver is ignored.
    pub fn with_ready_notifier(
        page: FetchedPage,
        stats: Arc<ErrorStats>,
        notifier: &UnboundedSender<AgentSignal>,
    ) -> Self {
        if notifier.send(AgentSignal::ContentScriptReady).is_err() {
            log::debug!("Readiness signal dropped: no listener");
        }
        Self::new(page, stats)
    }
}

#[async_trait]
impl PageAgent for ResidentAgent {
    async fn ready(&self, _timeout: Duration) -> bool {
        // Resident by construction; acknowledges immediately.
        true
    }

    async fn request(&self, request: AgentRequest) -> Result<AgentResponse, ChannelError> {
        match request {
            AgentRequest::AnalyzeTech => {
                let technologies =
                    probe_page(&self.page.url, &self.page.body, ProbeDepth::Full, &self.stats);
                Ok(AgentResponse::ok(technologies))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn page(body: &str) -> FetchedPage {
        FetchedPage {
            url: "https://example.com/".to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_resident_agent_acknowledges_readiness() {
        let agent = ResidentAgent::new(page("<html></html>"), Arc::new(ErrorStats::new()));
        assert!(agent.ready(Duration::from_millis(1)).await);
    }

    #[tokio::test]
    async fn test_resident_agent_answers_analyze_request() {
        let agent = ResidentAgent::new(
            page(r#"<html><body><script>window.React = {};</script></body></html>"#),
            Arc::new(ErrorStats::new()),
        );

        let reply = agent
            .request(AgentRequest::AnalyzeTech)
            .await
            .expect("Request should succeed");
        assert!(reply.success);
        let technologies = reply.technologies.expect("Payload should be present");
        assert_eq!(technologies.frontend, vec!["React"]);
    }

    #[tokio::test]
    async fn test_resident_agent_emits_ready_signal() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _agent = ResidentAgent::with_ready_notifier(
            page("<html></html>"),
            Arc::new(ErrorStats::new()),
            &tx,
        );
        assert!(matches!(
            rx.try_recv(),
            Ok(AgentSignal::ContentScriptReady)
        ));
    }

    #[tokio::test]
    async fn test_ready_signal_failure_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        // Must not panic or error out even though nobody is listening.
        let _agent = ResidentAgent::with_ready_notifier(
            page("<html></html>"),
            Arc::new(ErrorStats::new()),
            &tx,
        );
    }
}
