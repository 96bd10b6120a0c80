//! Message envelope between the UI layer and a page agent.
//!
//! The wire format is fixed: requests carry an `action` discriminator,
//! replies carry a `success` flag plus either a `technologies` payload or an
//! `error` string. The reply is modeled as a plain struct rather than an
//! enum so that malformed combinations (success without a payload) can be
//! represented and rejected by the channel instead of failing deserialization.

use serde::{Deserialize, Serialize};

use crate::detection::DetectionResult;

/// A request from the UI layer to a page agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum AgentRequest {
    /// Run the prober and reply with a detection result.
    #[serde(rename = "analyzeTech")]
    AnalyzeTech,
}

/// A best-effort signal from a page agent to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum AgentSignal {
    /// The agent is resident and accepting requests.
    #[serde(rename = "contentScriptReady")]
    ContentScriptReady,
}

/// A page agent's reply to an [`AgentRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Whether the agent considers the request handled.
    #[serde(default)]
    pub success: bool,
    /// Detection result; present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<DetectionResult>,
    /// Error description; present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentResponse {
    /// A successful reply carrying `technologies`.
    pub fn ok(technologies: DetectionResult) -> Self {
        Self {
            success: true,
            technologies: Some(technologies),
            error: None,
        }
    }

    /// A failure reply carrying an error description.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            technologies: None,
            error: Some(error.into()),
        }
    }
}
