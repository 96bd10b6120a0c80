//! tech_probe library: page technology detection
//!
//! This library inspects a web page for technology signatures (global
//! variable markers, script and stylesheet URLs, CSS attribute markers, meta
//! tags) and guesses which frontend frameworks, backend frameworks, analytics
//! tools, and CMS/e-commerce platforms the page uses.
//!
//! # Example
//!
//! ```no_run
//! use tech_probe::{run_analysis, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     target: "https://example.com".to_string(),
//!     ..Default::default()
//! };
//!
//! let report = run_analysis(&config).await?;
//! report.panel.write_to(&mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! The analysis path is async and requires a Tokio runtime. Use
//! `#[tokio::main]` in your application or ensure you're calling library
//! functions within an async context.

#![warn(missing_docs)]

mod app;
pub mod channel;
pub mod config;
pub mod detection;
mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod prober;
pub mod render;
pub mod signature;
pub mod snapshot;

// Re-export public API
pub use app::{run_analysis, AnalysisReport};
pub use channel::{
    ensure_analyzable, AgentRequest, AgentResponse, AgentSignal, ChannelError, DeliveryChannel,
    PageAgent, ResidentAgent,
};
pub use config::{Config, LogLevel};
pub use detection::{Category, DetectionResult};
pub use error_handling::{ErrorStats, ErrorType, InitializationError};
pub use fetch::{FetchError, FetchMode, FetchedPage, HttpSource, PageSource};
pub use prober::{basic_probe, probe_page, run_probe, ProbeDepth};
pub use render::ResultPanel;
pub use snapshot::{PageSnapshot, ProbeError, SnapshotError};
