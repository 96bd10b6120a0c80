//! Analysis orchestration.
//!
//! One call to [`run_analysis`] is one user-triggered attempt: show the URL
//! label and the loading indicator, drive the delivery channel, render the
//! result or the error, and clear the loading indicator whatever happened.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::channel::DeliveryChannel;
use crate::config::Config;
use crate::error_handling::ErrorStats;
use crate::fetch::HttpSource;
use crate::render::ResultPanel;

/// Outcome of one analysis attempt.
pub struct AnalysisReport {
    /// The analyzed target URL
    pub url: String,
    /// The rendered panel (results or error region populated)
    pub panel: ResultPanel,
    /// Whether a detection result was obtained
    pub succeeded: bool,
    /// Wall-clock duration of the attempt
    pub elapsed_seconds: f64,
}

/// Runs one analysis attempt against the configured target.
///
/// Channel failures are not errors at this layer: they render into the
/// panel's error region and the report's `succeeded` flag. Only setup
/// failures (an unbuildable HTTP client) propagate.
pub async fn run_analysis(config: &Config) -> Result<AnalysisReport> {
    let stats = Arc::new(ErrorStats::new());
    let source = HttpSource::new(config).context("Failed to initialize HTTP client")?;
    let channel = DeliveryChannel::new(source, Arc::clone(&stats));

    let mut panel = ResultPanel::new();
    panel.set_url_label(&config.target);
    panel.set_loading(true);

    let started = Instant::now();
    let outcome = channel.acquire(&config.target).await;
    let elapsed_seconds = started.elapsed().as_secs_f64();

    let succeeded = match &outcome {
        Ok(result) => {
            log::info!(
                "Analysis of {} finished in {:.1}s",
                config.target,
                elapsed_seconds
            );
            panel.render_result(result);
            true
        }
        Err(e) => {
            log::error!("Analysis of {} failed: {}", config.target, e);
            panel.show_error(&e.to_string());
            false
        }
    };

    // The loading indicator must not survive the attempt, on any outcome path.
    panel.set_loading(false);
    stats.log_summary();

    Ok(AnalysisReport {
        url: config.target.clone(),
        panel,
        succeeded,
        elapsed_seconds,
    })
}
