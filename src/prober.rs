//! Page probing: signature evaluation and result accumulation.
//!
//! The prober turns a fetched page into a [`DetectionResult`] by running the
//! signature registry through an error-isolating runner: a probe that returns
//! an error or panics is skipped and counted, and never affects any other
//! probe in the same or another category.
//!
//! Three variants of decreasing completeness exist, selected by the delivery
//! channel:
//! - [`ProbeDepth::Full`]: every signature tier plus the CDN asset scan
//! - [`ProbeDepth::Direct`]: core and standard tiers, no CDN scan
//! - the basic prober ([`basic_probe`]): core-tier raw-text markers over the
//!   unparsed body, with a guaranteed non-empty result

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::config::{BASIC_DETECTION_PLACEHOLDER, CDN_LIBRARY_MARKERS};
use crate::detection::{Category, DetectionResult};
use crate::error_handling::{ErrorStats, ErrorType};
use crate::signature::{signatures, Signature, Tier};
use crate::snapshot::{PageSnapshot, SnapshotError};

/// How deep a probing pass goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeDepth {
    /// Every signature tier plus the CDN asset scan
    Full,
    /// Core and standard tiers, no CDN scan
    Direct,
}

impl ProbeDepth {
    fn includes(self, tier: Tier) -> bool {
        match self {
            ProbeDepth::Full => true,
            ProbeDepth::Direct => tier <= Tier::Standard,
        }
    }

    fn scans_cdn_assets(self) -> bool {
        matches!(self, ProbeDepth::Full)
    }
}

/// Probes a fetched page at the given depth.
///
/// This is the total-failure boundary: whatever goes wrong inside — an
/// unparseable page URL, a panic in extraction — the caller gets a
/// well-formed result, falling back to the limited-detection diagnostic
/// entry. It never panics and never returns an error.
pub fn probe_page(url: &str, body: &str, depth: ProbeDepth, stats: &ErrorStats) -> DetectionResult {
    let outcome = catch_unwind(AssertUnwindSafe(
        || -> Result<DetectionResult, SnapshotError> {
            let snapshot = PageSnapshot::parse(url, body)?;
            Ok(run_probe(&snapshot, depth, stats))
        },
    ));

    match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            log::warn!("Probing failed for {}: {}", url, e);
            stats.increment(ErrorType::ProbeTotalFailure);
            DetectionResult::limited()
        }
        Err(_) => {
            log::warn!("Probing panicked for {}", url);
            stats.increment(ErrorType::ProbeTotalFailure);
            DetectionResult::limited()
        }
    }
}

/// Runs the registry against a snapshot and accumulates matches.
///
/// Category order and per-category signature order are registration order;
/// duplicate names are suppressed within each category's sequence.
pub fn run_probe(snapshot: &PageSnapshot, depth: ProbeDepth, stats: &ErrorStats) -> DetectionResult {
    let mut result = DetectionResult::new();

    for category in Category::ALL {
        run_signatures(&mut result, category, signatures(category), snapshot, depth, stats);
    }

    if depth.scans_cdn_assets() {
        scan_cdn_assets(&mut result, snapshot);
    }

    result
}

/// Evaluates one signature table through the isolating runner.
///
/// A probe `Err` or panic skips that signature only; the scan continues with
/// the next one.
fn run_signatures(
    result: &mut DetectionResult,
    category: Category,
    table: &[Signature],
    snapshot: &PageSnapshot,
    depth: ProbeDepth,
    stats: &ErrorStats,
) {
    for signature in table.iter().filter(|sig| depth.includes(sig.tier)) {
        match catch_unwind(AssertUnwindSafe(|| (signature.probe)(snapshot))) {
            Ok(Ok(true)) => result.push_unique(category, signature.name),
            Ok(Ok(false)) => {}
            Ok(Err(e)) => {
                log::debug!("Probe `{}` failed: {}", signature.name, e);
                stats.increment(ErrorType::ProbeEvaluationError);
            }
            Err(_) => {
                log::debug!("Probe `{}` panicked", signature.name);
                stats.increment(ErrorType::ProbePanic);
            }
        }
    }
}

/// Supplementary pass: scans script `src` and link `href` values for embedded
/// CDN library names and appends matches to the frontend sequence.
fn scan_cdn_assets(result: &mut DetectionResult, snapshot: &PageSnapshot) {
    for asset_url in snapshot.asset_urls() {
        for (marker, name) in CDN_LIBRARY_MARKERS {
            if asset_url.contains(marker) {
                result.push_unique(Category::Frontend, *name);
            }
        }
    }
}

/// Minimal fallback prober: core-tier raw-text markers over the unparsed
/// body.
///
/// No snapshot, no selector queries, no failure isolation — plain substring
/// scans that cannot fail. If nothing at all matches, the frontend sequence
/// carries a single completion entry so the caller can tell "scan ran, page
/// is quiet" from "scan never ran".
pub fn basic_probe(body: &str) -> DetectionResult {
    let body_lower = body.to_lowercase();
    let mut result = DetectionResult::new();

    for category in Category::ALL {
        for signature in signatures(category)
            .iter()
            .filter(|sig| sig.tier == Tier::Core)
        {
            if signature
                .raw_markers
                .iter()
                .any(|marker| body_lower.contains(marker))
            {
                result.push_unique(category, signature.name);
            }
        }
    }

    if result.is_empty() {
        result.push_unique(Category::Frontend, BASIC_DETECTION_PLACEHOLDER);
    }

    result
}
