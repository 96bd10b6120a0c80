use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Types of recoverable errors that can occur during an analysis attempt.
///
/// This enum categorizes failure modes that the pipeline recovers from
/// (skipped signature, fallen-through delivery method) so they can be counted
/// without surfacing to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Delivery channel: messaging method
    AgentNotReady,
    AgentMessagingError,
    AgentMessagingTimeout,
    AgentMalformedReply,
    // Delivery channel: probing methods
    PageFetchError,
    PageFetchStatusError,
    PageFetchBodyError,
    // Prober
    ProbeEvaluationError,
    ProbePanic,
    ProbeTotalFailure,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::AgentNotReady => "Agent readiness timeout",
            ErrorType::AgentMessagingError => "Agent messaging error",
            ErrorType::AgentMessagingTimeout => "Agent messaging timeout",
            ErrorType::AgentMalformedReply => "Agent malformed reply",
            ErrorType::PageFetchError => "Page fetch error",
            ErrorType::PageFetchStatusError => "Page fetch status error",
            ErrorType::PageFetchBodyError => "Page fetch body error",
            ErrorType::ProbeEvaluationError => "Probe evaluation error",
            ErrorType::ProbePanic => "Probe panic",
            ErrorType::ProbeTotalFailure => "Probe total failure",
        }
    }
}

/// Thread-safe error statistics tracker.
///
/// Tracks the count of each error type using atomic counters, allowing
/// concurrent access from multiple tasks. All error types are initialized to
/// zero on creation.
///
/// # Thread Safety
///
/// This struct is thread-safe and can be shared across multiple tasks using `Arc`.
pub struct ErrorStats {
    errors: HashMap<ErrorType, AtomicUsize>,
}

impl ErrorStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }
        ErrorStats { errors }
    }

    pub fn increment(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|counter| counter.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Returns the total number of recorded errors across all types.
    pub fn total(&self) -> usize {
        self.errors
            .values()
            .map(|counter| counter.load(Ordering::Relaxed))
            .sum()
    }

    /// Logs a summary of all non-zero error counts at debug level.
    pub fn log_summary(&self) {
        for error in ErrorType::iter() {
            let count = self.count(error);
            if count > 0 {
                log::debug!("{}: {}", error.as_str(), count);
            }
        }
    }
}

impl Default for ErrorStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_stats_starts_at_zero() {
        let stats = ErrorStats::new();
        for error in ErrorType::iter() {
            assert_eq!(stats.count(error), 0);
        }
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn test_error_stats_increment() {
        let stats = ErrorStats::new();
        stats.increment(ErrorType::ProbeEvaluationError);
        stats.increment(ErrorType::ProbeEvaluationError);
        stats.increment(ErrorType::AgentMessagingTimeout);

        assert_eq!(stats.count(ErrorType::ProbeEvaluationError), 2);
        assert_eq!(stats.count(ErrorType::AgentMessagingTimeout), 1);
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn test_error_type_strings_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for error in ErrorType::iter() {
            assert!(
                seen.insert(error.as_str()),
                "Duplicate error description: {}",
                error.as_str()
            );
        }
    }
}
