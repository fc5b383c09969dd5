use errors::{RelayError, RelayErrorKind};
use serde::{Deserialize, Serialize};
use strum::Display;

/// What happened to the summary requested alongside a note save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Summarized(String),
    Skipped(SkipReason)
}

impl SummaryOutcome {
    pub fn summary(&self) -> Option<&str> {
        match self {
            Self::Summarized(summary) => Some(summary),
            Self::Skipped(_) => None
        }
    }

    pub fn into_summary(self) -> Option<String> {
        match self {
            Self::Summarized(summary) => Some(summary),
            Self::Skipped(_) => None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(tag = "reason", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// The caller did not ask for a summary.
    NotRequested,
    /// Content length is outside the summarizable range.
    Ineligible,
    RelayFailed { kind: RelayErrorKind }
}

impl From<&RelayError> for SkipReason {
    fn from(err: &RelayError) -> Self {
        if err.is_validation() {
            Self::Ineligible
        } else {
            Self::RelayFailed { kind: err.kind() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_errors_map_to_reasons() {
        assert_eq!(
            SkipReason::from(&RelayError::TextTooLong {
                length: 10_001,
                max: 10_000
            }),
            SkipReason::Ineligible
        );
        assert_eq!(
            SkipReason::from(&RelayError::RateLimited),
            SkipReason::RelayFailed {
                kind: RelayErrorKind::RateLimit
            }
        );
        assert_eq!(
            SkipReason::from(&RelayError::Configuration {
                message: "missing key".to_string()
            }),
            SkipReason::RelayFailed {
                kind: RelayErrorKind::Configuration
            }
        );
    }

    #[test]
    fn test_summary_accessors() {
        let done = SummaryOutcome::Summarized("Short.".to_string());
        assert_eq!(done.summary(), Some("Short."));
        assert_eq!(done.into_summary(), Some("Short.".to_string()));
        assert!(
            SummaryOutcome::Skipped(SkipReason::NotRequested)
                .summary()
                .is_none()
        );
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(SkipReason::Ineligible.to_string(), "ineligible");
        assert_eq!(SkipReason::NotRequested.to_string(), "not_requested");
    }
}
