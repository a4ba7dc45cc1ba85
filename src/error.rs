//! Error taxonomy for the planning pipeline.
//!
//! Malformed data is normalized rather than reported. Errors are reserved for
//! rejected requests, failing upstream sources, and broken stage invariants.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("draft source failed: {0}")]
    DraftSource(String),

    #[error("weather source failed: {0}")]
    WeatherSource(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("day {day}: {detail}")]
    Invariant { day: usize, detail: String },
}

pub type Result<T> = std::result::Result<T, PlanError>;

impl PlanError {
    /// Stable code for structured status payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::InvalidInput(_) => "invalid_input",
            PlanError::DraftSource(_)
            | PlanError::WeatherSource(_)
            | PlanError::Http(_)
            | PlanError::Json(_) => "external_source_failure",
            PlanError::Invariant { .. } => "invariant_violation",
        }
    }

    /// Whether the pipeline may continue in a degraded mode after this error.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            PlanError::WeatherSource(_) | PlanError::Http(_) | PlanError::Invariant { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        assert_eq!(PlanError::InvalidInput("x".into()).kind(), "invalid_input");
        assert_eq!(PlanError::DraftSource("x".into()).kind(), "external_source_failure");
        assert_eq!(
            PlanError::Invariant { day: 1, detail: "overlap".into() }.kind(),
            "invariant_violation"
        );
    }

    #[test]
    fn test_draft_failure_is_not_degradable() {
        assert!(!PlanError::DraftSource("timeout".into()).is_degradable());
        assert!(PlanError::WeatherSource("timeout".into()).is_degradable());
    }
}
