use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `editorial-governor`.
///
/// A governed run either reaches one of its terminal outcomes (blocked,
/// published, escalated) or fails with one of these. Policy blocks and
/// escalations are outcomes, never errors. Internal plumbing keeps using
/// `anyhow::Result` for context chains and folds into [`GovernorError::Other`].
#[derive(Debug, Error)]
pub enum GovernorError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generation backend ──────────────────────────────────────────────
    #[error("backend: {0}")]
    Backend(#[from] BackendError),

    // ── Terminal-action sinks ───────────────────────────────────────────
    #[error("sink: {0}")]
    Sink(#[from] SinkError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Backend errors ──────────────────────────────────────────────────────────

/// Failures of the generation backend collaborator.
///
/// None of these are retried by the governance loop; a calling layer may wrap
/// the provider with its own retry policy (see `ReliableProvider`).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{operation} request failed: {message}")]
    Request {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: &'static str,
        timeout_secs: u64,
    },

    #[error("malformed rubric: {0}")]
    MalformedRubric(String),

    #[error("{operation} returned an empty response")]
    EmptyResponse { operation: &'static str },

    #[error("scripted backend has no {operation} response left")]
    Exhausted { operation: &'static str },
}

// ─── Sink errors ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink {sink} failed to publish: {message}")]
    Publish { sink: String, message: String },

    #[error("sink {sink} failed to report: {message}")]
    Report { sink: String, message: String },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, GovernorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = GovernorError::Config(ConfigError::Validation("max_retries is 0".into()));
        assert!(err.to_string().contains("validation failed"));
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn backend_timeout_displays_operation_and_duration() {
        let err = GovernorError::Backend(BackendError::Timeout {
            operation: "critique",
            timeout_secs: 120,
        });
        let text = err.to_string();
        assert!(text.contains("critique"));
        assert!(text.contains("120s"));
    }

    #[test]
    fn malformed_rubric_displays_detail() {
        let err = GovernorError::from(BackendError::MalformedRubric(
            "tone=11 outside 1..=10".into(),
        ));
        assert!(err.to_string().contains("tone=11"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let err: GovernorError = anyhow_err.into();
        assert!(err.to_string().contains("something went wrong"));
    }

    #[test]
    fn sink_publish_error_names_sink() {
        let err = GovernorError::Sink(SinkError::Publish {
            sink: "file".into(),
            message: "permission denied".into(),
        });
        assert!(err.to_string().contains("file"));
        assert!(err.to_string().contains("permission denied"));
    }
}
