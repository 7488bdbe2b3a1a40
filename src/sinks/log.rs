use super::traits::{EscalationReporter, Publisher, Sink};
use crate::error::SinkError;
use crate::governance::{BlockNotice, EscalationReport, PublishedDraft};
use tracing::{error, info, warn};

/// Log-based sink: terminal actions become tracing events.
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for LogSink {
    fn name(&self) -> &str {
        "log"
    }
}

impl Publisher for LogSink {
    fn publish(&self, artifact: &PublishedDraft) -> Result<(), SinkError> {
        info!(
            run_id = %artifact.run_id,
            topic = %artifact.topic,
            score = artifact.score,
            attempt = artifact.attempt,
            words = artifact.draft.split_whitespace().count(),
            draft = %artifact.draft,
            "draft.published"
        );
        Ok(())
    }
}

impl EscalationReporter for LogSink {
    fn report_block(&self, notice: &BlockNotice) -> Result<(), SinkError> {
        warn!(
            run_id = %notice.run_id,
            topic = %notice.topic,
            matched_term = %notice.matched_term,
            "topic.blocked"
        );
        Ok(())
    }

    fn escalate(&self, report: &EscalationReport) -> Result<(), SinkError> {
        error!(
            run_id = %report.run_id,
            topic = %report.topic,
            reason = %report.reason,
            attempt = report.attempt,
            score = ?report.score,
            feedback = %report.feedback,
            preview = %report.draft_preview,
            "draft.escalated"
        );
        Ok(())
    }
}
