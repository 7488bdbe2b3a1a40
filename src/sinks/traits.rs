use crate::error::SinkError;
use crate::governance::{BlockNotice, EscalationReport, PublishedDraft};

/// Common identity for terminal-action sinks.
pub trait Sink: Send + Sync {
    fn name(&self) -> &str;
}

/// Receives accepted drafts.
pub trait Publisher: Sink {
    fn publish(&self, artifact: &PublishedDraft) -> Result<(), SinkError>;
}

/// Receives runs that need a human: blocked topics and escalations.
pub trait EscalationReporter: Sink {
    fn report_block(&self, notice: &BlockNotice) -> Result<(), SinkError>;

    fn escalate(&self, report: &EscalationReport) -> Result<(), SinkError>;
}
