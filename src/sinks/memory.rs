use super::traits::{EscalationReporter, Publisher, Sink};
use crate::error::SinkError;
use crate::governance::{BlockNotice, EscalationReport, PublishedDraft};
use std::sync::{Mutex, PoisonError};

/// In-process recorder for tests and embedders.
#[derive(Debug, Default)]
pub struct MemorySink {
    published: Mutex<Vec<PublishedDraft>>,
    blocks: Mutex<Vec<BlockNotice>>,
    escalations: Mutex<Vec<EscalationReport>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<PublishedDraft> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn blocks(&self) -> Vec<BlockNotice> {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn escalations(&self) -> Vec<EscalationReport> {
        self.escalations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of terminal actions recorded across all kinds.
    pub fn total(&self) -> usize {
        self.published().len() + self.blocks().len() + self.escalations().len()
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }
}

impl Publisher for MemorySink {
    fn publish(&self, artifact: &PublishedDraft) -> Result<(), SinkError> {
        self.published
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(artifact.clone());
        Ok(())
    }
}

impl EscalationReporter for MemorySink {
    fn report_block(&self, notice: &BlockNotice) -> Result<(), SinkError> {
        self.blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
        Ok(())
    }

    fn escalate(&self, report: &EscalationReport) -> Result<(), SinkError> {
        self.escalations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }
}
