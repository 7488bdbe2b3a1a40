use super::policy::ESCALATION_PREVIEW_CHARS;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Loop stages, used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoopStage {
    Gated,
    Drafting,
    Validating,
    Critiquing,
    Deciding,
    Refining,
    Published,
    Escalated,
}

/// Why a run was handed to a human reviewer.
///
/// When several conditions hold at once the first listed wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EscalationReason {
    Bias,
    Stagnation,
    BudgetExhausted,
}

/// Topic rejected by the gate before any generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockNotice {
    pub run_id: String,
    pub topic: String,
    pub matched_term: String,
}

/// Accepted final draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedDraft {
    pub run_id: String,
    pub topic: String,
    pub draft: String,
    pub score: f64,
    pub attempt: u32,
}

/// Hand-off to a human reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationReport {
    pub run_id: String,
    pub topic: String,
    pub reason: EscalationReason,
    pub feedback: String,
    pub draft_preview: String,
    pub attempt: u32,
    /// Score of the last critique, `None` when no draft was ever scored.
    pub score: Option<f64>,
}

/// Number of backend calls a run made, per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallLedger {
    pub drafts: u32,
    pub critiques: u32,
    pub refinements: u32,
}

impl CallLedger {
    pub fn total(&self) -> u32 {
        self.drafts + self.critiques + self.refinements
    }
}

/// Terminal state of a run that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Blocked(BlockNotice),
    Published {
        artifact: PublishedDraft,
        calls: CallLedger,
    },
    Escalated {
        report: EscalationReport,
        calls: CallLedger,
    },
}

impl RunOutcome {
    pub fn calls(&self) -> CallLedger {
        match self {
            Self::Blocked(_) => CallLedger::default(),
            Self::Published { calls, .. } | Self::Escalated { calls, .. } => *calls,
        }
    }

    pub fn stage(&self) -> LoopStage {
        match self {
            Self::Blocked(_) => LoopStage::Gated,
            Self::Published { .. } => LoopStage::Published,
            Self::Escalated { .. } => LoopStage::Escalated,
        }
    }

    pub fn run_id(&self) -> &str {
        match self {
            Self::Blocked(notice) => &notice.run_id,
            Self::Published { artifact, .. } => &artifact.run_id,
            Self::Escalated { report, .. } => &report.run_id,
        }
    }
}

/// First `ESCALATION_PREVIEW_CHARS` characters of a draft, with an ellipsis
/// when anything was cut.
pub fn draft_preview(draft: &str) -> String {
    let mut chars = draft.char_indices();
    match chars.nth(ESCALATION_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &draft[..cut]),
        None => draft.to_string(),
    }
}
