pub mod orchestrator;
pub mod outcome;
pub mod policy;
pub mod rubric;
pub mod score;
pub mod structure;
pub mod topic_gate;
pub mod trend;

pub use orchestrator::GovernanceLoop;
pub use outcome::{
    BlockNotice, CallLedger, EscalationReason, EscalationReport, LoopStage, PublishedDraft,
    RunOutcome, draft_preview,
};
pub use policy::GovernancePolicy;
pub use rubric::Rubric;
pub use score::weighted_score;
pub use structure::{StructuralValidator, StructureReport};
pub use topic_gate::TopicGate;
pub use trend::ExecutionState;
