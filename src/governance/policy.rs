use super::structure::StructuralValidator;
use super::topic_gate::TopicGate;
use crate::config::GovernanceConfig;
use crate::error::ConfigError;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_PASSING_SCORE: f64 = 7.0;
pub const DEFAULT_MIN_WORDS: usize = 300;
pub const DEFAULT_REQUIRED_MARKERS: [&str; 3] = ["why", "how", "what"];
pub const DEFAULT_BLOCKED_TOPICS: [&str; 4] = ["religion", "gender disparity", "geopolitics", "caste"];

/// Characters of the current draft included in an escalation report.
pub const ESCALATION_PREVIEW_CHARS: usize = 100;

/// Immutable governance constants for one loop instance.
///
/// Built once from configuration and shared read-only by every run.
#[derive(Debug, Clone, PartialEq)]
pub struct GovernancePolicy {
    pub max_retries: u32,
    pub passing_score: f64,
    pub gate: TopicGate,
    pub validator: StructuralValidator,
}

impl GovernancePolicy {
    pub fn from_config(config: &GovernanceConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            max_retries: config.max_retries,
            passing_score: config.passing_score,
            gate: TopicGate::new(&config.blocked_topics),
            validator: StructuralValidator::new(config.min_words, &config.required_markers),
        })
    }
}

impl Default for GovernancePolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            passing_score: DEFAULT_PASSING_SCORE,
            gate: TopicGate::default(),
            validator: StructuralValidator::default(),
        }
    }
}
