#![allow(dead_code)]

use std::sync::Arc;

use editorial_governor::backend::ScriptedBackend;
use editorial_governor::governance::{GovernanceLoop, GovernancePolicy, Rubric};
use editorial_governor::sinks::{MemorySink, Sinks};

/// A draft that passes the default structural check: all three markers and
/// well over 300 words.
pub fn valid_draft(tag: &str) -> String {
    let body = (0..320)
        .map(|i| format!("{tag}{i}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("## Why\nWhy {tag} matters.\n## How\nHow it works.\n## What\nWhat next.\n\n{body}")
}

pub fn rubric(storytelling: u8, tone: u8, simplicity: u8, bias_flag: bool) -> Rubric {
    Rubric::new(
        storytelling,
        tone,
        simplicity,
        bias_flag,
        format!("feedback {storytelling}/{tone}/{simplicity}"),
    )
    .unwrap()
}

pub struct Harness {
    pub governance: GovernanceLoop,
    pub backend: Arc<ScriptedBackend>,
    pub sink: Arc<MemorySink>,
}

pub fn harness(backend: ScriptedBackend) -> Harness {
    harness_with_policy(backend, GovernancePolicy::default())
}

pub fn harness_with_policy(backend: ScriptedBackend, policy: GovernancePolicy) -> Harness {
    let backend = Arc::new(backend);
    let sink = Arc::new(MemorySink::new());
    let governance = GovernanceLoop::new(
        Arc::new(policy),
        backend.clone(),
        Sinks::shared(sink.clone()),
    );
    Harness {
        governance,
        backend,
        sink,
    }
}
