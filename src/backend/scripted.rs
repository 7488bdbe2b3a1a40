use super::traits::{BackendFuture, GenerationBackend};
use crate::error::BackendError;
use crate::governance::Rubric;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One call received by a [`ScriptedBackend`], with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Draft { topic: String },
    Critique { draft: String },
    Refine { feedback: String, draft: String },
}

#[derive(Default)]
struct Script {
    drafts: VecDeque<Result<String, BackendError>>,
    rubrics: VecDeque<Result<Rubric, BackendError>>,
    refinements: VecDeque<Result<String, BackendError>>,
    calls: Vec<BackendCall>,
}

/// Deterministic backend that replays queued responses and records calls.
///
/// An empty queue yields [`BackendError::Exhausted`].
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn with_draft(self, draft: impl Into<String>) -> Self {
        self.script().drafts.push_back(Ok(draft.into()));
        self
    }

    #[must_use]
    pub fn with_draft_error(self, err: BackendError) -> Self {
        self.script().drafts.push_back(Err(err));
        self
    }

    #[must_use]
    pub fn with_rubric(self, rubric: Rubric) -> Self {
        self.script().rubrics.push_back(Ok(rubric));
        self
    }

    #[must_use]
    pub fn with_critique_error(self, err: BackendError) -> Self {
        self.script().rubrics.push_back(Err(err));
        self
    }

    #[must_use]
    pub fn with_refinement(self, draft: impl Into<String>) -> Self {
        self.script().refinements.push_back(Ok(draft.into()));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.script().calls.clone()
    }

    pub fn draft_calls(&self) -> usize {
        self.count(|c| matches!(c, BackendCall::Draft { .. }))
    }

    pub fn critique_calls(&self) -> usize {
        self.count(|c| matches!(c, BackendCall::Critique { .. }))
    }

    pub fn refine_calls(&self) -> usize {
        self.count(|c| matches!(c, BackendCall::Refine { .. }))
    }

    fn count(&self, pred: impl Fn(&BackendCall) -> bool) -> usize {
        self.script().calls.iter().filter(|c| pred(c)).count()
    }
}

impl GenerationBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    fn draft<'a>(&'a self, topic: &'a str) -> BackendFuture<'a, String> {
        let mut script = self.script();
        script.calls.push(BackendCall::Draft {
            topic: topic.to_string(),
        });
        let next = script
            .drafts
            .pop_front()
            .unwrap_or(Err(BackendError::Exhausted { operation: "draft" }));
        Box::pin(async move { next })
    }

    fn critique<'a>(&'a self, draft: &'a str) -> BackendFuture<'a, Rubric> {
        let mut script = self.script();
        script.calls.push(BackendCall::Critique {
            draft: draft.to_string(),
        });
        let next = script.rubrics.pop_front().unwrap_or(Err(BackendError::Exhausted {
            operation: "critique",
        }));
        Box::pin(async move { next })
    }

    fn refine<'a>(&'a self, feedback: &'a str, draft: &'a str) -> BackendFuture<'a, String> {
        let mut script = self.script();
        script.calls.push(BackendCall::Refine {
            feedback: feedback.to_string(),
            draft: draft.to_string(),
        });
        let next = script.refinements.pop_front().unwrap_or(Err(BackendError::Exhausted {
            operation: "refine",
        }));
        Box::pin(async move { next })
    }
}
