use super::outcome::{
    BlockNotice, CallLedger, EscalationReason, EscalationReport, LoopStage, PublishedDraft,
    RunOutcome, draft_preview,
};
use super::policy::GovernancePolicy;
use super::rubric::Rubric;
use super::score::weighted_score;
use super::trend::ExecutionState;
use crate::backend::GenerationBackend;
use crate::error::Result;
use crate::sinks::{EscalationReporter, Publisher, Sinks};
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

const NO_VALID_STRUCTURE_FEEDBACK: &str = "no draft passed structural validation";

/// Bounded draft → validate → critique → decide loop for one topic.
///
/// Holds only immutable policy and shared collaborators; every call to
/// [`GovernanceLoop::execute`] builds its own per-run state, so one loop can
/// serve concurrent runs.
pub struct GovernanceLoop {
    policy: Arc<GovernancePolicy>,
    backend: Arc<dyn GenerationBackend>,
    publisher: Arc<dyn Publisher>,
    reporter: Arc<dyn EscalationReporter>,
}

/// Mutable state owned by a single run.
struct Run<'a> {
    run_id: String,
    topic: &'a str,
    draft: String,
    state: ExecutionState,
    calls: CallLedger,
}

impl GovernanceLoop {
    pub fn new(
        policy: Arc<GovernancePolicy>,
        backend: Arc<dyn GenerationBackend>,
        sinks: Sinks,
    ) -> Self {
        Self {
            policy,
            backend,
            publisher: sinks.publisher,
            reporter: sinks.reporter,
        }
    }

    pub fn policy(&self) -> &GovernancePolicy {
        &self.policy
    }

    /// Run one topic to a terminal outcome.
    ///
    /// Returns `Err` only for backend or sink failures; blocks and
    /// escalations are outcomes.
    pub async fn execute(&self, topic: &str) -> Result<RunOutcome> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("governance_run", run_id = %run_id);
        self.execute_run(run_id, topic).instrument(span).await
    }

    async fn execute_run(&self, run_id: String, topic: &str) -> Result<RunOutcome> {
        if let Some(term) = self.policy.gate.matched_term(topic) {
            let notice = BlockNotice {
                run_id,
                topic: topic.to_string(),
                matched_term: term.to_string(),
            };
            info!(stage = %LoopStage::Gated, matched_term = term, "Topic blocked before drafting");
            self.reporter.report_block(&notice)?;
            return Ok(RunOutcome::Blocked(notice));
        }

        debug!(stage = %LoopStage::Drafting, "Requesting initial draft");
        let draft = self.backend.draft(topic).await?;
        let mut run = Run {
            run_id,
            topic,
            draft,
            state: ExecutionState::new(),
            calls: CallLedger {
                drafts: 1,
                ..CallLedger::default()
            },
        };

        let max_retries = self.policy.max_retries;
        for attempt in 1..=max_retries {
            info!(attempt, max_retries, "Iteration starting");

            let structure = self.policy.validator.inspect(Some(&run.draft));
            if !structure.is_valid() {
                warn!(
                    stage = %LoopStage::Validating,
                    attempt,
                    problem = %structure.failure_summary().unwrap_or_default(),
                    "Structural check failed"
                );
                let prompt = format!(
                    "{}\n\nTopic: {}",
                    self.policy.validator.corrective_instruction(),
                    run.topic
                );
                run.draft = self.backend.draft(&prompt).await?;
                run.calls.drafts += 1;
                continue;
            }

            debug!(stage = %LoopStage::Critiquing, attempt, "Requesting critique");
            let rubric = self.backend.critique(&run.draft).await?;
            run.calls.critiques += 1;

            let score = weighted_score(&rubric);
            run.state.update(score);
            info!(
                stage = %LoopStage::Deciding,
                attempt,
                score,
                bias_flag = rubric.bias_flag,
                stagnating = run.state.is_stagnating(),
                "Draft scored"
            );

            if let Some(reason) = self.escalation_reason(&rubric, &run.state, attempt) {
                return self.escalate(run, reason, rubric.feedback, attempt, Some(score));
            }

            if score >= self.policy.passing_score {
                return self.publish(run, score, attempt);
            }

            debug!(stage = %LoopStage::Refining, attempt, "Score below threshold, refining");
            run.draft = self.backend.refine(&rubric.feedback, &run.draft).await?;
            run.calls.refinements += 1;
        }

        // Only reachable when the final attempt failed the structural check.
        let score = (run.state.iteration_count() > 0).then(|| run.state.last_score());
        self.escalate(
            run,
            EscalationReason::BudgetExhausted,
            NO_VALID_STRUCTURE_FEEDBACK.to_string(),
            max_retries,
            score,
        )
    }

    /// Bias outranks stagnation, which outranks the exhausted budget.
    fn escalation_reason(
        &self,
        rubric: &Rubric,
        state: &ExecutionState,
        attempt: u32,
    ) -> Option<EscalationReason> {
        if rubric.bias_flag {
            Some(EscalationReason::Bias)
        } else if state.is_stagnating() {
            Some(EscalationReason::Stagnation)
        } else if attempt >= self.policy.max_retries {
            Some(EscalationReason::BudgetExhausted)
        } else {
            None
        }
    }

    fn escalate(
        &self,
        run: Run<'_>,
        reason: EscalationReason,
        feedback: String,
        attempt: u32,
        score: Option<f64>,
    ) -> Result<RunOutcome> {
        let report = EscalationReport {
            run_id: run.run_id,
            topic: run.topic.to_string(),
            reason,
            feedback,
            draft_preview: draft_preview(&run.draft),
            attempt,
            score,
        };
        info!(stage = %LoopStage::Escalated, %reason, attempt, "Human intervention required");
        self.reporter.escalate(&report)?;
        Ok(RunOutcome::Escalated {
            report,
            calls: run.calls,
        })
    }

    fn publish(&self, run: Run<'_>, score: f64, attempt: u32) -> Result<RunOutcome> {
        let artifact = PublishedDraft {
            run_id: run.run_id,
            topic: run.topic.to_string(),
            draft: run.draft,
            score,
            attempt,
        };
        info!(
            stage = %LoopStage::Published,
            score,
            threshold = self.policy.passing_score,
            "Score meets threshold, publishing"
        );
        self.publisher.publish(&artifact)?;
        Ok(RunOutcome::Published {
            artifact,
            calls: run.calls,
        })
    }
}
