use editorial_governor::backend::{BackendCall, ScriptedBackend};
use editorial_governor::error::{BackendError, GovernorError};
use editorial_governor::governance::{EscalationReason, GovernancePolicy, RunOutcome};

use super::support::{harness, harness_with_policy, rubric, valid_draft};

#[tokio::test]
async fn flat_scores_escalate_for_stagnation_on_second_attempt() {
    let h = harness(
        ScriptedBackend::new()
            .with_draft(valid_draft("a"))
            .with_rubric(rubric(6, 6, 6, false))
            .with_refinement(valid_draft("b"))
            .with_rubric(rubric(6, 6, 6, false))
            .with_refinement(valid_draft("c"))
            .with_rubric(rubric(6, 6, 6, false)),
    );

    let outcome = h.governance.execute("distributed tracing").await.unwrap();
    let RunOutcome::Escalated { report, calls } = outcome else {
        panic!("expected escalation");
    };
    assert_eq!(report.reason, EscalationReason::Stagnation);
    assert_eq!(report.attempt, 2);
    assert_eq!(report.feedback, "feedback 6/6/6");
    assert_eq!(calls.critiques, 2);
    assert_eq!(calls.refinements, 1);
    assert_eq!(h.backend.critique_calls(), 2);
    assert_eq!(h.sink.escalations().len(), 1);
}

#[tokio::test]
async fn bias_outranks_a_passing_score() {
    let h = harness(
        ScriptedBackend::new()
            .with_draft(valid_draft("a"))
            .with_rubric(rubric(10, 9, 9, true)),
    );

    let outcome = h.governance.execute("hiring practices").await.unwrap();
    let RunOutcome::Escalated { report, .. } = outcome else {
        panic!("expected escalation");
    };
    assert_eq!(report.reason, EscalationReason::Bias);
    assert!((report.score.unwrap() - 9.4).abs() < 1e-9);
    assert!(h.sink.published().is_empty());
}

#[tokio::test]
async fn bias_outranks_stagnation() {
    let h = harness(
        ScriptedBackend::new()
            .with_draft(valid_draft("a"))
            .with_rubric(rubric(6, 6, 6, false))
            .with_refinement(valid_draft("b"))
            .with_rubric(rubric(5, 5, 5, true)),
    );

    let outcome = h.governance.execute("team dynamics").await.unwrap();
    let RunOutcome::Escalated { report, .. } = outcome else {
        panic!("expected escalation");
    };
    assert_eq!(report.reason, EscalationReason::Bias);
}

#[tokio::test]
async fn report_preview_is_first_hundred_chars() {
    let draft = valid_draft("preview");
    let h = harness(
        ScriptedBackend::new()
            .with_draft(draft.clone())
            .with_rubric(rubric(9, 9, 9, true)),
    );

    let RunOutcome::Escalated { report, .. } = h.governance.execute("t").await.unwrap() else {
        panic!("expected escalation");
    };
    let expected: String = draft.chars().take(100).collect();
    assert_eq!(report.draft_preview, format!("{expected}..."));
}

#[tokio::test]
async fn structural_failure_every_attempt_exhausts_budget() {
    let h = harness(
        ScriptedBackend::new()
            .with_draft("Why? How? What? Too short.")
            .with_draft("still short")
            .with_draft("short again")
            .with_draft("short to the end"),
    );

    let outcome = h.governance.execute("quantum networking").await.unwrap();
    let RunOutcome::Escalated { report, calls } = outcome else {
        panic!("expected escalation");
    };
    assert_eq!(report.reason, EscalationReason::BudgetExhausted);
    assert_eq!(report.feedback, "no draft passed structural validation");
    assert_eq!(report.score, None);
    assert_eq!(report.draft_preview, "short to the end");
    assert_eq!(report.attempt, 3);

    // Initial draft plus one corrective draft per failed attempt.
    assert_eq!(calls.drafts, 4);
    assert_eq!(calls.critiques, 0);
    assert_eq!(h.backend.draft_calls(), 4);
    assert_eq!(h.backend.critique_calls(), 0);
}

#[tokio::test]
async fn structural_failure_on_final_attempt_keeps_last_score() {
    let h = harness(
        ScriptedBackend::new()
            .with_draft(valid_draft("a"))
            .with_rubric(rubric(4, 4, 4, false))
            .with_refinement(valid_draft("b"))
            .with_rubric(rubric(5, 5, 5, false))
            .with_refinement("refined into something short")
            .with_draft("corrected but still short"),
    );

    let RunOutcome::Escalated { report, calls } =
        h.governance.execute("type systems").await.unwrap()
    else {
        panic!("expected escalation");
    };
    assert_eq!(report.reason, EscalationReason::BudgetExhausted);
    assert_eq!(report.score, Some(5.0));
    assert_eq!(report.draft_preview, "corrected but still short");
    assert_eq!(calls.refinements, 2);
    assert_eq!(calls.drafts, 2);
    let corrective: Vec<_> = h
        .backend
        .calls()
        .into_iter()
        .skip(1)
        .filter_map(|c| match c {
            BackendCall::Draft { topic } => Some(topic),
            _ => None,
        })
        .collect();
    assert_eq!(corrective.len(), 1);
    assert!(corrective[0].starts_with("RETRY:"));
    assert!(corrective[0].ends_with("Topic: type systems"));
}

#[tokio::test]
async fn custom_budget_is_respected() {
    let policy = GovernancePolicy {
        max_retries: 5,
        ..GovernancePolicy::default()
    };
    let mut backend = ScriptedBackend::new().with_draft(valid_draft("0"));
    for (i, s) in [2u8, 3, 4, 5].into_iter().enumerate() {
        backend = backend
            .with_rubric(rubric(s, s, s, false))
            .with_refinement(valid_draft(&(i + 1).to_string()));
    }
    backend = backend.with_rubric(rubric(6, 6, 6, false));
    let h = harness_with_policy(backend, policy);

    let RunOutcome::Escalated { report, calls } = h.governance.execute("caching").await.unwrap()
    else {
        panic!("expected escalation");
    };
    assert_eq!(report.reason, EscalationReason::BudgetExhausted);
    assert_eq!(report.attempt, 5);
    assert_eq!(calls.critiques, 5);
    assert_eq!(calls.refinements, 4);
}

#[tokio::test]
async fn backend_failure_propagates_and_skips_sinks() {
    let h = harness(ScriptedBackend::new().with_draft_error(BackendError::Timeout {
        operation: "draft",
        timeout_secs: 120,
    }));

    let err = h.governance.execute("observability").await.unwrap_err();
    assert!(matches!(
        err,
        GovernorError::Backend(BackendError::Timeout { .. })
    ));
    assert_eq!(h.sink.total(), 0);
}

#[tokio::test]
async fn exhausted_script_is_a_backend_failure() {
    let h = harness(ScriptedBackend::new().with_draft(valid_draft("a")));

    let err = h.governance.execute("observability").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "backend: scripted backend has no critique response left"
    );
}
