use editorial_governor::backend::{BackendCall, ScriptedBackend};
use editorial_governor::governance::{LoopStage, RunOutcome};

use super::support::{harness, rubric, valid_draft};

#[tokio::test]
async fn bicycles_publish_on_first_attempt() {
    let draft = valid_draft("bicycle");
    let h = harness(
        ScriptedBackend::new()
            .with_draft(draft.clone())
            .with_rubric(rubric(8, 8, 8, false)),
    );

    let outcome = h.governance.execute("The history of bicycles").await.unwrap();

    let RunOutcome::Published { artifact, calls } = outcome else {
        panic!("expected publish");
    };
    assert_eq!(artifact.draft, draft);
    assert!((artifact.score - 8.0).abs() < 1e-9);
    assert_eq!(artifact.attempt, 1);
    assert_eq!(calls.drafts, 1);
    assert_eq!(calls.critiques, 1);
    assert_eq!(calls.refinements, 0);

    assert_eq!(h.backend.draft_calls(), 1);
    assert_eq!(h.backend.critique_calls(), 1);
    assert_eq!(h.backend.refine_calls(), 0);

    let published = h.sink.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].draft, draft);
    assert!(h.sink.escalations().is_empty());
}

#[tokio::test]
async fn blocked_topic_makes_no_backend_calls() {
    let h = harness(ScriptedBackend::new().with_draft(valid_draft("never")));

    let outcome = h
        .governance
        .execute("caste representation in media")
        .await
        .unwrap();

    assert_eq!(outcome.stage(), LoopStage::Gated);
    assert_eq!(outcome.calls().total(), 0);
    assert!(h.backend.calls().is_empty());

    let blocks = h.sink.blocks();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].matched_term, "caste");
    assert!(h.sink.published().is_empty());
    assert!(h.sink.escalations().is_empty());
}

#[tokio::test]
async fn gate_is_case_insensitive_substring() {
    for topic in [
        "RELIGION in schools",
        "a note on Geopolitics",
        "Gender Disparity at work",
        "subcaste systems",
    ] {
        let h = harness(ScriptedBackend::new());
        let outcome = h.governance.execute(topic).await.unwrap();
        assert_eq!(outcome.stage(), LoopStage::Gated, "{topic}");
        assert!(h.backend.calls().is_empty(), "{topic}");
    }
}

#[tokio::test]
async fn low_score_is_refined_then_published() {
    let first = valid_draft("first");
    let second = valid_draft("second");
    let h = harness(
        ScriptedBackend::new()
            .with_draft(first.clone())
            .with_rubric(rubric(5, 6, 6, false))
            .with_refinement(second.clone())
            .with_rubric(rubric(8, 7, 7, false)),
    );

    let outcome = h.governance.execute("Rust error handling").await.unwrap();
    let RunOutcome::Published { artifact, calls } = outcome else {
        panic!("expected publish");
    };
    assert_eq!(artifact.draft, second);
    assert_eq!(artifact.attempt, 2);
    assert_eq!(calls.refinements, 1);

    assert_eq!(
        h.backend.calls(),
        vec![
            BackendCall::Draft {
                topic: "Rust error handling".into()
            },
            BackendCall::Critique {
                draft: first.clone()
            },
            BackendCall::Refine {
                feedback: "feedback 5/6/6".into(),
                draft: first,
            },
            BackendCall::Critique { draft: second },
        ]
    );
}

#[tokio::test]
async fn every_run_ends_with_exactly_one_sink_action() {
    let h = harness(
        ScriptedBackend::new()
            .with_draft(valid_draft("a"))
            .with_rubric(rubric(9, 9, 9, false)),
    );
    h.governance.execute("compilers").await.unwrap();
    assert_eq!(h.sink.total(), 1);
}
