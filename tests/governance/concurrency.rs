use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use editorial_governor::backend::{BackendFuture, GenerationBackend};
use editorial_governor::governance::{GovernanceLoop, GovernancePolicy, Rubric, RunOutcome};
use editorial_governor::sinks::{MemorySink, Sinks};

use super::support::valid_draft;

/// Stateless backend whose scores depend on the topic, so interleaved runs
/// can only diverge if they leak state into each other.
struct TopicKeyedBackend;

impl TopicKeyedBackend {
    fn score_for(draft: &str) -> u8 {
        if draft.contains("good") { 9 } else { 5 }
    }

    fn yield_briefly() -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(tokio::time::sleep(Duration::from_millis(5)))
    }
}

impl GenerationBackend for TopicKeyedBackend {
    fn name(&self) -> &str {
        "topic-keyed"
    }

    fn draft<'a>(&'a self, topic: &'a str) -> BackendFuture<'a, String> {
        Box::pin(async move {
            Self::yield_briefly().await;
            Ok(valid_draft(topic))
        })
    }

    fn critique<'a>(&'a self, draft: &'a str) -> BackendFuture<'a, Rubric> {
        Box::pin(async move {
            Self::yield_briefly().await;
            let s = Self::score_for(draft);
            Ok(Rubric::new(s, s, s, false, "flat").expect("valid rubric"))
        })
    }

    fn refine<'a>(&'a self, _feedback: &'a str, draft: &'a str) -> BackendFuture<'a, String> {
        Box::pin(async move {
            Self::yield_briefly().await;
            Ok(draft.to_string())
        })
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_runs_do_not_share_state() {
    let sink = Arc::new(MemorySink::new());
    let governance = Arc::new(GovernanceLoop::new(
        Arc::new(GovernancePolicy::default()),
        Arc::new(TopicKeyedBackend),
        Sinks::shared(sink.clone()),
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let governance = Arc::clone(&governance);
        let topic = if i % 2 == 0 {
            format!("good topic {i}")
        } else {
            format!("weak topic {i}")
        };
        handles.push(tokio::spawn(async move { governance.execute(&topic).await }));
    }

    let mut run_ids = Vec::new();
    for handle in handles {
        let outcome = handle.await.unwrap().unwrap();
        run_ids.push(outcome.run_id().to_string());
        match outcome {
            RunOutcome::Published { artifact, calls } => {
                assert!(artifact.topic.starts_with("good"));
                assert_eq!(artifact.attempt, 1);
                assert_eq!(calls.critiques, 1);
            }
            RunOutcome::Escalated { report, calls } => {
                // Identical 5.0 scores: stagnation on the second attempt.
                assert!(report.topic.starts_with("weak"));
                assert_eq!(report.attempt, 2);
                assert_eq!(calls.critiques, 2);
            }
            RunOutcome::Blocked(_) => panic!("nothing should be blocked"),
        }
    }

    run_ids.sort();
    run_ids.dedup();
    assert_eq!(run_ids.len(), 8);
    assert_eq!(sink.published().len(), 4);
    assert_eq!(sink.escalations().len(), 4);
}
