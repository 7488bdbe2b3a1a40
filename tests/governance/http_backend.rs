use std::sync::Arc;
use std::time::Duration;

use editorial_governor::backend::LlmBackend;
use editorial_governor::governance::{EscalationReason, GovernanceLoop, GovernancePolicy, RunOutcome};
use editorial_governor::providers::compatible::OpenAiCompatibleProvider;
use editorial_governor::sinks::{FileSink, Sinks};
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::support::valid_draft;

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

fn governed_loop(server: &MockServer, out: &TempDir) -> GovernanceLoop {
    let provider = OpenAiCompatibleProvider::new(
        "mock",
        &server.uri(),
        Some("test-key"),
        Duration::from_secs(5),
    );
    let backend = LlmBackend::new(Arc::new(provider), "mock-model", 0.7)
        .with_timeout(Duration::from_secs(5));
    GovernanceLoop::new(
        Arc::new(GovernancePolicy::default()),
        Arc::new(backend),
        Sinks::shared(Arc::new(FileSink::new(out.path()))),
    )
}

#[tokio::test]
async fn llm_backend_publishes_to_disk() {
    let server = MockServer::start().await;
    let draft = valid_draft("wheel");

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("technical blogger"))
        .respond_with(completion(&draft))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("strict editor"))
        .respond_with(completion(
            "```json\n{\"storytelling\": 8, \"tone\": 8, \"simplicity\": 8, \"biasFlag\": false, \"feedback\": \"ship it\"}\n```",
        ))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let governance = governed_loop(&server, &out);
    let outcome = governance.execute("The history of bicycles").await.unwrap();

    let RunOutcome::Published { artifact, calls } = outcome else {
        panic!("expected publish");
    };
    assert_eq!(artifact.draft, draft);
    assert_eq!(calls.total(), 2);

    let files: Vec<_> = std::fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    assert_eq!(files.len(), 1);
    let body = std::fs::read_to_string(&files[0]).unwrap();
    assert!(body.contains(&draft));
}

#[tokio::test]
async fn bias_flag_from_llm_lands_in_journal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("technical blogger"))
        .respond_with(completion(&valid_draft("team")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("strict editor"))
        .respond_with(completion(
            r#"{"storytelling": 9, "tone": 9, "simplicity": 9, "bias_flag": true, "feedback": "remove the stereotype"}"#,
        ))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let governance = governed_loop(&server, &out);
    let outcome = governance.execute("engineering team culture").await.unwrap();

    let RunOutcome::Escalated { report, .. } = outcome else {
        panic!("expected escalation");
    };
    assert_eq!(report.reason, EscalationReason::Bias);

    let journal = std::fs::read_to_string(out.path().join("escalations.jsonl")).unwrap();
    let line: serde_json::Value = serde_json::from_str(journal.trim()).unwrap();
    assert_eq!(line["kind"], "escalation");
    assert_eq!(line["reason"], "bias");
    assert_eq!(line["feedback"], "remove the stereotype");
}

#[tokio::test]
async fn provider_error_fails_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let governance = governed_loop(&server, &out);
    let err = governance.execute("compilers").await.unwrap_err().to_string();

    assert!(err.contains("draft request failed"));
    assert!(err.contains("upstream down"));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}
