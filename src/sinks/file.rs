use super::traits::{EscalationReporter, Publisher, Sink};
use crate::error::SinkError;
use crate::governance::{BlockNotice, EscalationReport, PublishedDraft};
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

pub const ESCALATION_JOURNAL: &str = "escalations.jsonl";

#[derive(Serialize)]
struct JournalLine<'a, T: Serialize> {
    kind: &'static str,
    recorded_at: String,
    #[serde(flatten)]
    record: &'a T,
}

/// Double-quoted YAML scalar. JSON string escapes are valid YAML.
fn yaml_quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

/// Writes published drafts as Markdown files and appends blocks and
/// escalations to `escalations.jsonl` in the same directory.
///
/// Writes are small and synchronous; they run on the calling task's thread
/// once per run. The journal lock keeps concurrent appends whole.
pub struct FileSink {
    output_dir: PathBuf,
    journal_lock: Mutex<()>,
}

impl FileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            journal_lock: Mutex::new(()),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn journal_path(&self) -> PathBuf {
        self.output_dir.join(ESCALATION_JOURNAL)
    }

    fn render_markdown(artifact: &PublishedDraft, published_at: &str) -> String {
        format!(
            "---\nrun_id: {}\ntopic: {}\nscore: {:.2}\nattempt: {}\npublished_at: {}\n---\n\n{}\n",
            artifact.run_id,
            yaml_quoted(&artifact.topic),
            artifact.score,
            artifact.attempt,
            published_at,
            artifact.draft
        )
    }

    fn append<T: Serialize>(&self, kind: &'static str, record: &T) -> std::io::Result<()> {
        let line = JournalLine {
            kind,
            recorded_at: Utc::now().to_rfc3339(),
            record,
        };
        let json = serde_json::to_string(&line).map_err(std::io::Error::other)?;

        let _guard = self.journal_lock.lock().unwrap_or_else(PoisonError::into_inner);
        fs::create_dir_all(&self.output_dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.journal_path())?;
        writeln!(file, "{json}")
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }
}

impl Publisher for FileSink {
    fn publish(&self, artifact: &PublishedDraft) -> Result<(), SinkError> {
        let now = Utc::now();
        let path = self.output_dir.join(format!(
            "{}-{}.md",
            now.format("%Y%m%dT%H%M%SZ"),
            artifact.run_id
        ));
        let body = Self::render_markdown(artifact, &now.to_rfc3339());

        fs::create_dir_all(&self.output_dir)
            .and_then(|()| fs::write(&path, body))
            .map_err(|e| SinkError::Publish {
                sink: "file".into(),
                message: format!("{}: {e}", path.display()),
            })?;

        tracing::info!(run_id = %artifact.run_id, path = %path.display(), "draft.written");
        Ok(())
    }
}

impl EscalationReporter for FileSink {
    fn report_block(&self, notice: &BlockNotice) -> Result<(), SinkError> {
        self.append("block", notice).map_err(|e| SinkError::Report {
            sink: "file".into(),
            message: e.to_string(),
        })
    }

    fn escalate(&self, report: &EscalationReport) -> Result<(), SinkError> {
        self.append("escalation", report).map_err(|e| SinkError::Report {
            sink: "file".into(),
            message: e.to_string(),
        })
    }
}
