use crate::error::BackendError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Valid range for every numeric rubric axis.
pub const AXIS_RANGE: RangeInclusive<u8> = 1..=10;

/// Structured critique of one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rubric {
    pub storytelling: u8,
    pub tone: u8,
    pub simplicity: u8,
    pub bias_flag: bool,
    pub feedback: String,
}

/// Wire shape as returned by the judge, before range checks.
#[derive(Deserialize)]
struct RawRubric {
    storytelling: i64,
    tone: i64,
    simplicity: i64,
    #[serde(rename = "biasFlag", alias = "bias_flag")]
    bias_flag: bool,
    #[serde(default)]
    feedback: String,
}

impl Rubric {
    /// Build a rubric, rejecting axes outside `1..=10`.
    pub fn new(
        storytelling: u8,
        tone: u8,
        simplicity: u8,
        bias_flag: bool,
        feedback: impl Into<String>,
    ) -> Result<Self, BackendError> {
        let rubric = Self {
            storytelling,
            tone,
            simplicity,
            bias_flag,
            feedback: feedback.into(),
        };
        rubric.validate()?;
        Ok(rubric)
    }

    pub fn validate(&self) -> Result<(), BackendError> {
        for (axis, value) in [
            ("storytelling", self.storytelling),
            ("tone", self.tone),
            ("simplicity", self.simplicity),
        ] {
            if !AXIS_RANGE.contains(&value) {
                return Err(BackendError::MalformedRubric(format!(
                    "{axis}={value} outside 1..=10"
                )));
            }
        }
        Ok(())
    }

    /// Parse a judge response: bare JSON, JSON in a code fence, or JSON
    /// embedded in surrounding prose.
    pub fn parse_response(text: &str) -> Result<Self, BackendError> {
        let json = extract_json(text).ok_or_else(|| {
            BackendError::MalformedRubric("no JSON object in critique response".into())
        })?;
        let raw: RawRubric = serde_json::from_str(json)
            .map_err(|e| BackendError::MalformedRubric(format!("invalid rubric JSON: {e}")))?;

        let axis = |name: &str, value: i64| {
            u8::try_from(value)
                .ok()
                .filter(|v| AXIS_RANGE.contains(v))
                .ok_or_else(|| {
                    BackendError::MalformedRubric(format!("{name}={value} outside 1..=10"))
                })
        };

        Ok(Self {
            storytelling: axis("storytelling", raw.storytelling)?,
            tone: axis("tone", raw.tone)?,
            simplicity: axis("simplicity", raw.simplicity)?,
            bias_flag: raw.bias_flag,
            feedback: raw.feedback,
        })
    }

    /// JSON format the critique persona is asked to return.
    pub fn schema_prompt() -> &'static str {
        concat!(
            "Respond with a JSON object in this exact format:\n",
            "{\"storytelling\": <1-10>, \"tone\": <1-10>, \"simplicity\": <1-10>, ",
            "\"biasFlag\": <true|false>, \"feedback\": \"<instructions for the rewriter>\"}\n",
            "All three scores are integers from 1 to 10.\n",
            "Do not include markdown fences or extra commentary.",
        )
    }
}

fn extract_json(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let rest = &text[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            let candidate = rest[..end].trim();
            if !candidate.is_empty() {
                return Some(candidate);
            }
        }
    }

    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| &text[open..=close])
}
