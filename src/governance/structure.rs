/// Cheap local check that a draft is worth spending a critique call on.
///
/// A draft passes when it is present, has at least `min_words`
/// whitespace-delimited tokens, and contains every required marker as a
/// case-insensitive substring. Markers are not matched as headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralValidator {
    min_words: usize,
    required_markers: Vec<String>,
}

/// Result of inspecting one draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureReport {
    pub present: bool,
    pub word_count: usize,
    pub min_words: usize,
    pub missing_markers: Vec<String>,
}

impl StructureReport {
    pub fn is_valid(&self) -> bool {
        self.present && self.word_count >= self.min_words && self.missing_markers.is_empty()
    }

    /// Short human-readable reason, `None` when the draft is valid.
    pub fn failure_summary(&self) -> Option<String> {
        if !self.present {
            return Some("draft is absent".to_string());
        }
        let mut problems = Vec::new();
        if self.word_count < self.min_words {
            problems.push(format!(
                "{} words, need at least {}",
                self.word_count, self.min_words
            ));
        }
        if !self.missing_markers.is_empty() {
            problems.push(format!(
                "missing markers: {}",
                self.missing_markers.join(", ")
            ));
        }
        if problems.is_empty() {
            None
        } else {
            Some(problems.join("; "))
        }
    }
}

impl StructuralValidator {
    pub fn new<I, S>(min_words: usize, required_markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            min_words,
            required_markers: required_markers
                .into_iter()
                .map(|m| m.as_ref().trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    pub fn min_words(&self) -> usize {
        self.min_words
    }

    pub fn required_markers(&self) -> &[String] {
        &self.required_markers
    }

    pub fn is_valid(&self, draft: Option<&str>) -> bool {
        self.inspect(draft).is_valid()
    }

    pub fn inspect(&self, draft: Option<&str>) -> StructureReport {
        let Some(draft) = draft else {
            return StructureReport {
                present: false,
                word_count: 0,
                min_words: self.min_words,
                missing_markers: self.required_markers.clone(),
            };
        };

        let lowered = draft.to_lowercase();
        let missing_markers = self
            .required_markers
            .iter()
            .filter(|marker| !lowered.contains(marker.as_str()))
            .cloned()
            .collect();

        StructureReport {
            present: true,
            word_count: draft.split_whitespace().count(),
            min_words: self.min_words,
            missing_markers,
        }
    }

    /// Fixed instruction sent to the backend in place of a topic when a
    /// draft fails the structural check.
    pub fn corrective_instruction(&self) -> String {
        let headers = self
            .required_markers
            .iter()
            .map(|marker| format!("'{}'", capitalize(marker)))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "RETRY: Use headers {headers} and ensure content is > {} words.",
            self.min_words
        )
    }
}

impl Default for StructuralValidator {
    fn default() -> Self {
        Self::new(
            super::policy::DEFAULT_MIN_WORDS,
            super::policy::DEFAULT_REQUIRED_MARKERS,
        )
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
