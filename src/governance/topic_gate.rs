/// Deterministic pre-generation gate over prohibited subjects.
///
/// Matching is a case-insensitive substring test: a topic is prohibited when
/// its lowercased text contains any lowercased blocked term. Terms are fixed
/// at construction and never change for the lifetime of the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicGate {
    blocked_terms: Vec<String>,
}

impl TopicGate {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blocked_terms: Vec<String> = Vec::new();
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if !term.is_empty() && !blocked_terms.contains(&term) {
                blocked_terms.push(term);
            }
        }
        Self { blocked_terms }
    }

    pub fn is_prohibited(&self, topic: &str) -> bool {
        self.matched_term(topic).is_some()
    }

    /// First blocked term found in `topic`, in configuration order.
    pub fn matched_term(&self, topic: &str) -> Option<&str> {
        let lowered = topic.to_lowercase();
        self.blocked_terms
            .iter()
            .find(|term| lowered.contains(term.as_str()))
            .map(String::as_str)
    }

    pub fn blocked_terms(&self) -> &[String] {
        &self.blocked_terms
    }
}

impl Default for TopicGate {
    fn default() -> Self {
        Self::new(super::policy::DEFAULT_BLOCKED_TOPICS)
    }
}
