/// Per-run quality trend.
///
/// `stagnating` is a one-way latch: once a scored iteration fails to improve
/// on the previous one it stays set for the rest of the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionState {
    last_score: f64,
    iteration_count: u32,
    stagnating: bool,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one scored iteration. Equal scores count as non-improvement.
    pub fn update(&mut self, current_score: f64) {
        self.iteration_count += 1;
        if self.iteration_count > 1 && current_score <= self.last_score {
            self.stagnating = true;
        }
        self.last_score = current_score;
    }

    pub fn last_score(&self) -> f64 {
        self.last_score
    }

    pub fn iteration_count(&self) -> u32 {
        self.iteration_count
    }

    pub fn is_stagnating(&self) -> bool {
        self.stagnating
    }
}
