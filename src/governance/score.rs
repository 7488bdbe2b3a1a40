use super::rubric::Rubric;

// Weights in tenths: 0.4 / 0.3 / 0.3.
pub const STORYTELLING_WEIGHT_TENTHS: u16 = 4;
pub const TONE_WEIGHT_TENTHS: u16 = 3;
pub const SIMPLICITY_WEIGHT_TENTHS: u16 = 3;

/// Single weighted quality score for a rubric.
///
/// Axes in `1..=10` always yield a score in `[1.0, 10.0]`. The sum is taken
/// in integer tenths and divided once, so a score on the 0.1 grid compares
/// exactly against thresholds like `7.0`.
pub fn weighted_score(rubric: &Rubric) -> f64 {
    let tenths = u16::from(rubric.storytelling) * STORYTELLING_WEIGHT_TENTHS
        + u16::from(rubric.tone) * TONE_WEIGHT_TENTHS
        + u16::from(rubric.simplicity) * SIMPLICITY_WEIGHT_TENTHS;
    f64::from(tenths) / 10.0
}
