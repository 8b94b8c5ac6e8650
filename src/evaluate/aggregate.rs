//! Combining the pronunciation and content results into one composite score.
//!
//! The two evaluations run concurrently and finish in either order, so the
//! join is expressed as a small state holder that emits the composite exactly
//! once, when the second result arrives.

/// Composite of a content total and averaged pronunciation/fluency scores.
///
/// The average is rounded half-away-from-zero, matching the content total's
/// rounding.
pub fn composite_score(pronunciation: f64, fluency: f64, content_total: u32) -> u32 {
    content_total + ((pronunciation + fluency) / 2.0).round() as u32
}

/// Order-independent join of the two concurrent evaluation results.
#[derive(Debug, Default)]
pub struct EvaluationJoin {
    pronunciation: Option<(f64, f64)>,
    content_total: Option<u32>,
    emitted: bool,
}

impl EvaluationJoin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pronunciation result. Returns the composite if this was the
    /// last outstanding result.
    pub fn pronunciation_done(&mut self, pronunciation: f64, fluency: f64) -> Option<u32> {
        self.pronunciation = Some((pronunciation, fluency));
        self.try_emit()
    }

    /// Record the content total. Returns the composite if this was the last
    /// outstanding result.
    pub fn content_done(&mut self, content_total: u32) -> Option<u32> {
        self.content_total = Some(content_total);
        self.try_emit()
    }

    fn try_emit(&mut self) -> Option<u32> {
        if self.emitted {
            return None;
        }
        let (pronunciation, fluency) = self.pronunciation?;
        let content_total = self.content_total?;
        self.emitted = true;
        Some(composite_score(pronunciation, fluency, content_total))
    }

    /// The composite, if both results have arrived.
    pub fn composite(&self) -> Option<u32> {
        let (pronunciation, fluency) = self.pronunciation?;
        let content_total = self.content_total?;
        Some(composite_score(pronunciation, fluency, content_total))
    }

    pub fn is_complete(&self) -> bool {
        self.pronunciation.is_some() && self.content_total.is_some()
    }
}
