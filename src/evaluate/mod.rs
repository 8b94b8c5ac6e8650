//! Speech evaluation: recording validation, pacing, pronunciation scoring,
//! content grading and score aggregation.

pub mod aggregate;
pub mod content;
pub mod pronunciation;
pub mod validator;
pub mod wpm;

pub use aggregate::{composite_score, EvaluationJoin};
pub use content::{ContentEvaluation, ContentRelevanceEvaluator, ContentSubScores};
pub use pronunciation::{
    ProcessedEvaluationData, PronunciationScorer, SpeechaceScorer, WordQuality, WordScore,
};
pub use validator::is_valid;
pub use wpm::{matching_reference_bands, words_per_minute};
