//! talkscore - speech practice evaluation library
//!
//! Scores a recorded speech session on three axes and folds them into a
//! running rank:
//!
//! - **Pronunciation and fluency**, from a text-scoring HTTP API fed the
//!   transcript and the raw audio.
//! - **Content**, from a chat model graded against a fixed five-dimension
//!   rubric and recovered by parsing the structured reply.
//! - **Pacing**, as words per minute from the transcript and WAV duration.
//!
//! The composite score of each session lands in a persisted seven-day
//! history that tracks attendance and derives a rank tier.
//!
//! # Example
//!
//! ```no_run
//! use talkscore::{Config, Recording, SpeechSession};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load_or_default(&Config::default_path())?.with_env_overrides();
//! let mut session = SpeechSession::from_config(&config, vec!["travel".to_string()])?;
//!
//! let recording = Recording::new("speech.wav", config.storage.transcript_path());
//! let outcome = session.run(&recording).await?;
//! println!(
//!     "score {} rank {}",
//!     outcome.composite_score,
//!     outcome.rank_tier.name()
//! );
//! # Ok(())
//! # }
//! ```

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(let_underscore_drop)]

pub mod config;
pub mod defaults;
pub mod error;
pub mod evaluate;
pub mod history;
pub mod llm;
pub mod recording;
pub mod session;
pub mod transcribe;

pub use config::Config;
pub use error::{Result, TalkscoreError};
pub use evaluate::{
    composite_score, ContentEvaluation, ContentRelevanceEvaluator, ContentSubScores,
    EvaluationJoin, ProcessedEvaluationData, PronunciationScorer, SpeechaceScorer, WordQuality,
    WordScore,
};
pub use history::{Clock, HistoryState, RankTier, SessionHistoryStore, SystemClock};
pub use llm::{ChatApi, ChatConversation, ChatMessage, OpenAiChat};
pub use recording::Recording;
pub use session::{SessionOutcome, SpeechSession};
pub use transcribe::{DeviceTranscriber, MockTranscriber, Transcriber, WhisperApiTranscriber};
