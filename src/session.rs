//! End-to-end evaluation of one speech session.
//!
//! `SpeechSession` wires the transcriber, the two scoring backends and the
//! history store together: transcribe, validate, then run the pronunciation
//! and content evaluations concurrently and join their results into the
//! composite score that feeds the rank.

use crate::config::Config;
use crate::error::{Result, TalkscoreError};
use crate::evaluate::{
    is_valid, words_per_minute, ContentEvaluation, ContentRelevanceEvaluator, EvaluationJoin,
    ProcessedEvaluationData, PronunciationScorer, SpeechaceScorer,
};
use crate::history::{RankTier, SessionHistoryStore};
use crate::llm::{ChatConversation, OpenAiChat};
use crate::recording::Recording;
use crate::transcribe::{self, Transcriber};
use log::{debug, info};

/// Everything produced by one evaluated session.
#[derive(Debug)]
pub struct SessionOutcome {
    pub transcript: String,
    pub words_per_minute: f64,
    pub pronunciation: ProcessedEvaluationData,
    pub content: ContentEvaluation,
    pub composite_score: u32,
    pub rank_score: u32,
    pub rank_tier: RankTier,
}

/// One user's evaluation pipeline, owning its backends and history.
pub struct SpeechSession {
    transcriber: Box<dyn Transcriber>,
    scorer: Box<dyn PronunciationScorer>,
    content: ContentRelevanceEvaluator,
    history: SessionHistoryStore,
    min_recording_secs: f64,
}

impl SpeechSession {
    pub fn new(
        transcriber: Box<dyn Transcriber>,
        scorer: Box<dyn PronunciationScorer>,
        content: ContentRelevanceEvaluator,
        history: SessionHistoryStore,
        min_recording_secs: f64,
    ) -> Self {
        Self {
            transcriber,
            scorer,
            content,
            history,
            min_recording_secs,
        }
    }

    /// Build a session from configuration, with the given speech topics.
    pub fn from_config(config: &Config, topics: Vec<String>) -> Result<Self> {
        let transcriber = transcribe::from_config(config)?;
        let scorer = SpeechaceScorer::new(&config.scoring, config.storage.diagnostics_path())?;
        let chat = OpenAiChat::new(&config.chat)?;
        let conversation = ChatConversation::new(Box::new(chat), config.chat.max_history);
        let content = ContentRelevanceEvaluator::new(conversation, topics);
        let history = SessionHistoryStore::load(config.storage.history_path())?;

        Ok(Self::new(
            transcriber,
            Box::new(scorer),
            content,
            history,
            config.session.min_recording_secs,
        ))
    }

    /// Evaluate one recording end to end.
    ///
    /// Any failed stage surfaces its error; a partial result never produces
    /// a composite score or touches the history.
    pub async fn run(&mut self, recording: &Recording) -> Result<SessionOutcome> {
        let transcript = self
            .transcriber
            .transcribe(recording.audio_path())
            .await?;
        recording.write_transcript(&transcript)?;
        debug!("Transcribed {} characters", transcript.len());

        if !is_valid(
            Some(recording.audio_path()),
            Some(recording.transcript_path()),
            self.min_recording_secs,
        ) {
            return Err(TalkscoreError::RecordingRejected);
        }

        let wpm = words_per_minute(recording)?;

        // The two scoring calls are independent; run them concurrently and
        // join both results.
        let (pronunciation, content) = tokio::join!(
            self.scorer.evaluate(recording),
            self.content.evaluate(recording),
        );
        let pronunciation = pronunciation?;
        let content = content?;
        let content_total = content.scores.total()?;

        let mut join = EvaluationJoin::new();
        join.pronunciation_done(
            pronunciation.speechace_pronunciation,
            pronunciation.speechace_fluency,
        );
        join.content_done(content_total);
        let composite = join.composite().ok_or_else(|| {
            TalkscoreError::Other("Evaluation join completed without a composite score".to_string())
        })?;

        self.history.record_score(composite)?;
        info!(
            "Session scored {} (content {}, rank {} {})",
            composite,
            content_total,
            self.history.rank_score(),
            self.history.rank_tier().name()
        );

        Ok(SessionOutcome {
            transcript,
            words_per_minute: wpm,
            pronunciation,
            content,
            composite_score: composite,
            rank_score: self.history.rank_score(),
            rank_tier: self.history.rank_tier(),
        })
    }

    pub fn history(&self) -> &SessionHistoryStore {
        &self.history
    }
}
