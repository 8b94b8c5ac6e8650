//! Pronunciation and fluency scoring via the Speechace-style text-scoring API.
//!
//! One multipart POST per evaluation: transcript text, the raw WAV bytes, and
//! three fixed flags. The raw response body is persisted to a diagnostics file
//! before decoding so a schema mismatch can be inspected offline.

use crate::config::ScoringConfig;
use crate::defaults;
use crate::error::{Result, TalkscoreError};
use crate::recording::Recording;
use async_trait::async_trait;
use log::{debug, error};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const SERVICE: &str = "scoring API";

/// Per-word quality score, in API order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordScore {
    pub word: String,
    #[serde(rename = "quality_score")]
    pub quality_score: u32,
}

/// Display bucket for a word's quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordQuality {
    Good,
    Fair,
    Poor,
}

impl WordScore {
    pub fn quality_band(&self) -> WordQuality {
        if self.quality_score >= defaults::WORD_QUALITY_GOOD {
            WordQuality::Good
        } else if self.quality_score >= defaults::WORD_QUALITY_FAIR {
            WordQuality::Fair
        } else {
            WordQuality::Poor
        }
    }
}

/// Flattened result of one scoring call. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedEvaluationData {
    pub text: String,
    pub ielts_pronunciation: f64,
    pub ielts_fluency: f64,
    pub speechace_pronunciation: f64,
    pub speechace_fluency: f64,
    pub cefr_pronunciation: String,
    pub cefr_fluency: String,
    pub word_scores: Vec<WordScore>,
}

// Wire schema of the scoring API response.

#[derive(Deserialize, Debug)]
struct ScoringResponse {
    #[allow(dead_code)]
    status: String,
    #[allow(dead_code)]
    #[serde(default)]
    quota_remaining: i64,
    text_score: TextScore,
}

#[derive(Deserialize, Debug)]
struct TextScore {
    text: String,
    word_score_list: Vec<WordScore>,
    ielts_score: NumericScorePair,
    speechace_score: NumericScorePair,
    cefr_score: TierScorePair,
}

#[derive(Deserialize, Debug)]
struct NumericScorePair {
    pronunciation: f64,
    fluency: f64,
}

#[derive(Deserialize, Debug)]
struct TierScorePair {
    pronunciation: String,
    fluency: String,
}

/// Scoring backend seam, so the session pipeline can be tested without the
/// network.
#[async_trait]
pub trait PronunciationScorer: Send + Sync {
    async fn evaluate(&self, recording: &Recording) -> Result<ProcessedEvaluationData>;
}

/// HTTP pronunciation scorer.
pub struct SpeechaceScorer {
    endpoint: String,
    api_key: String,
    diagnostics_path: PathBuf,
    client: reqwest::Client,
}

impl SpeechaceScorer {
    pub fn new(config: &ScoringConfig, diagnostics_path: impl Into<PathBuf>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TalkscoreError::Transport {
                service: SERVICE,
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            diagnostics_path: diagnostics_path.into(),
            client,
        })
    }

    fn build_form(text: String, audio: Vec<u8>, file_name: String) -> Result<Form> {
        let audio_part = Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| TalkscoreError::Transport {
                service: SERVICE,
                message: format!("Failed to build audio part: {}", e),
            })?;

        Ok(Form::new()
            .text("text", text)
            .part("user_audio_file", audio_part)
            .text("include_fluency", "1")
            .text("no_mc", "1")
            .text("include_unknown_words", "1"))
    }

    /// Write the raw response body to the diagnostics file.
    ///
    /// Runs before decoding; a persistence failure is a hard error even
    /// though the file is only used for offline debugging.
    fn persist_raw(&self, body: &[u8]) -> Result<()> {
        if let Some(parent) = self.diagnostics_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TalkscoreError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(&self.diagnostics_path, body).map_err(|e| TalkscoreError::Write {
            path: self.diagnostics_path.display().to_string(),
            source: e,
        })
    }
}

/// Decode a scoring-API body into the flat evaluation record.
pub(crate) fn decode_scoring_response(body: &[u8]) -> Result<ProcessedEvaluationData> {
    let response: ScoringResponse = serde_json::from_slice(body).map_err(|e| {
        error!("Scoring API response did not match schema: {}", e);
        TalkscoreError::Decode {
            service: SERVICE,
            message: e.to_string(),
        }
    })?;

    let score = response.text_score;
    Ok(ProcessedEvaluationData {
        text: score.text,
        ielts_pronunciation: score.ielts_score.pronunciation,
        ielts_fluency: score.ielts_score.fluency,
        speechace_pronunciation: score.speechace_score.pronunciation,
        speechace_fluency: score.speechace_score.fluency,
        cefr_pronunciation: score.cefr_score.pronunciation,
        cefr_fluency: score.cefr_score.fluency,
        word_scores: score.word_score_list,
    })
}

#[async_trait]
impl PronunciationScorer for SpeechaceScorer {
    async fn evaluate(&self, recording: &Recording) -> Result<ProcessedEvaluationData> {
        let text = recording.transcript_text()?;
        let audio = recording.audio_bytes()?;
        let file_name = recording
            .audio_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        let form = Self::build_form(text, audio, file_name)?;

        debug!("Posting scoring request to {}", self.endpoint);
        let mut request = self.client.post(&self.endpoint).multipart(form);
        if !self.api_key.is_empty() {
            request = request.query(&[("key", self.api_key.as_str())]);
        }

        let response = request.send().await.map_err(|e| TalkscoreError::Transport {
            service: SERVICE,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TalkscoreError::Transport {
                service: SERVICE,
                message: format!("status {}: {}", status, body),
            });
        }

        let body = response.bytes().await.map_err(|e| TalkscoreError::Transport {
            service: SERVICE,
            message: e.to_string(),
        })?;

        self.persist_raw(&body)?;
        decode_scoring_response(&body)
    }
}
