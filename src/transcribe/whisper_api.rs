//! Whisper HTTP API transcription backend.

use crate::config::TranscriptionConfig;
use crate::defaults;
use crate::error::{Result, TalkscoreError};
use crate::transcribe::transcriber::Transcriber;
use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const SERVICE: &str = "transcription API";

#[derive(Deserialize, Debug)]
struct TranscriptionResponse {
    text: String,
}

/// Sends the recording to the Whisper transcription endpoint and returns the
/// recognized text.
pub struct WhisperApiTranscriber {
    endpoint: String,
    api_key: String,
    model: String,
    language: String,
    client: reqwest::Client,
}

impl WhisperApiTranscriber {
    pub fn new(config: &TranscriptionConfig) -> Result<Self> {
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
            model: config.model.clone(),
            language: config.language.clone(),
            client,
        })
    }

    fn decode(body: &[u8]) -> Result<String> {
        let response: TranscriptionResponse =
            serde_json::from_slice(body).map_err(|e| TalkscoreError::Decode {
                service: SERVICE,
                message: e.to_string(),
            })?;
        Ok(response.text)
    }
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let audio = std::fs::read(audio_path).map_err(|e| TalkscoreError::Read {
            path: audio_path.display().to_string(),
            source: e,
        })?;

        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        let audio_part = Part::bytes(audio)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| TalkscoreError::Transport {
                service: SERVICE,
                message: format!("Failed to build audio part: {}", e),
            })?;

        let form = Form::new()
            .part("file", audio_part)
            .text("model", self.model.clone())
            .text("language", self.language.clone());

        debug!(
            "Posting {} to {} (model: {})",
            audio_path.display(),
            self.endpoint,
            self.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TalkscoreError::Transport {
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

        let text = Self::decode(&body)?;
        debug!("Transcription completed: {} chars", text.len());
        Ok(text)
    }

    fn backend_name(&self) -> &str {
        "whisper-api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_extracts_text_field() {
        let body = br#"{"text": "the quick brown fox"}"#;
        assert_eq!(
            WhisperApiTranscriber::decode(body).unwrap(),
            "the quick brown fox"
        );
    }

    #[test]
    fn decode_unexpected_schema_is_decode_error() {
        let body = br#"{"transcript": "wrong field name"}"#;
        let result = WhisperApiTranscriber::decode(body);
        assert!(matches!(result, Err(TalkscoreError::Decode { .. })));
    }

    #[test]
    fn decode_non_json_is_decode_error() {
        let result = WhisperApiTranscriber::decode(b"<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(TalkscoreError::Decode { .. })));
    }

    #[test]
    fn new_uses_config_fields() {
        let config = TranscriptionConfig {
            endpoint: "https://example.test/v1/audio/transcriptions".to_string(),
            model: "whisper-1".to_string(),
            language: "ja".to_string(),
            api_key: "sk-test".to_string(),
            ..Default::default()
        };
        let transcriber = WhisperApiTranscriber::new(&config).unwrap();
        assert_eq!(transcriber.endpoint, config.endpoint);
        assert_eq!(transcriber.language, "ja");
        assert_eq!(transcriber.backend_name(), "whisper-api");
    }

    #[tokio::test]
    async fn transcribe_missing_audio_is_read_error() {
        let transcriber = WhisperApiTranscriber::new(&TranscriptionConfig::default()).unwrap();
        let result = transcriber.transcribe(Path::new("/nonexistent/audio.wav")).await;
        assert!(matches!(result, Err(TalkscoreError::Read { .. })));
    }
}
