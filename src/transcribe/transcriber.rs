use crate::error::{Result, TalkscoreError};
use async_trait::async_trait;
use std::path::Path;

/// Trait for turning a recorded audio file into transcript text.
///
/// This trait allows swapping the backend at construction time: the Whisper
/// HTTP API, the transcript already produced on-device, or a mock in tests.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the WAV file at `audio_path` to plain text.
    async fn transcribe(&self, audio_path: &Path) -> Result<String>;

    /// Name of the backend, for logging.
    fn backend_name(&self) -> &str;
}

/// Backend that trusts the transcript the platform recognizer already wrote
/// during capture, instead of making a network call.
pub struct DeviceTranscriber {
    transcript_path: std::path::PathBuf,
}

impl DeviceTranscriber {
    pub fn new(transcript_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            transcript_path: transcript_path.into(),
        }
    }
}

#[async_trait]
impl Transcriber for DeviceTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<String> {
        let text =
            std::fs::read_to_string(&self.transcript_path).map_err(|e| TalkscoreError::Read {
                path: self.transcript_path.display().to_string(),
                source: e,
            })?;
        if text.trim().is_empty() {
            return Err(TalkscoreError::InputMissing {
                what: "device transcript",
            });
        }
        Ok(text)
    }

    fn backend_name(&self) -> &str {
        "device"
    }
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    response: String,
    should_fail: bool,
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self {
            response: "mock transcription".to_string(),
            should_fail: false,
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<String> {
        if self.should_fail {
            Err(TalkscoreError::Transport {
                service: "transcription API",
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_transcriber_returns_response() {
        let transcriber = MockTranscriber::new().with_response("Hello, this is a test");
        let result = transcriber.transcribe(Path::new("/any.wav")).await;
        assert_eq!(result.unwrap(), "Hello, this is a test");
    }

    #[tokio::test]
    async fn mock_transcriber_returns_error_when_configured() {
        let transcriber = MockTranscriber::new().with_failure();
        let result = transcriber.transcribe(Path::new("/any.wav")).await;
        match result {
            Err(TalkscoreError::Transport { message, .. }) => {
                assert_eq!(message, "mock transcription failure");
            }
            other => panic!("Expected Transport error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn device_transcriber_reads_recognized_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recognized_text.txt");
        std::fs::write(&path, "spoken words from the device recognizer").unwrap();

        let transcriber = DeviceTranscriber::new(&path);
        let text = transcriber.transcribe(Path::new("/any.wav")).await.unwrap();
        assert_eq!(text, "spoken words from the device recognizer");
        assert_eq!(transcriber.backend_name(), "device");
    }

    #[tokio::test]
    async fn device_transcriber_rejects_empty_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recognized_text.txt");
        std::fs::write(&path, "   \n").unwrap();

        let transcriber = DeviceTranscriber::new(&path);
        let result = transcriber.transcribe(Path::new("/any.wav")).await;
        assert!(matches!(result, Err(TalkscoreError::InputMissing { .. })));
    }

    #[tokio::test]
    async fn device_transcriber_missing_file_is_read_error() {
        let transcriber = DeviceTranscriber::new("/nonexistent/recognized_text.txt");
        let result = transcriber.transcribe(Path::new("/any.wav")).await;
        assert!(matches!(result, Err(TalkscoreError::Read { .. })));
    }

    #[test]
    fn transcriber_trait_is_object_safe() {
        let transcriber: Box<dyn Transcriber> =
            Box::new(MockTranscriber::new().with_response("boxed test"));
        assert_eq!(transcriber.backend_name(), "mock");
    }
}
