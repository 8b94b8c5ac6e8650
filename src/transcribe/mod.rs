//! Transcription backends.
//!
//! The backend is a strategy chosen at construction time from configuration:
//! the Whisper HTTP API, or the transcript the platform recognizer already
//! produced during capture.

pub mod transcriber;
pub mod whisper_api;

pub use transcriber::{DeviceTranscriber, MockTranscriber, Transcriber};
pub use whisper_api::WhisperApiTranscriber;

use crate::config::{Config, TranscriptionBackend};
use crate::error::Result;

/// Build the transcriber selected by `transcription.backend`.
pub fn from_config(config: &Config) -> Result<Box<dyn Transcriber>> {
    match config.transcription.backend {
        TranscriptionBackend::WhisperApi => Ok(Box::new(WhisperApiTranscriber::new(
            &config.transcription,
        )?)),
        TranscriptionBackend::Device => Ok(Box::new(DeviceTranscriber::new(
            config.storage.transcript_path(),
        ))),
    }
}
