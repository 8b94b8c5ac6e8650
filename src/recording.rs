//! Handle to a captured speech recording.
//!
//! A `Recording` pairs the WAV file produced by the capture session with the
//! transcript file written after recognition. It owns neither asset; it is an
//! ephemeral reference passed into the evaluators.

use crate::error::{Result, TalkscoreError};
use std::fs;
use std::path::{Path, PathBuf};

/// Audio/transcript pair for one speech session.
#[derive(Debug, Clone)]
pub struct Recording {
    audio_path: PathBuf,
    transcript_path: PathBuf,
}

impl Recording {
    pub fn new(audio_path: impl Into<PathBuf>, transcript_path: impl Into<PathBuf>) -> Self {
        Self {
            audio_path: audio_path.into(),
            transcript_path: transcript_path.into(),
        }
    }

    pub fn audio_path(&self) -> &Path {
        &self.audio_path
    }

    pub fn transcript_path(&self) -> &Path {
        &self.transcript_path
    }

    /// Duration of the audio in seconds, read from the WAV header.
    pub fn duration_secs(&self) -> Result<f64> {
        audio_duration_secs(&self.audio_path)
    }

    /// Raw audio bytes, as uploaded to the scoring and transcription APIs.
    pub fn audio_bytes(&self) -> Result<Vec<u8>> {
        fs::read(&self.audio_path).map_err(|e| TalkscoreError::Read {
            path: self.audio_path.display().to_string(),
            source: e,
        })
    }

    /// Transcript text as recognized from the audio.
    pub fn transcript_text(&self) -> Result<String> {
        fs::read_to_string(&self.transcript_path).map_err(|e| TalkscoreError::Read {
            path: self.transcript_path.display().to_string(),
            source: e,
        })
    }

    /// Persist a freshly recognized transcript next to the audio.
    pub fn write_transcript(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.transcript_path.parent() {
            fs::create_dir_all(parent).map_err(|e| TalkscoreError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        fs::write(&self.transcript_path, text).map_err(|e| TalkscoreError::Write {
            path: self.transcript_path.display().to_string(),
            source: e,
        })
    }
}

/// Duration of a WAV file in seconds.
///
/// `hound` reports frames per channel, so duration is independent of the
/// channel count.
pub fn audio_duration_secs(path: &Path) -> Result<f64> {
    let reader = hound::WavReader::open(path).map_err(|e| TalkscoreError::Audio {
        message: format!("Failed to read WAV file {}: {}", path.display(), e),
    })?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(TalkscoreError::Audio {
            message: format!("WAV file {} has zero sample rate", path.display()),
        });
    }
    Ok(f64::from(reader.duration()) / f64::from(spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn duration_from_wav_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one_second.wav");
        write_wav(&path, 16000, &vec![0i16; 16000]);

        let duration = audio_duration_secs(&path).unwrap();
        assert!((duration - 1.0).abs() < 1e-9, "got {}", duration);
    }

    #[test]
    fn duration_of_empty_wav_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        write_wav(&path, 16000, &[]);

        assert_eq!(audio_duration_secs(&path).unwrap(), 0.0);
    }

    #[test]
    fn duration_of_missing_file_is_audio_error() {
        let result = audio_duration_secs(Path::new("/nonexistent/audio.wav"));
        assert!(matches!(result, Err(TalkscoreError::Audio { .. })));
    }

    #[test]
    fn duration_of_garbage_file_is_audio_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.wav");
        fs::write(&path, b"definitely not a wav file").unwrap();

        let result = audio_duration_secs(&path);
        assert!(matches!(result, Err(TalkscoreError::Audio { .. })));
    }

    #[test]
    fn transcript_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let recording = Recording::new(
            dir.path().join("audio.wav"),
            dir.path().join("nested/transcript.txt"),
        );

        recording.write_transcript("hello speech").unwrap();
        assert_eq!(recording.transcript_text().unwrap(), "hello speech");
    }

    #[test]
    fn missing_transcript_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let recording = Recording::new(dir.path().join("a.wav"), dir.path().join("t.txt"));

        let result = recording.transcript_text();
        assert!(matches!(result, Err(TalkscoreError::Read { .. })));
    }

    #[test]
    fn audio_bytes_reads_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio.wav");
        write_wav(&path, 16000, &[1, 2, 3]);

        let recording = Recording::new(&path, dir.path().join("t.txt"));
        let bytes = recording.audio_bytes().unwrap();
        assert_eq!(bytes, fs::read(&path).unwrap());
        assert!(!bytes.is_empty());
    }
}
