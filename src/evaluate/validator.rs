//! Pre-evaluation checks on a captured recording.

use crate::recording::audio_duration_secs;
use log::{debug, warn};
use std::path::Path;

/// Returns true only when the audio/transcript pair is fit for evaluation.
///
/// Fails closed: missing paths, unreadable files, audio shorter than
/// `min_duration_secs`, or an empty transcript all reject the recording.
/// A threshold of 0 lets any non-empty recording pass.
pub fn is_valid(
    audio_path: Option<&Path>,
    transcript_path: Option<&Path>,
    min_duration_secs: f64,
) -> bool {
    is_audio_valid(audio_path, min_duration_secs) && is_transcript_valid(transcript_path)
}

fn is_audio_valid(audio_path: Option<&Path>, min_duration_secs: f64) -> bool {
    let Some(path) = audio_path else {
        warn!("No audio file supplied");
        return false;
    };

    match audio_duration_secs(path) {
        Ok(duration) if duration >= min_duration_secs => {
            debug!("Audio {} is {:.1}s, accepted", path.display(), duration);
            true
        }
        Ok(duration) => {
            warn!(
                "Audio {} is {:.1}s, below the {:.1}s minimum",
                path.display(),
                duration,
                min_duration_secs
            );
            false
        }
        Err(e) => {
            warn!("Audio {} rejected: {}", path.display(), e);
            false
        }
    }
}

fn is_transcript_valid(transcript_path: Option<&Path>) -> bool {
    let Some(path) = transcript_path else {
        warn!("No transcript file supplied");
        return false;
    };

    match std::fs::read_to_string(path) {
        Ok(text) if !text.trim().is_empty() => true,
        Ok(_) => {
            warn!("Transcript {} is empty", path.display());
            false
        }
        Err(e) => {
            warn!("Transcript {} rejected: {}", path.display(), e);
            false
        }
    }
}
