//! Default configuration constants for talkscore.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

/// OpenAI Whisper transcription endpoint.
pub const TRANSCRIPTION_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

/// OpenAI chat completions endpoint, used for content grading.
pub const CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Speechace text-scoring endpoint.
pub const SCORING_ENDPOINT: &str = "https://api.speechace.co/api/scoring/text/v9/json";

/// Default transcription model id sent to the Whisper API.
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Default chat model used for content grading.
pub const CHAT_MODEL: &str = "gpt-4o";

/// Default language code for transcription and scoring.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Token budget for a single chat completion.
pub const MAX_TOKENS: u32 = 500;

/// Maximum number of messages retained in a chat conversation window.
///
/// The conversation is reset between independent evaluations; the window only
/// matters when a caller deliberately holds a multi-turn exchange open.
pub const MAX_CHAT_HISTORY: usize = 16;

/// Connect timeout applied to every HTTP client, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Request timeout for transcription calls, in seconds.
pub const TRANSCRIPTION_TIMEOUT_SECS: u64 = 60;

/// Request timeout for pronunciation-scoring calls, in seconds.
pub const SCORING_TIMEOUT_SECS: u64 = 60;

/// Request timeout for chat completions, in seconds.
///
/// LLM calls are markedly slower than the other call classes, so this is the
/// longest of the three.
pub const CHAT_TIMEOUT_SECS: u64 = 120;

/// Minimum recording duration (seconds) before evaluation is allowed.
///
/// A value of 0 means any non-empty recording passes validation.
pub const MIN_RECORDING_SECS: f64 = 10.0;

/// Maximum number of entries kept in the rolling score / attendance queues.
pub const HISTORY_CAPACITY: usize = 7;

/// Seconds in one attendance day.
pub const DAY_SECS: u64 = 24 * 60 * 60;

/// File name for the persisted transcript of the most recent recording.
pub const TRANSCRIPT_FILE: &str = "recognized_text.txt";

/// File name for the raw scoring-API response, kept for offline debugging.
///
/// Overwritten on every scoring call; not part of the evaluation contract.
pub const DIAGNOSTICS_FILE: &str = "pronunciation_result.json";

/// File name for the persisted session history state.
pub const HISTORY_FILE: &str = "session_history.json";

/// Per-word quality score at or above which a word counts as well pronounced.
pub const WORD_QUALITY_GOOD: u32 = 80;

/// Per-word quality score at or above which a word counts as acceptable.
pub const WORD_QUALITY_FAIR: u32 = 70;

/// Reference words-per-minute bands shown alongside a measured WPM.
pub const WPM_REFERENCE_BANDS: &[(&str, u32, u32)] = &[
    ("Japanese speaker average", 90, 110),
    ("Native speaker average", 200, 250),
    ("Presentation on a familiar topic", 130, 160),
    ("Presentation on a new topic", 100, 130),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_ordered_by_call_class() {
        // Chat completions are the slow path and must get the largest budget.
        assert!(CHAT_TIMEOUT_SECS >= SCORING_TIMEOUT_SECS);
        assert!(CHAT_TIMEOUT_SECS >= TRANSCRIPTION_TIMEOUT_SECS);
    }

    #[test]
    fn history_capacity_is_one_week() {
        assert_eq!(HISTORY_CAPACITY, 7);
    }

    #[test]
    fn word_quality_bands_are_ordered() {
        assert!(WORD_QUALITY_GOOD > WORD_QUALITY_FAIR);
    }
}
