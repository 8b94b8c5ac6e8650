//! Words-per-minute, a fluency proxy metric.

use crate::defaults;
use crate::error::Result;
use crate::recording::Recording;

/// Words per minute for a recording: whitespace-delimited word count divided
/// by duration in minutes. A zero-length recording yields 0 rather than a
/// division by zero.
pub fn words_per_minute(recording: &Recording) -> Result<f64> {
    let duration_secs = recording.duration_secs()?;
    let text = recording.transcript_text()?;
    let word_count = text.split_whitespace().count();

    if duration_secs == 0.0 {
        return Ok(0.0);
    }
    Ok(word_count as f64 / (duration_secs / 60.0))
}

/// Labels of reference bands whose range contains the given WPM, for display
/// next to the measured value.
pub fn matching_reference_bands(wpm: f64) -> Vec<&'static str> {
    defaults::WPM_REFERENCE_BANDS
        .iter()
        .filter(|(_, low, high)| wpm >= f64::from(*low) && wpm <= f64::from(*high))
        .map(|(label, _, _)| *label)
        .collect()
}
