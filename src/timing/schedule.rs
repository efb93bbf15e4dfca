use crate::foundation::core::TimeInterval;
use crate::foundation::error::{NarrataError, NarrataResult};
use crate::subtitle::chunk::SubtitleChunk;

/// Assign each chunk a display window proportional to its share of the narration's words.
///
/// The windows are contiguous, start at `0.0` and the last one ends at exactly
/// `audio_duration_secs`. Intermediate boundaries accumulate floating-point error; they are
/// clamped so the running cursor never passes the audio end.
#[tracing::instrument(skip(chunks), fields(chunks = chunks.len()))]
pub fn schedule(
    chunks: &[SubtitleChunk],
    audio_duration_secs: f64,
) -> NarrataResult<Vec<TimeInterval>> {
    let counts: Vec<usize> = chunks.iter().map(SubtitleChunk::word_count).collect();
    schedule_word_counts(&counts, audio_duration_secs)
}

/// [`schedule`] over bare word counts.
pub fn schedule_word_counts(
    word_counts: &[usize],
    audio_duration_secs: f64,
) -> NarrataResult<Vec<TimeInterval>> {
    if word_counts.is_empty() {
        return Err(NarrataError::scheduling("no subtitle chunks to schedule"));
    }
    if !audio_duration_secs.is_finite() || audio_duration_secs <= 0.0 {
        return Err(NarrataError::scheduling(format!(
            "audio duration must be finite and > 0 (got {audio_duration_secs})"
        )));
    }
    let total_words: usize = word_counts.iter().sum();
    if total_words == 0 {
        return Err(NarrataError::scheduling("total word count is zero"));
    }

    let last = word_counts.len() - 1;
    let mut out = Vec::with_capacity(word_counts.len());
    let mut cursor = 0.0f64;

    for (i, &words) in word_counts.iter().enumerate() {
        let share = (words as f64 / total_words as f64) * audio_duration_secs;
        let mut end = cursor + share;

        // The last window always closes on the audio end, before any clamping.
        if i == last {
            end = audio_duration_secs;
        } else if end > audio_duration_secs {
            end = audio_duration_secs;
        }

        out.push(TimeInterval::new(cursor, end)?);
        cursor = end;
    }

    tracing::debug!(
        total_words,
        audio_duration_secs,
        windows = out.len(),
        "scheduled subtitle windows"
    );
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/timing/schedule.rs"]
mod tests;
