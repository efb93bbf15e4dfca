/// Default per-chunk character budget.
pub const DEFAULT_MAX_CHARS: usize = 80;

/// One subtitle's worth of narration: a run of whole words, in narration order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SubtitleChunk {
    text: String,
    word_count: usize,
}

impl SubtitleChunk {
    fn from_words(words: &[&str]) -> Self {
        Self {
            text: words.join(" "),
            word_count: words.len(),
        }
    }

    /// Space-joined words of this chunk.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of words in this chunk (always >= 1).
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Character length of [`Self::text`].
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split narration text into display-sized chunks.
///
/// Words are taken greedily: a word joins the current chunk while the space-joined result stays
/// within `max_chars` characters, otherwise the current chunk is closed and the word starts the
/// next one. A single word longer than `max_chars` becomes its own oversized chunk; nothing is
/// truncated. Empty or whitespace-only text yields no chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<SubtitleChunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let joined_len = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };

        if joined_len <= max_chars || current.is_empty() {
            current.push(word);
            current_len = joined_len;
            continue;
        }

        chunks.push(SubtitleChunk::from_words(&current));
        current.clear();
        current.push(word);
        current_len = word_len;
    }

    if !current.is_empty() {
        chunks.push(SubtitleChunk::from_words(&current));
    }

    chunks
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/chunk.rs"]
mod tests;
