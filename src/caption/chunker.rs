use crate::config::CaptionOverflow;

/// One caption: a bounded slice of narration words and its on-screen window.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CaptionChunk {
    /// Space-joined caption words.
    pub text: String,
    /// Timeline start in seconds.
    pub start_secs: f64,
    /// On-screen duration in seconds.
    pub duration_secs: f64,
}

impl CaptionChunk {
    /// Exclusive timeline end in seconds.
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }
}

/// Caption timing options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkOpts {
    /// Words per chunk (the final chunk may hold fewer).
    pub words_per_chunk: usize,
    /// Multiplier applied over the pure rate-derived duration.
    pub pacing: f64,
    /// Duration floor, except for a chunk clipped at the timeline end.
    pub min_secs: f64,
    /// Trailing-word policy.
    pub overflow: CaptionOverflow,
}

/// Split `text` into timed caption chunks covering at most `total_secs`.
///
/// Each chunk lasts `words * (total_secs / word_count) * pacing`, raised to `min_secs` and then
/// clipped to the time left on the timeline. Chunks are contiguous and start at 0. Once the next
/// start would reach `total_secs`, remaining words are dropped (or merged into the final chunk,
/// depending on `opts.overflow`).
pub fn chunk_captions(text: &str, total_secs: f64, opts: ChunkOpts) -> Vec<CaptionChunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || !(total_secs > 0.0) || opts.words_per_chunk == 0 {
        tracing::debug!("no caption words; rendering without captions");
        return Vec::new();
    }

    let secs_per_word = total_secs / words.len() as f64;
    let mut chunks = Vec::<CaptionChunk>::new();
    let mut start = 0.0f64;
    let mut consumed = 0usize;

    for group in words.chunks(opts.words_per_chunk) {
        if start >= total_secs {
            break;
        }
        let paced = group.len() as f64 * secs_per_word * opts.pacing;
        let duration = paced.max(opts.min_secs).min(total_secs - start);
        chunks.push(CaptionChunk {
            text: group.join(" "),
            start_secs: start,
            duration_secs: duration,
        });
        start += duration;
        consumed += group.len();
    }

    let dropped = words.len() - consumed;
    if dropped > 0 {
        match (opts.overflow, chunks.last_mut()) {
            (CaptionOverflow::MergeIntoLast, Some(last)) => {
                for w in &words[consumed..] {
                    last.text.push(' ');
                    last.text.push_str(w);
                }
                tracing::debug!(merged = dropped, "merged trailing caption words into last chunk");
            }
            _ => {
                tracing::debug!(dropped, "caption words past the timeline end were dropped");
            }
        }
    }

    chunks
}

#[cfg(test)]
#[path = "../../tests/unit/caption/chunker.rs"]
mod tests;
