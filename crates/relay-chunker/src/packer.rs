//! Greedy, order-preserving grouping of chunks into messages.
//!
//! Each message accumulates chunks until the next one would push it past
//! `max_lines` (summed chunk line counts, separators excluded) or
//! `max_paragraphs` (chunk count). Limits only gate additional chunks: the
//! first chunk of a message is always accepted, so an oversized chunk is
//! emitted on its own rather than cut.

use crate::fence::Chunk;
use crate::limits::Limits;

/// Separator placed between chunks inside one message.
pub const CHUNK_SEPARATOR: &str = "\n\n";

pub fn pack(chunks: &[Chunk], limits: &Limits) -> Vec<String> {
    let mut messages = Vec::new();
    let mut group: Vec<&str> = Vec::new();
    let mut lines = 0;

    for chunk in chunks {
        let chunk_lines = chunk.line_count();

        if !group.is_empty()
            && (lines + chunk_lines > limits.max_lines
                || group.len() + 1 > limits.max_paragraphs)
        {
            messages.push(group.join(CHUNK_SEPARATOR));
            group.clear();
            lines = 0;
        }

        group.push(chunk.as_str());
        lines += chunk_lines;
    }

    if !group.is_empty() {
        messages.push(group.join(CHUNK_SEPARATOR));
    }

    messages
}
