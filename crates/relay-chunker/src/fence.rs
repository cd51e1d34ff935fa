//! Fenced code block extraction.
//!
//! A fence opens with ```` ``` ```` or `~~~` and closes at the next
//! occurrence of the same delimiter. The two families never close each
//! other. When both have a complete block ahead of the cursor, the one that
//! starts first wins. A delimiter without a partner is ordinary text.

use crate::paragraph::{line_count, split_paragraphs};

const DELIMITERS: [&str; 2] = ["```", "~~~"];

/// One atomic unit of output. The packer never splits a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Trimmed prose paragraph.
    Paragraph(String),
    /// Fenced code block, verbatim including both delimiters.
    Fence(String),
}

impl Chunk {
    pub fn as_str(&self) -> &str {
        match self {
            Chunk::Paragraph(text) | Chunk::Fence(text) => text,
        }
    }

    pub fn is_fence(&self) -> bool {
        matches!(self, Chunk::Fence(_))
    }

    pub fn line_count(&self) -> usize {
        line_count(self.as_str())
    }
}

/// Byte range `[start, end)` of the earliest complete fence at or after `from`.
fn next_fence(text: &str, from: usize) -> Option<(usize, usize)> {
    let rest = &text[from..];
    DELIMITERS
        .iter()
        .filter_map(|delim| {
            let open = rest.find(delim)?;
            let body = open + delim.len();
            let close = rest[body..].find(delim)? + body;
            Some((from + open, from + close + delim.len()))
        })
        .min_by_key(|&(start, _)| start)
}

/// Turn raw text into the ordered chunk sequence: fenced blocks verbatim,
/// everything around them split into paragraphs.
pub fn extract_chunks(text: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut cursor = 0;

    while let Some((start, end)) = next_fence(text, cursor) {
        push_paragraphs(&mut chunks, &text[cursor..start]);
        chunks.push(Chunk::Fence(text[start..end].to_string()));
        cursor = end;
    }
    push_paragraphs(&mut chunks, &text[cursor..]);

    chunks
}

fn push_paragraphs(chunks: &mut Vec<Chunk>, segment: &str) {
    chunks.extend(split_paragraphs(segment).into_iter().map(Chunk::Paragraph));
}
