//! Blank-line paragraph splitting and line counting.
//!
//! A line terminator is `\r\n`, a bare `\r` or a bare `\n`. Two or more
//! consecutive terminators form a paragraph boundary. Whitespace between
//! terminators does not, so `"a\n \nb"` stays one paragraph.

/// Byte length of the line terminator starting at `i` (0 if none).
fn terminator_len(bytes: &[u8], i: usize) -> usize {
    match bytes.get(i) {
        Some(b'\r') if bytes.get(i + 1) == Some(&b'\n') => 2,
        Some(b'\r') | Some(b'\n') => 1,
        _ => 0,
    }
}

/// Split a plain (fence-free) segment into trimmed, non-empty paragraphs.
///
/// A segment without any blank-line run comes back as a single paragraph,
/// however many lines it has.
pub fn split_paragraphs(segment: &str) -> Vec<String> {
    let bytes = segment.as_bytes();
    let mut paragraphs = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let mut end = i;
        let mut terminators = 0;
        loop {
            let len = terminator_len(bytes, end);
            if len == 0 {
                break;
            }
            end += len;
            terminators += 1;
        }

        if terminators >= 2 {
            push_trimmed(&mut paragraphs, &segment[start..i]);
            start = end;
        }
        i = if terminators == 0 { i + 1 } else { end };
    }
    push_trimmed(&mut paragraphs, &segment[start..]);

    paragraphs
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

/// Number of terminator-delimited lines in `text`. Text without any
/// terminator (including the empty string) counts as one line.
pub fn line_count(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut lines = 1;
    let mut i = 0;
    while i < bytes.len() {
        match terminator_len(bytes, i) {
            0 => i += 1,
            len => {
                lines += 1;
                i += len;
            }
        }
    }
    lines
}
