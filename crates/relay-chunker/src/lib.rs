//! relay-chunker — fence-aware reflow of long replies into bounded messages.
//!
//! Text goes through three stages:
//! - [`fence`]: pulls fenced code blocks (```` ``` ```` / `~~~`) out verbatim
//! - [`paragraph`]: splits the text around them on blank lines
//! - [`packer`]: groups the resulting chunks into messages under [`Limits`]
//!
//! ```rust
//! use relay_chunker::{split_message, Limits};
//!
//! let limits = Limits::default().with_max_paragraphs(1);
//! let messages = split_message("Paragraph 1.\n\nParagraph 2.", &limits);
//! assert_eq!(messages, vec!["Paragraph 1.", "Paragraph 2."]);
//! ```

pub mod fence;
pub mod limits;
pub mod packer;
pub mod paragraph;

use tracing::debug;

pub use fence::{extract_chunks, Chunk};
pub use limits::Limits;
pub use packer::pack;

/// Split `text` into an ordered list of messages bounded by `limits`.
///
/// Empty input yields no messages. Fenced code blocks and paragraphs are
/// never cut; one that alone exceeds a limit becomes its own message.
pub fn split_message(text: &str, limits: &Limits) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chunks = extract_chunks(text);
    let messages = pack(&chunks, limits);

    debug!(
        chunks = chunks.len(),
        messages = messages.len(),
        max_lines = limits.max_lines,
        max_paragraphs = limits.max_paragraphs,
        "reply split"
    );
    messages
}

/// Dynamic entry point for JSON callers.
///
/// Anything other than a string (null, numbers, objects, …) has nothing to
/// split and yields an empty list. `options` is read leniently, see
/// [`Limits::from_value`].
pub fn split_message_value(text: &serde_json::Value, options: &serde_json::Value) -> Vec<String> {
    match text.as_str() {
        Some(s) => split_message(s, &Limits::from_value(options)),
        None => Vec::new(),
    }
}
