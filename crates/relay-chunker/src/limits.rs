use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_LINES: usize = 20;
pub const DEFAULT_MAX_PARAGRAPHS: usize = 4;

/// Per-message budget. Both limits are enforced independently; either one
/// alone can start a new message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    #[serde(alias = "maxLines")]
    pub max_lines: usize,
    #[serde(alias = "maxParagraphs")]
    pub max_paragraphs: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            max_paragraphs: DEFAULT_MAX_PARAGRAPHS,
        }
    }
}

impl Limits {
    /// Build limits, replacing zero with the default for that field.
    pub fn new(max_lines: usize, max_paragraphs: usize) -> Self {
        Self::default()
            .with_max_lines(max_lines)
            .with_max_paragraphs(max_paragraphs)
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = if max_lines == 0 { DEFAULT_MAX_LINES } else { max_lines };
        self
    }

    pub fn with_max_paragraphs(mut self, max_paragraphs: usize) -> Self {
        self.max_paragraphs = if max_paragraphs == 0 {
            DEFAULT_MAX_PARAGRAPHS
        } else {
            max_paragraphs
        };
        self
    }

    /// Read limits from an untyped options object.
    ///
    /// Accepts `maxLines`/`max_lines` and `maxParagraphs`/`max_paragraphs`.
    /// Unknown keys are ignored; missing, zero, negative or non-integer
    /// values fall back to the default for that field. Never fails.
    pub fn from_value(options: &serde_json::Value) -> Self {
        let field = |camel: &str, snake: &str| {
            options
                .get(camel)
                .or_else(|| options.get(snake))
                .and_then(serde_json::Value::as_u64)
                .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
                .unwrap_or(0)
        };
        Self::new(
            field("maxLines", "max_lines"),
            field("maxParagraphs", "max_paragraphs"),
        )
    }

    /// Copy with zero fields replaced by defaults. Used after serde
    /// deserialization, which takes zeros literally.
    pub fn normalized(self) -> Self {
        Self::new(self.max_lines, self.max_paragraphs)
    }
}
