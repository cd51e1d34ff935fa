//! Expansion of reply payloads into channel-sized messages.

use relay_chunker::{split_message, Limits};
use relay_core::SplitConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::payload::ReplyPayload;

/// How the caller asked for splitting: a bare switch or explicit limits.
///
/// Deserializes from `true`, `false` or an options object such as
/// `{"maxLines": 10}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SplitSetting {
    Enabled(bool),
    Options(Limits),
}

impl SplitSetting {
    /// Effective limits, or `None` when splitting is switched off.
    pub fn limits(&self) -> Option<Limits> {
        match *self {
            SplitSetting::Enabled(true) => Some(Limits::default()),
            SplitSetting::Enabled(false) => None,
            SplitSetting::Options(limits) => Some(limits.normalized()),
        }
    }
}

impl From<&SplitConfig> for SplitSetting {
    fn from(config: &SplitConfig) -> Self {
        if config.enabled {
            SplitSetting::Options(Limits::new(config.max_lines, config.max_paragraphs))
        } else {
            SplitSetting::Enabled(false)
        }
    }
}

/// Split each payload's text into bounded messages.
///
/// - no setting, or splitting disabled: payloads come back untouched
/// - payloads with `channel_data` are never split
/// - text that yields zero or one message leaves the payload as it was
/// - otherwise the first part keeps every original field and each later
///   part is a [`ReplyPayload::continuation`]
pub fn split_reply_payloads(
    payloads: Vec<ReplyPayload>,
    setting: Option<&SplitSetting>,
) -> Vec<ReplyPayload> {
    let Some(limits) = setting.and_then(SplitSetting::limits) else {
        return payloads;
    };

    let mut out = Vec::with_capacity(payloads.len());
    for payload in payloads {
        if payload.channel_data.is_some() {
            out.push(payload);
            continue;
        }

        let messages = match payload.text.as_deref() {
            Some(text) => split_message(text, &limits),
            None => Vec::new(),
        };
        if messages.len() <= 1 {
            out.push(payload);
            continue;
        }

        debug!(parts = messages.len(), "reply payload split");
        let mut parts = messages.into_iter();
        if let Some(first) = parts.next() {
            out.push(ReplyPayload {
                text: Some(first),
                ..payload.clone()
            });
        }
        out.extend(parts.map(|text| payload.continuation(text)));
    }
    out
}
