use serde::{Deserialize, Serialize};

/// One reply produced by the agent, on its way to a channel.
///
/// Field names follow the camelCase wire format shared with the webchat
/// client. Fields this crate does not know about are kept in `extra` and
/// written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Single attachment URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    /// Multiple attachment URLs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_urls: Vec<String>,

    /// Platform message id this reply answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,

    /// Reply to the message that triggered this turn.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reply_to_current: bool,

    /// Channel-specific structured content (embeds, keyboards, cards, …).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ReplyPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn has_media(&self) -> bool {
        self.media_url.is_some() || !self.media_urls.is_empty()
    }

    /// Copy carrying only `text` plus the fields that make sense on a
    /// follow-up message: attachments and reply association are removed so
    /// the continuation renders as a standalone message.
    pub fn continuation(&self, text: String) -> Self {
        Self {
            text: Some(text),
            media_url: None,
            media_urls: Vec::new(),
            reply_to_id: None,
            reply_to_current: false,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn camel_case_wire_format() {
        let payload: ReplyPayload = serde_json::from_value(json!({
            "text": "hi",
            "mediaUrl": "https://example.com/a.png",
            "replyToId": "123",
            "audioAsVoice": true,
        }))
        .unwrap();

        assert_eq!(payload.text.as_deref(), Some("hi"));
        assert_eq!(payload.reply_to_id.as_deref(), Some("123"));
        assert!(payload.has_media());
        assert_eq!(payload.extra.get("audioAsVoice"), Some(&json!(true)));

        let back = serde_json::to_value(&payload).unwrap();
        assert_eq!(back["mediaUrl"], "https://example.com/a.png");
        assert_eq!(back["audioAsVoice"], true);
        // defaults stay off the wire
        assert!(back.get("mediaUrls").is_none());
        assert!(back.get("replyToCurrent").is_none());
    }

    #[test]
    fn continuation_drops_media_and_reply_fields() {
        let payload = ReplyPayload {
            text: Some("first".into()),
            media_url: Some("m".into()),
            media_urls: vec!["a".into(), "b".into()],
            reply_to_id: Some("42".into()),
            reply_to_current: true,
            ..ReplyPayload::default()
        };

        let next = payload.continuation("second".into());
        assert_eq!(next.text.as_deref(), Some("second"));
        assert!(!next.has_media());
        assert!(next.reply_to_id.is_none());
        assert!(!next.reply_to_current);
    }
}
