use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message received from an external channel (Telegram, Discord, WebChat, …).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Logical channel name (e.g. "telegram", "discord").
    pub channel: String,

    /// Platform-native identifier for the sender (chat ID, user ID, …).
    pub sender_id: String,

    /// Human-readable display name for the sender, if available.
    pub sender_name: Option<String>,

    /// Plain text content of the message.
    pub content: String,

    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(
        channel: impl Into<String>,
        sender_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            sender_id: sender_id.into(),
            sender_name: None,
            content: content.into(),
            received_at: Utc::now(),
        }
    }

    /// Buffer key: messages from the same sender on the same channel batch together.
    pub fn batch_key(&self) -> String {
        format!("{}:{}", self.channel, self.sender_id)
    }
}

/// Consecutive messages from one sender, flushed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundBatch {
    pub key: String,
    pub messages: Vec<InboundMessage>,
    /// Combined text handed to default processing. Starts as the message
    /// contents joined by newlines; a hook may replace it.
    pub text: String,
}

impl InboundBatch {
    pub fn new(key: String, messages: Vec<InboundMessage>) -> Self {
        let text = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            key,
            messages,
            text,
        }
    }

    pub fn single(message: InboundMessage) -> Self {
        Self::new(message.batch_key(), vec![message])
    }
}

/// What a hook script decided to do with a batch. Read from the script's stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum HookDecision {
    /// Resume default processing, optionally with rewritten text.
    Continue {
        #[serde(default)]
        text: Option<String>,
    },
    /// The hook took care of the batch; default processing is skipped.
    Handled,
}

/// Default processing for inbound batches (normally: hand to the agent).
#[async_trait]
pub trait InboundSink: Send + Sync {
    async fn process(&self, batch: InboundBatch);
}
