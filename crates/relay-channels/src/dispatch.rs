use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    channel::Channel,
    error::{ChannelError, Result},
    payload::ReplyPayload,
    split::{split_reply_payloads, SplitSetting},
};

/// Splits replies and hands the parts to a channel in order.
#[derive(Debug, Clone, Default)]
pub struct ReplyDispatcher {
    split: Option<SplitSetting>,
    /// Pause between consecutive parts, to stay under platform rate limits.
    pacing: Option<Duration>,
}

impl ReplyDispatcher {
    pub fn new(split: Option<SplitSetting>) -> Self {
        Self {
            split,
            pacing: None,
        }
    }

    pub fn from_config(config: &relay_core::SplitConfig) -> Self {
        Self::new(Some(SplitSetting::from(config)))
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = Some(pacing);
        self
    }

    /// The payloads `deliver` would send, without sending them.
    pub fn prepare(&self, payloads: Vec<ReplyPayload>) -> Vec<ReplyPayload> {
        split_reply_payloads(payloads, self.split.as_ref())
    }

    /// Send every part of every payload through `channel`, in order.
    ///
    /// Stops at the first failed send. Returns the number of messages
    /// delivered; on failure the count so far is carried in
    /// [`ChannelError::Interrupted`].
    pub async fn deliver(
        &self,
        channel: &dyn Channel,
        payloads: Vec<ReplyPayload>,
    ) -> Result<usize> {
        let parts = self.prepare(payloads);
        let total = parts.len();

        for (i, part) in parts.iter().enumerate() {
            if let Err(e) = channel.send(part).await {
                warn!(
                    channel = channel.name(),
                    part = i,
                    total,
                    error = %e,
                    "reply delivery interrupted"
                );
                return Err(ChannelError::Interrupted {
                    delivered: i,
                    reason: e.to_string(),
                });
            }

            if let Some(pacing) = self.pacing {
                if i + 1 < total {
                    tokio::time::sleep(pacing).await;
                }
            }
        }

        debug!(channel = channel.name(), delivered = total, "reply delivered");
        Ok(total)
    }
}
