use async_trait::async_trait;

use crate::{error::ChannelError, payload::ReplyPayload};

/// Common interface implemented by every outbound transport (Telegram, Discord, WebChat, …).
///
/// Implementations must be `Send + Sync` so a single adapter can be shared
/// between the tasks that produce replies.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Stable lowercase identifier for this channel (e.g. `"telegram"`).
    fn name(&self) -> &str;

    /// Deliver one already-split payload.
    ///
    /// Takes `&self` so a connected adapter can send concurrently without a
    /// mutable borrow.
    async fn send(&self, payload: &ReplyPayload) -> Result<(), ChannelError>;
}
