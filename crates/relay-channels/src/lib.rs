pub mod channel;
pub mod dispatch;
pub mod error;
pub mod payload;
pub mod split;

pub use channel::Channel;
pub use dispatch::ReplyDispatcher;
pub use error::ChannelError;
pub use payload::ReplyPayload;
pub use split::{split_reply_payloads, SplitSetting};
