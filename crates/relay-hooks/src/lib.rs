//! relay-hooks — inbound side of the relay: per-sender batching and an
//! optional user-installed script hook that sees each batch first.
//!
//! ```text
//! channel adapter ──push──▶ InboundBatcher ──batch──▶ HookRunner ──resume──▶ InboundSink
//! ```
//!
//! Both stages are optional. With `debounce_ms = 0` every message is its own
//! batch; with no hook installed every batch goes straight to the sink.

pub mod batch;
pub mod error;
pub mod loader;
pub mod types;

use std::sync::Arc;

use tokio::sync::mpsc;

pub use batch::InboundBatcher;
pub use error::{HookError, Result};
pub use loader::{resolve_hook_path, HookRunner, ScriptHook};
pub use types::{HookDecision, InboundBatch, InboundMessage, InboundSink};

/// Feed flushed batches through the hook runner until the batcher is dropped.
pub async fn drive(
    mut batches: mpsc::Receiver<InboundBatch>,
    runner: HookRunner,
    sink: Arc<dyn InboundSink>,
) {
    while let Some(batch) = batches.recv().await {
        runner.dispatch(batch, sink.as_ref()).await;
    }
}
