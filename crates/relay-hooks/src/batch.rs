//! Per-sender debounce buffer for inbound messages.
//!
//! People often send a thought as several quick messages. Each message
//! restarts its sender's quiet timer; when the timer runs out, or the buffer
//! reaches `max_batch`, everything buffered goes out as one [`InboundBatch`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use relay_core::HooksConfig;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::types::{InboundBatch, InboundMessage};

/// Capacity of the flushed-batch queue.
const QUEUE_DEPTH: usize = 256;

#[derive(Default)]
struct Pending {
    messages: Vec<InboundMessage>,
    /// Stamp of the latest push; a timer only flushes if it still matches.
    /// Drawn from a batcher-wide counter so values never repeat for a key.
    generation: u64,
}

type PendingMap = Arc<Mutex<HashMap<String, Pending>>>;

pub struct InboundBatcher {
    debounce: Duration,
    max_batch: usize,
    pending: PendingMap,
    next_generation: AtomicU64,
    tx: mpsc::Sender<InboundBatch>,
}

impl InboundBatcher {
    /// Create a batcher and the receiver its flushed batches arrive on.
    pub fn new(debounce: Duration, max_batch: usize) -> (Self, mpsc::Receiver<InboundBatch>) {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let batcher = Self {
            debounce,
            max_batch: max_batch.max(1),
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
            tx,
        };
        (batcher, rx)
    }

    pub fn from_config(config: &HooksConfig) -> (Self, mpsc::Receiver<InboundBatch>) {
        Self::new(Duration::from_millis(config.debounce_ms), config.max_batch)
    }

    /// Buffer `message`, or forward it at once when batching is disabled.
    pub async fn push(&self, message: InboundMessage) {
        if self.debounce.is_zero() {
            send(&self.tx, InboundBatch::single(message)).await;
            return;
        }

        let key = message.batch_key();
        let mut pending = self.pending.lock().await;
        let entry = pending.entry(key.clone()).or_default();
        entry.messages.push(message);
        entry.generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;

        if entry.messages.len() >= self.max_batch {
            let Some(full) = pending.remove(&key) else {
                return;
            };
            drop(pending);
            debug!(key = %key, size = full.messages.len(), "batch full, flushing early");
            send(&self.tx, InboundBatch::new(key, full.messages)).await;
            return;
        }

        let generation = entry.generation;
        drop(pending);
        self.arm_timer(key, generation);
    }

    fn arm_timer(&self, key: String, generation: u64) {
        let pending = Arc::clone(&self.pending);
        // weak, so dropping the batcher closes the queue without waiting for timers
        let tx = self.tx.downgrade();
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            let mut map = pending.lock().await;
            let current = map.get(&key).map(|p| p.generation);
            if current != Some(generation) {
                // superseded by a newer message, or already flushed
                return;
            }
            let Some(done) = map.remove(&key) else {
                return;
            };
            drop(map);
            let Some(tx) = tx.upgrade() else {
                warn!(key = %key, "inbound batcher dropped, batch discarded");
                return;
            };
            debug!(key = %key, size = done.messages.len(), "batch flushed");
            send(&tx, InboundBatch::new(key, done.messages)).await;
        });
    }

    /// Flush every buffered sender immediately (e.g. on shutdown).
    pub async fn flush_all(&self) {
        let drained: Vec<(String, Pending)> = self.pending.lock().await.drain().collect();
        for (key, pending) in drained {
            send(&self.tx, InboundBatch::new(key, pending.messages)).await;
        }
    }

    /// Number of senders with messages waiting.
    pub async fn pending_senders(&self) -> usize {
        self.pending.lock().await.len()
    }
}

async fn send(tx: &mpsc::Sender<InboundBatch>, batch: InboundBatch) {
    let key = batch.key.clone();
    if tx.send(batch).await.is_err() {
        warn!(key = %key, "inbound batch receiver closed, batch dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sender: &str, text: &str) -> InboundMessage {
        InboundMessage::new("discord", sender, text)
    }

    #[tokio::test]
    async fn zero_debounce_passes_through() {
        let (batcher, mut rx) = InboundBatcher::new(Duration::ZERO, 10);
        batcher.push(msg("1", "a")).await;
        batcher.push(msg("1", "b")).await;

        assert_eq!(rx.try_recv().unwrap().text, "a");
        assert_eq!(rx.try_recv().unwrap().text, "b");
        assert_eq!(batcher.pending_senders().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn quick_messages_flush_together() {
        let (batcher, mut rx) = InboundBatcher::new(Duration::from_millis(500), 10);
        let start = tokio::time::Instant::now();

        batcher.push(msg("1", "hey")).await;
        tokio::time::sleep(Duration::from_millis(300)).await;
        batcher.push(msg("1", "are you there?")).await;

        let batch = rx.recv().await.unwrap();
        assert_eq!(batch.key, "discord:1");
        assert_eq!(batch.messages.len(), 2);
        assert_eq!(batch.text, "hey\nare you there?");
        // the second message restarted the timer
        assert_eq!(start.elapsed(), Duration::from_millis(800));
    }

    #[tokio::test(start_paused = true)]
    async fn gap_longer_than_debounce_makes_two_batches() {
        let (batcher, mut rx) = InboundBatcher::new(Duration::from_millis(500), 10);

        batcher.push(msg("1", "first")).await;
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        batcher.push(msg("1", "second")).await;

        assert_eq!(rx.recv().await.unwrap().text, "first");
        assert_eq!(rx.recv().await.unwrap().text, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn max_batch_flushes_early() {
        let (batcher, mut rx) = InboundBatcher::new(Duration::from_secs(60), 2);

        batcher.push(msg("1", "a")).await;
        batcher.push(msg("1", "b")).await;

        // no time has passed: the batch went out on the second push
        let batch = rx.try_recv().unwrap();
        assert_eq!(batch.text, "a\nb");
        assert_eq!(batcher.pending_senders().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn senders_are_batched_separately() {
        let (batcher, mut rx) = InboundBatcher::new(Duration::from_millis(200), 10);

        batcher.push(msg("1", "from one")).await;
        batcher.push(msg("2", "from two")).await;
        batcher.push(msg("1", "again one")).await;

        let mut batches = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
        batches.sort_by(|a, b| a.key.cmp(&b.key));
        assert_eq!(batches[0].text, "from one\nagain one");
        assert_eq!(batches[1].text, "from two");
    }

    #[tokio::test(start_paused = true)]
    async fn flush_all_drains_everything() {
        let (batcher, mut rx) = InboundBatcher::new(Duration::from_secs(60), 10);
        batcher.push(msg("1", "x")).await;
        batcher.push(msg("2", "y")).await;

        batcher.flush_all().await;
        assert_eq!(batcher.pending_senders().await, 0);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn timer_from_an_early_flush_does_not_cut_the_next_batch() {
        let (batcher, mut rx) = InboundBatcher::new(Duration::from_millis(500), 2);
        let start = tokio::time::Instant::now();

        batcher.push(msg("1", "a")).await;
        batcher.push(msg("1", "b")).await;
        assert_eq!(rx.recv().await.unwrap().text, "a\nb");

        tokio::time::sleep(Duration::from_millis(400)).await;
        batcher.push(msg("1", "c")).await;

        // the timer armed by "a" wakes at 500ms and must leave "c" alone
        let batch = rx.recv().await.unwrap();
        assert_eq!(batch.text, "c");
        assert_eq!(start.elapsed(), Duration::from_millis(900));
    }

    #[tokio::test(start_paused = true)]
    async fn queue_closes_once_batcher_is_flushed_and_dropped() {
        let (batcher, mut rx) = InboundBatcher::new(Duration::from_secs(60), 10);
        let start = tokio::time::Instant::now();

        batcher.push(msg("1", "last words")).await;
        batcher.flush_all().await;
        drop(batcher);

        assert_eq!(rx.recv().await.unwrap().text, "last words");
        assert!(rx.recv().await.is_none());
        // the 60s timer still sleeping must not hold the queue open
        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
