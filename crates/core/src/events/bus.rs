use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::{sync::mpsc, time::Instant};
use tracing::debug;
use uuid::Uuid;

use crate::events::{Completion, EnrichedCompletion};

#[derive(Default)]
pub struct BusMetrics {
    pub published_total: AtomicU64,
    pub stale_total: AtomicU64,
    pub undelivered_total: AtomicU64,
}

impl BusMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_stale(&self) {
        self.stale_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            published: self.published_total.load(Ordering::Relaxed),
            stale: self.stale_total.load(Ordering::Relaxed),
            undelivered: self.undelivered_total.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub published: u64,
    pub stale: u64,
    pub undelivered: u64,
}

/// Carries completions from spawned request tasks back to the single task
/// that owns the controllers.
#[derive(Clone)]
pub struct CompletionBus {
    inner: Arc<CompletionBusInner>,
}

struct CompletionBusInner {
    session_id: Uuid,
    next_ingest_seq: AtomicU64,
    tx: mpsc::UnboundedSender<EnrichedCompletion>,
    metrics: Arc<BusMetrics>,
}

pub struct CompletionReceiver {
    rx: mpsc::UnboundedReceiver<EnrichedCompletion>,
}

impl CompletionBus {
    pub fn new(session_id: Uuid) -> (Self, CompletionReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let bus = Self {
            inner: Arc::new(CompletionBusInner {
                session_id,
                next_ingest_seq: AtomicU64::new(0),
                tx,
                metrics: Arc::new(BusMetrics::new()),
            }),
        };
        (bus, CompletionReceiver { rx })
    }

    pub fn publish(&self, completion: Completion) {
        let ingest_seq = self.inner.next_ingest_seq.fetch_add(1, Ordering::Relaxed);
        let kind = completion.kind();
        let token = completion.token();

        let enriched = EnrichedCompletion {
            completion,
            ingest_seq,
            received_at: Instant::now(),
        };

        self.inner.metrics.published_total.fetch_add(1, Ordering::Relaxed);
        if self.inner.tx.send(enriched).is_err() {
            // Orchestrator is gone; nobody is left to show the result.
            self.inner
                .metrics
                .undelivered_total
                .fetch_add(1, Ordering::Relaxed);
            debug!(
                session_id = %self.inner.session_id,
                slot = kind.name(),
                %token,
                "completion dropped, receiver closed"
            );
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.inner.session_id
    }

    pub fn metrics(&self) -> &BusMetrics {
        &self.inner.metrics
    }
}

impl CompletionReceiver {
    /// Cancel safe: a completion is either returned or left in the channel.
    pub async fn recv(&mut self) -> Option<EnrichedCompletion> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{ErrorCause, ErrorInfo},
        events::SlotKind,
        state::OperationSlot,
    };

    #[tokio::test]
    async fn test_publish_assigns_ingest_sequence() {
        let (bus, mut rx) = CompletionBus::new(Uuid::new_v4());
        let mut slot = OperationSlot::<crate::types::SummaryText>::new();

        for _ in 0..2 {
            bus.publish(Completion::Summary {
                token: slot.begin(),
                outcome: Err(ErrorInfo::new(ErrorCause::Transport, "down")),
            });
        }

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.ingest_seq, 0);
        assert_eq!(second.ingest_seq, 1);
        assert_eq!(first.completion.kind(), SlotKind::Summary);
        assert!(second.completion.token() > first.completion.token());
        assert_eq!(bus.metrics().snapshot().published, 2);
    }

    #[test]
    fn test_publish_after_receiver_dropped_is_counted() {
        let (bus, rx) = CompletionBus::new(Uuid::new_v4());
        drop(rx);
        let mut slot = OperationSlot::<crate::types::SummaryText>::new();
        bus.publish(Completion::Summary {
            token: slot.begin(),
            outcome: Err(ErrorInfo::new(ErrorCause::Transport, "down")),
        });
        assert_eq!(bus.metrics().snapshot().undelivered, 1);
    }
}
