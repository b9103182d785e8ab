//! Latest-value-wins action queue with a single consumer
//!
//! Producers overwrite whatever request is still pending; the consumer
//! applies requests one at a time and publishes the sequence number of the
//! last one it finished. Callers that want to block until their request took
//! effect poll that number with a bounded budget.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};
use tokio::sync::watch;
use tracing::debug;

use crate::error::{Result, TimerError};

/// Number of polls a waiting caller makes before giving up
pub const ACTION_WAIT_ATTEMPTS: u32 = 100;
/// Pause between polls
pub const ACTION_WAIT_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
struct Queued<A> {
    seq: u64,
    action: A,
}

/// Producer side
#[derive(Debug)]
pub struct ActionQueue<A> {
    target: &'static str,
    pending: watch::Sender<Option<Queued<A>>>,
    applied: watch::Receiver<u64>,
    next_seq: AtomicU64,
}

/// Consumer side, owned by exactly one task
#[derive(Debug)]
pub struct ActionReceiver<A> {
    pending: watch::Receiver<Option<Queued<A>>>,
    applied: watch::Sender<u64>,
}

/// Create a queue for `target` (used in logs and errors)
pub fn action_queue<A>(target: &'static str) -> (ActionQueue<A>, ActionReceiver<A>) {
    let (pending_tx, pending_rx) = watch::channel(None);
    let (applied_tx, applied_rx) = watch::channel(0);
    (
        ActionQueue {
            target,
            pending: pending_tx,
            applied: applied_rx,
            next_seq: AtomicU64::new(0),
        },
        ActionReceiver {
            pending: pending_rx,
            applied: applied_tx,
        },
    )
}

impl<A> ActionQueue<A> {
    /// Queue `action`, replacing any request the consumer has not picked up yet
    pub fn enqueue(&self, action: A) -> Result<u64> {
        if self.pending.is_closed() {
            return Err(TimerError::QueueClosed {
                target: self.target,
            });
        }
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.pending.send_replace(Some(Queued { seq, action }));
        debug!("Queued {} action #{}", self.target, seq);
        Ok(seq)
    }

    pub fn applied_seq(&self) -> u64 {
        *self.applied.borrow()
    }

    /// Wait until the consumer has applied request `seq` (or a later one that superseded it)
    pub async fn wait_applied(&self, seq: u64, action: &'static str) -> Result<()> {
        for _ in 0..ACTION_WAIT_ATTEMPTS {
            if self.applied_seq() >= seq {
                return Ok(());
            }
            if self.applied.has_changed().is_err() {
                return Err(TimerError::QueueClosed {
                    target: self.target,
                });
            }
            tokio::time::sleep(ACTION_WAIT_INTERVAL).await;
        }

        if self.applied_seq() >= seq {
            return Ok(());
        }
        Err(TimerError::ActionTimeout {
            action,
            waited_ms: u64::from(ACTION_WAIT_ATTEMPTS) * ACTION_WAIT_INTERVAL.as_millis() as u64,
        })
    }
}

impl<A: Clone> ActionReceiver<A> {
    /// Next pending request, or `None` once every producer is gone
    pub async fn recv(&mut self) -> Option<(u64, A)> {
        loop {
            self.pending.changed().await.ok()?;
            if let Some(queued) = self.pending.borrow_and_update().clone() {
                return Some((queued.seq, queued.action));
            }
        }
    }

    /// Report that request `seq` has been fully applied or rejected
    pub fn mark_applied(&self, seq: u64) {
        self.applied.send_modify(|applied| *applied = (*applied).max(seq));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn consumer_sees_only_latest_request() {
        let (queue, mut rx) = action_queue::<&'static str>("test");
        queue.enqueue("pause").unwrap();
        let latest = queue.enqueue("resume").unwrap();

        let (seq, action) = rx.recv().await.unwrap();
        assert_eq!(seq, latest);
        assert_eq!(action, "resume");
    }

    #[tokio::test]
    async fn waiting_succeeds_once_applied() {
        let (queue, mut rx) = action_queue::<u8>("test");
        let consumer = tokio::spawn(async move {
            while let Some((seq, _)) = rx.recv().await {
                rx.mark_applied(seq);
            }
        });

        let seq = queue.enqueue(1).unwrap();
        queue.wait_applied(seq, "one").await.unwrap();
        assert!(queue.applied_seq() >= seq);

        drop(queue);
        consumer.await.unwrap();
    }

    #[tokio::test]
    async fn waiting_times_out_without_consumer_progress() {
        let (queue, _rx) = action_queue::<u8>("test");
        let seq = queue.enqueue(1).unwrap();
        let err = queue.wait_applied(seq, "one").await.unwrap_err();
        assert!(matches!(err, TimerError::ActionTimeout { action: "one", .. }));
    }

    #[tokio::test]
    async fn enqueue_fails_once_consumer_is_gone() {
        let (queue, rx) = action_queue::<u8>("run");
        drop(rx);
        let err = queue.enqueue(1).unwrap_err();
        assert!(matches!(err, TimerError::QueueClosed { target: "run" }));
    }
}
