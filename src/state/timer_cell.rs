//! Shared holder for the active run's timer state

use tokio::sync::watch;

use super::TimerState;

/// The only state shared between the tick loop, the action consumers and
/// readers. Writers always install a complete snapshot; readers always see
/// one. `None` means no workout has been started (or it was reset).
#[derive(Debug)]
pub struct TimerCell {
    tx: watch::Sender<Option<TimerState>>,
}

impl TimerCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn current(&self) -> Option<TimerState> {
        self.tx.borrow().clone()
    }

    /// Install a snapshot (or clear it), notifying subscribers
    pub fn replace(&self, state: Option<TimerState>) -> Option<TimerState> {
        self.tx.send_replace(state)
    }

    /// Atomically derive the next snapshot from the current one.
    ///
    /// `update` returns `None` to leave the cell untouched. Returns whether a
    /// different snapshot was installed; subscribers are only woken then.
    pub fn update<F>(&self, update: F) -> bool
    where
        F: FnOnce(&TimerState) -> Option<TimerState>,
    {
        self.tx.send_if_modified(|slot| {
            let Some(current) = slot.as_ref() else {
                return false;
            };
            match update(current) {
                Some(next) if next != *current => {
                    *slot = Some(next);
                    true
                }
                _ => false,
            }
        })
    }

    /// Stream of snapshots, one per change
    pub fn subscribe(&self) -> watch::Receiver<Option<TimerState>> {
        self.tx.subscribe()
    }
}

impl Default for TimerCell {
    fn default() -> Self {
        Self::new()
    }
}
