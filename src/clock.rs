//! Time sources for the tick loop
//!
//! The tick loop never touches the wall clock directly. Production uses
//! `SystemClock`; tests drive a `ManualClock` forward by hand.

use std::{fmt, time::Duration};

use futures::future::BoxFuture;
use tokio::{sync::watch, time::Instant};

/// Monotonic time measured from the source's own origin
pub trait TimeSource: Send + Sync + fmt::Debug {
    /// Time elapsed since the source was created
    fn now(&self) -> Duration;

    /// Resolves once `now()` has reached `deadline`
    fn sleep_until(&self, deadline: Duration) -> BoxFuture<'static, ()>;

    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        self.sleep_until(self.now() + duration)
    }
}

/// Real monotonic time backed by the tokio timer
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep_until(&self, deadline: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep_until(self.origin + deadline))
    }
}

/// Virtual time that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: watch::Sender<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        let (now, _) = watch::channel(Duration::ZERO);
        Self { now }
    }

    /// Move virtual time forward, waking every sleeper whose deadline has passed
    pub fn advance(&self, by: Duration) {
        self.now.send_modify(|now| *now += by);
    }

    /// Jump to an absolute virtual time. Earlier times are ignored.
    pub fn set(&self, to: Duration) {
        self.now.send_if_modified(|now| {
            if to > *now {
                *now = to;
                true
            } else {
                false
            }
        });
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Duration {
        *self.now.borrow()
    }

    fn sleep_until(&self, deadline: Duration) -> BoxFuture<'static, ()> {
        let mut rx = self.now.subscribe();
        Box::pin(async move {
            // A dropped clock can never reach the deadline; let the sleeper go.
            let _ = rx.wait_for(|now| *now >= deadline).await;
        })
    }
}
