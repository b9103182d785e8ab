//! Supervision and cooperative cancellation for background tasks

use std::{any::Any, future::Future, sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    task::{AbortHandle, JoinHandle},
};
use tracing::{debug, warn};

use crate::{
    error::{Result, TimerError},
    services::ErrorReporter,
};

/// Owner side of a cancellation signal. Dropping it also cancels.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Task side of a cancellation signal, checked at each loop iteration
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation was requested or the handle was dropped
    pub async fn cancelled(&mut self) {
        let _ = self.rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Central handler for failures in background tasks.
///
/// Failures are forwarded to the injected reporter and surfaced as the
/// user-visible error message. Cancellation is routine and never reported.
pub struct TaskSupervisor {
    reporter: Arc<dyn ErrorReporter>,
    error_message: watch::Sender<Option<String>>,
}

impl TaskSupervisor {
    pub fn new(reporter: Arc<dyn ErrorReporter>) -> Self {
        let (error_message, _) = watch::channel(None);
        Self {
            reporter,
            error_message,
        }
    }

    /// Spawn `task` under supervision
    pub fn spawn<F>(self: &Arc<Self>, name: &'static str, task: F) -> SupervisedTask
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        let inner = tokio::spawn(task);
        let abort = inner.abort_handle();
        let supervisor = Arc::clone(self);

        let handle = tokio::spawn(async move {
            match inner.await {
                Ok(Ok(())) => debug!("{} task finished", name),
                Ok(Err(e)) => supervisor.handle_failure(name, e.to_string()),
                Err(e) if e.is_cancelled() => debug!("{} task cancelled", name),
                Err(e) => supervisor.handle_failure(name, panic_message(e.into_panic())),
            }
        });

        debug!("Spawned {} task", name);
        SupervisedTask {
            name,
            handle,
            abort,
        }
    }

    fn handle_failure(&self, task: &str, message: String) {
        let error = TimerError::TaskFailed {
            task: task.to_string(),
            message,
        };
        self.reporter.report(&error);
        self.error_message.send_replace(Some(error.to_string()));
    }

    pub fn error_message(&self) -> Option<String> {
        self.error_message.borrow().clone()
    }

    pub fn clear_error_message(&self) {
        self.error_message.send_if_modified(|message| message.take().is_some());
    }

    pub fn subscribe_errors(&self) -> watch::Receiver<Option<String>> {
        self.error_message.subscribe()
    }
}

/// Handle to a supervised task
#[derive(Debug)]
pub struct SupervisedTask {
    name: &'static str,
    handle: JoinHandle<()>,
    abort: AbortHandle,
}

impl SupervisedTask {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to exit after cancellation, aborting it if it overstays `grace`
    pub async fn join(mut self, grace: Duration) {
        if tokio::time::timeout(grace, &mut self.handle).await.is_err() {
            warn!("{} task did not stop within {:?}, aborting", self.name, grace);
            self.abort.abort();
            let _ = self.handle.await;
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl ErrorReporter for Recorder {
        fn report(&self, error: &TimerError) {
            self.0.lock().unwrap().push(error.to_string());
        }
    }

    fn supervisor() -> (Arc<Recorder>, Arc<TaskSupervisor>) {
        let recorder = Arc::new(Recorder::default());
        let supervisor = Arc::new(TaskSupervisor::new(recorder.clone()));
        (recorder, supervisor)
    }

    #[tokio::test]
    async fn failures_are_reported_and_surfaced() {
        let (recorder, supervisor) = supervisor();
        let task = supervisor.spawn("failing", async {
            Err::<(), _>(TimerError::NoActiveRun { action: "pause" })
        });
        task.join(Duration::from_secs(1)).await;

        assert_eq!(recorder.0.lock().unwrap().len(), 1);
        assert_eq!(
            supervisor.error_message().unwrap(),
            "failing task failed: Cannot pause: no active workout"
        );

        supervisor.clear_error_message();
        assert_eq!(supervisor.error_message(), None);
    }

    #[tokio::test]
    async fn panics_are_caught() {
        let (recorder, supervisor) = supervisor();
        let task = supervisor.spawn("panicking", async {
            if true {
                panic!("boom");
            }
            Ok(())
        });
        task.join(Duration::from_secs(1)).await;

        assert_eq!(
            recorder.0.lock().unwrap().as_slice(),
            ["panicking task failed: boom".to_string()]
        );
    }

    #[tokio::test]
    async fn cancellation_is_not_an_error() {
        let (recorder, supervisor) = supervisor();
        let (cancel, mut signal) = cancellation();
        let task = supervisor.spawn("looping", async move {
            signal.cancelled().await;
            Ok(())
        });

        cancel.cancel();
        task.join(Duration::from_secs(1)).await;
        assert!(recorder.0.lock().unwrap().is_empty());
        assert_eq!(supervisor.error_message(), None);
    }

    #[tokio::test]
    async fn stuck_task_is_aborted_silently() {
        let (recorder, supervisor) = supervisor();
        let task = supervisor.spawn("stuck", futures::future::pending::<Result<()>>());
        task.join(Duration::from_millis(20)).await;
        assert!(recorder.0.lock().unwrap().is_empty());
    }

    #[test]
    fn cancel_flips_signal() {
        let (cancel, signal) = cancellation();
        assert!(!signal.is_cancelled());
        cancel.cancel();
        assert!(signal.is_cancelled());
    }
}
