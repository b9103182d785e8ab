//! Workout orchestrator: validation, run lifecycle and display values

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    clock::TimeSource,
    error::{Result, TimerError},
    services::{ErrorReporter, SoundPlayer},
    tasks::{
        action_queue, cancellation, run_action_task, session_action_task, workout_tick_task,
        ActionQueue, CancelHandle, SupervisedTask, TaskSupervisor, WorkoutTicker,
    },
};

use super::{
    display, RunAction, SessionAction, TimerCell, TimerState, UserAction, ValidationErrors,
    WorkoutConfig, WorkoutInputs,
};

/// How long a cancelled task gets to exit before it is aborted
const TASK_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Collaborators wired in at construction
#[derive(Clone)]
pub struct AppServices {
    pub clock: Arc<dyn TimeSource>,
    pub player: Arc<dyn SoundPlayer>,
    pub reporter: Arc<dyn ErrorReporter>,
    /// Tick quantum of the workout loop
    pub tick_interval: Duration,
}

/// Tasks and queue belonging to one started workout
struct ActiveRun {
    queue: Arc<ActionQueue<RunAction>>,
    cancel: CancelHandle,
    tick_task: SupervisedTask,
    action_task: SupervisedTask,
}

/// Owns the workout session: inputs, the active run and its timer state
pub struct AppState {
    services: AppServices,
    supervisor: Arc<TaskSupervisor>,
    /// Timer state of the active run, shared with that run's tasks
    cell: Arc<TimerCell>,
    inputs: Mutex<WorkoutInputs>,
    field_errors: Mutex<ValidationErrors>,
    session_queue: ActionQueue<SessionAction>,
    session_task: Mutex<Option<(CancelHandle, SupervisedTask)>>,
    active_run: Mutex<Option<ActiveRun>>,
    /// Last action tracking
    last_action: Mutex<Option<UserAction>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create the orchestrator and start its session action consumer.
    /// Must be called from within a tokio runtime.
    pub fn launch(services: AppServices) -> Arc<Self> {
        let supervisor = Arc::new(TaskSupervisor::new(Arc::clone(&services.reporter)));
        let (session_queue, session_rx) = action_queue("session");

        let state = Arc::new(Self {
            services,
            supervisor,
            cell: Arc::new(TimerCell::new()),
            inputs: Mutex::new(WorkoutInputs::default()),
            field_errors: Mutex::new(ValidationErrors::new()),
            session_queue,
            session_task: Mutex::new(None),
            active_run: Mutex::new(None),
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        });

        let (cancel, signal) = cancellation();
        let task = state.supervisor.spawn(
            "session-actions",
            session_action_task(Arc::clone(&state), session_rx, signal),
        );
        *lock(&state.session_task) = Some((cancel, task));

        info!(
            "Workout orchestrator ready (tick every {:?})",
            state.services.tick_interval
        );
        state
    }

    /// Store raw inputs and return the per-field errors they produce
    pub fn set_inputs(&self, inputs: WorkoutInputs) -> ValidationErrors {
        let errors = inputs.validate().err().unwrap_or_default();
        *lock(&self.inputs) = inputs;
        *lock(&self.field_errors) = errors.clone();
        errors
    }

    pub fn inputs(&self) -> WorkoutInputs {
        lock(&self.inputs).clone()
    }

    pub fn field_errors(&self) -> ValidationErrors {
        lock(&self.field_errors).clone()
    }

    /// Apply a user action.
    ///
    /// Start is rejected up front when any input is invalid. Pause and Resume
    /// require a started workout. With `wait`, returns only once the action
    /// has been applied, or fails with `ActionTimeout`.
    pub async fn dispatch(&self, action: UserAction, wait: bool) -> Result<()> {
        info!("Dispatching {} (wait={})", action, wait);

        match action {
            UserAction::Start => {
                let config = self.validated_config()?;
                let seq = self.session_queue.enqueue(SessionAction::Start(config))?;
                self.record_action(action);
                if wait {
                    self.session_queue.wait_applied(seq, action.name()).await?;
                }
            }
            UserAction::Reset => {
                let seq = self.session_queue.enqueue(SessionAction::Reset)?;
                self.record_action(action);
                if wait {
                    self.session_queue.wait_applied(seq, action.name()).await?;
                }
            }
            UserAction::Pause | UserAction::Resume => {
                let queue = self
                    .run_queue()
                    .ok_or(TimerError::NoActiveRun { action: action.name() })?;
                let run_action = if action == UserAction::Pause {
                    RunAction::Pause
                } else {
                    RunAction::Resume
                };
                let seq = queue.enqueue(run_action)?;
                self.record_action(action);
                if wait {
                    queue.wait_applied(seq, action.name()).await?;
                }
            }
        }

        Ok(())
    }

    fn validated_config(&self) -> Result<WorkoutConfig> {
        let validated = lock(&self.inputs).validate();
        match validated {
            Ok(config) => {
                *lock(&self.field_errors) = ValidationErrors::new();
                Ok(config)
            }
            Err(errors) => {
                warn!("Rejecting start, invalid inputs: {}", errors);
                *lock(&self.field_errors) = errors.clone();
                Err(TimerError::InvalidConfig(errors))
            }
        }
    }

    fn run_queue(&self) -> Option<Arc<ActionQueue<RunAction>>> {
        lock(&self.active_run).as_ref().map(|run| Arc::clone(&run.queue))
    }

    fn record_action(&self, action: UserAction) {
        *lock(&self.last_action) = Some(action);
        *lock(&self.last_action_time) = Some(Utc::now());
    }

    /// Replace any previous run with a fresh one for `config`. Called by the session consumer.
    pub(crate) async fn begin_run(&self, config: WorkoutConfig) {
        self.end_run().await;

        info!(
            "Starting workout: {} cycles of {}s work / {}s rest, {}s warmup, {}s cooldown",
            config.cycles(),
            config.work_seconds(),
            config.rest_seconds(),
            config.warmup_seconds(),
            config.cooldown_seconds()
        );

        self.cell.replace(Some(TimerState::new(&config)));
        let started_at = self.services.clock.now();

        let (queue, receiver) = action_queue("run");
        let (cancel, signal) = cancellation();
        let ticker = WorkoutTicker {
            cell: Arc::clone(&self.cell),
            clock: Arc::clone(&self.services.clock),
            player: Arc::clone(&self.services.player),
            interval: self.services.tick_interval,
            started_at,
        };

        let tick_task = self
            .supervisor
            .spawn("workout-tick", workout_tick_task(ticker, signal.clone()));
        let action_task = self.supervisor.spawn(
            "run-actions",
            run_action_task(Arc::clone(&self.cell), receiver, signal),
        );

        *lock(&self.active_run) = Some(ActiveRun {
            queue: Arc::new(queue),
            cancel,
            tick_task,
            action_task,
        });
    }

    /// Stop the active run's tasks and drop its state. Called by the session consumer.
    pub(crate) async fn end_run(&self) {
        let run = lock(&self.active_run).take();
        if let Some(run) = run {
            info!("Stopping active workout");
            run.cancel.cancel();
            run.tick_task.join(TASK_SHUTDOWN_GRACE).await;
            run.action_task.join(TASK_SHUTDOWN_GRACE).await;
        }
        self.cell.replace(None);
        self.supervisor.clear_error_message();
    }

    /// Tear down the active run and the session consumer
    pub async fn shutdown(&self) {
        self.end_run().await;
        let session = lock(&self.session_task).take();
        if let Some((cancel, task)) = session {
            cancel.cancel();
            task.join(TASK_SHUTDOWN_GRACE).await;
        }
        info!("Workout orchestrator stopped");
    }

    /// Current timer snapshot, if a workout has been started
    pub fn snapshot(&self) -> Option<TimerState> {
        self.cell.current()
    }

    /// Stream of timer snapshots, one per change
    pub fn subscribe(&self) -> watch::Receiver<Option<TimerState>> {
        self.cell.subscribe()
    }

    /// Inputs may be edited while no workout is in progress
    pub fn inputs_enabled(&self) -> bool {
        self.snapshot().map_or(true, |state| state.is_finished())
    }

    pub fn error_message(&self) -> Option<String> {
        self.supervisor.error_message()
    }

    pub fn subscribe_errors(&self) -> watch::Receiver<Option<String>> {
        self.supervisor.subscribe_errors()
    }

    pub fn last_action(&self) -> (Option<UserAction>, Option<DateTime<Utc>>) {
        (*lock(&self.last_action), *lock(&self.last_action_time))
    }

    fn preview_config(&self) -> Option<WorkoutConfig> {
        lock(&self.inputs).validate().ok()
    }

    /// Whole-workout time left as `MM:SS`; before a start, the length the inputs describe
    pub fn format_total_time_remaining(&self) -> String {
        let ms = match self.snapshot() {
            Some(state) => state.total_remaining_ms,
            None => self.preview_config().map_or(0, |config| config.total_duration_ms()),
        };
        display::format_clock(ms)
    }

    /// e.g. `Work: 00:15`, or `Ready` before a start
    pub fn format_stage_and_time(&self) -> String {
        self.snapshot()
            .map(|state| display::format_stage_and_time(&state))
            .unwrap_or_else(|| "Ready".to_string())
    }

    /// e.g. `3/8`
    pub fn format_cycle_number(&self) -> String {
        match self.snapshot() {
            Some(state) => display::format_cycle_number(&state),
            None => self
                .preview_config()
                .map(|config| format!("1/{}", config.cycles()))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Lock a mutex, recovering the data if a panicking holder poisoned it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
