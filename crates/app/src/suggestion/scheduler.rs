//! Per-user suggestion scheduler.
//!
//! A single worker task owns the activation tracker, the last known snapshot
//! and both timers, so evaluations for one user never overlap. The task is
//! driven by a command channel:
//!
//! ```text
//!            enable                    non-empty evaluation
//! Disabled ─────────▶ Idle ─────────────────────────────────▶ Suggesting
//!    ▲                 ▲   ◀── display expiry / empty evaluation ──┘
//!    └── disable ──────┴──────────────────────────────────────────┘
//! ```

use std::time::Duration;

use chrono::Local;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use homewise_domain::device::Device;
use homewise_domain::id::UserId;
use homewise_domain::recommendation::{self, ActivationTracker, RoomStatus, Suggestion};
use homewise_domain::time::{Timestamp, now};

use crate::ports::{DeviceSnapshotSource, SuggestionSink};

/// Default period between two evaluations.
pub const DEFAULT_EVALUATION_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Default lifetime of the transient banner.
pub const DEFAULT_DISPLAY_DURATION: Duration = Duration::from_secs(6);

/// Engine-wide settings shared by every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub enabled: bool,
    pub evaluation_interval: Duration,
    pub display_duration: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            evaluation_interval: DEFAULT_EVALUATION_INTERVAL,
            display_duration: DEFAULT_DISPLAY_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Disabled,
    Idle,
    Suggesting,
}

/// Snapshot of a scheduler, published after every transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionState {
    pub state: EngineState,
    /// Result of the latest evaluation; kept after the banner hides.
    pub suggestion: Option<Suggestion>,
    pub banner_visible: bool,
    pub evaluated_at: Option<Timestamp>,
}

impl SuggestionState {
    fn initial(enabled: bool) -> Self {
        Self {
            state: if enabled {
                EngineState::Idle
            } else {
                EngineState::Disabled
            },
            suggestion: None,
            banner_visible: false,
            evaluated_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Command {
    SnapshotChanged,
    SetEnabled(bool),
    Shutdown,
}

/// Cloneable handle to a running scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<SuggestionState>,
}

impl SchedulerHandle {
    /// Ask for an immediate re-evaluation.
    pub fn notify_devices_changed(&self) {
        self.send(Command::SnapshotChanged);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.send(Command::SetEnabled(enabled));
    }

    /// Stop the worker. Hides a visible banner on the way out.
    pub fn shutdown(&self) {
        self.send(Command::Shutdown);
    }

    #[must_use]
    pub fn state(&self) -> SuggestionState {
        self.state.borrow().clone()
    }

    /// Watch every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.state.clone()
    }

    /// Whether both handles drive the same worker.
    #[must_use]
    pub fn same_worker(&self, other: &Self) -> bool {
        self.commands.same_channel(&other.commands)
    }

    /// Whether the worker task has exited.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::debug!(?command, "scheduler already stopped");
        }
    }
}

/// Spawn a scheduler for `user_id` on the current runtime.
///
/// When enabled, the first evaluation runs right away.
pub fn spawn<S, K>(
    user_id: UserId,
    source: S,
    sink: K,
    settings: EngineSettings,
) -> (SchedulerHandle, JoinHandle<()>)
where
    S: DeviceSnapshotSource + Send + Sync + 'static,
    K: SuggestionSink + Send + Sync + 'static,
{
    let (commands, receiver) = mpsc::unbounded_channel();
    let (publisher, state) = watch::channel(SuggestionState::initial(settings.enabled));
    let worker = Scheduler {
        user_id,
        source,
        sink,
        settings,
        tracker: ActivationTracker::new(),
        snapshot: Vec::new(),
        current: SuggestionState::initial(settings.enabled),
        display_deadline: None,
        publisher,
    };
    let task = tokio::spawn(worker.run(receiver));
    (SchedulerHandle { commands, state }, task)
}

/// Commands drained from the channel in one go.
#[derive(Debug, Default)]
struct Batch {
    snapshot_changed: bool,
    enabled: Option<bool>,
    shutdown: bool,
}

impl Batch {
    fn push(&mut self, command: Command) {
        match command {
            Command::SnapshotChanged => self.snapshot_changed = true,
            Command::SetEnabled(enabled) => self.enabled = Some(enabled),
            Command::Shutdown => self.shutdown = true,
        }
    }
}

struct Scheduler<S, K> {
    user_id: UserId,
    source: S,
    sink: K,
    settings: EngineSettings,
    tracker: ActivationTracker,
    snapshot: Vec<Device>,
    current: SuggestionState,
    display_deadline: Option<Instant>,
    publisher: watch::Sender<SuggestionState>,
}

impl<S, K> Scheduler<S, K>
where
    S: DeviceSnapshotSource + Send + Sync,
    K: SuggestionSink + Send + Sync,
{
    #[tracing::instrument(name = "suggestion_scheduler", skip_all, fields(user_id = %self.user_id))]
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        // The first tick completes immediately.
        let mut ticker = tokio::time::interval(self.settings.evaluation_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::debug!(enabled = self.settings.enabled, "scheduler started");
        loop {
            let enabled = self.settings.enabled;
            let deadline = self.display_deadline;
            tokio::select! {
                command = commands.recv() => {
                    let mut batch = Batch::default();
                    match command {
                        Some(command) => batch.push(command),
                        None => batch.shutdown = true,
                    }
                    while let Ok(command) = commands.try_recv() {
                        batch.push(command);
                    }
                    if batch.shutdown {
                        break;
                    }
                    if self.apply(batch).await {
                        ticker.reset();
                    }
                }
                _ = ticker.tick(), if enabled => {
                    self.evaluate().await;
                }
                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.expire_banner();
                }
            }
        }
        self.display_deadline = None;
        self.set_banner(false);
        self.publish();
        tracing::debug!("scheduler stopped");
    }

    /// Apply a batch of commands; returns whether an evaluation ran.
    async fn apply(&mut self, batch: Batch) -> bool {
        let mut evaluate = batch.snapshot_changed;
        match batch.enabled {
            Some(false) if self.settings.enabled => self.disable(),
            Some(true) if !self.settings.enabled => {
                self.settings.enabled = true;
                self.current.state = EngineState::Idle;
                evaluate = true;
            }
            _ => {}
        }
        if evaluate && self.settings.enabled {
            self.evaluate().await;
            return true;
        }
        false
    }

    async fn evaluate(&mut self) {
        match self.source.fetch_snapshot(self.user_id).await {
            Ok(snapshot) => self.snapshot = snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch device snapshot, keeping last known");
            }
        }

        let at = now();
        self.tracker.update(&self.snapshot, at);
        let rooms = RoomStatus::aggregate(&self.snapshot);
        let suggestion = recommendation::evaluate(
            &self.snapshot,
            &self.tracker,
            &rooms,
            &at.with_timezone(&Local),
        );

        self.sink.on_suggestion(self.user_id, suggestion.as_ref());
        self.current.evaluated_at = Some(at);
        match suggestion {
            Some(suggestion) => {
                tracing::debug!(suggestion = suggestion.kind(), "suggestion raised");
                self.current.suggestion = Some(suggestion);
                self.current.state = EngineState::Suggesting;
                self.display_deadline = Some(Instant::now() + self.settings.display_duration);
                self.set_banner(true);
            }
            None => {
                self.current.suggestion = None;
                self.current.state = EngineState::Idle;
                self.display_deadline = None;
                self.set_banner(false);
            }
        }
        self.publish();
    }

    fn expire_banner(&mut self) {
        self.display_deadline = None;
        if self.current.state == EngineState::Suggesting {
            self.current.state = EngineState::Idle;
        }
        self.set_banner(false);
        self.publish();
    }

    /// Cancel both timers, hide the banner and forget what was observed.
    fn disable(&mut self) {
        self.settings.enabled = false;
        self.display_deadline = None;
        self.tracker = ActivationTracker::new();
        self.set_banner(false);
        if self.current.suggestion.take().is_some() {
            self.sink.on_suggestion(self.user_id, None);
        }
        self.current.state = EngineState::Disabled;
        self.publish();
        tracing::debug!("scheduler disabled");
    }

    /// Notifies the sink only on an actual transition.
    fn set_banner(&mut self, visible: bool) {
        if self.current.banner_visible != visible {
            self.current.banner_visible = visible;
            self.sink.on_banner_visibility_change(self.user_id, visible);
        }
    }

    fn publish(&self) {
        self.publisher.send_replace(self.current.clone());
    }
}
