//! Session registry: one scheduler per user who is looking at their devices.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use homewise_domain::event::DeviceEvent;
use homewise_domain::id::UserId;

use super::scheduler::{self, EngineSettings, SchedulerHandle, SuggestionState};
use crate::ports::{DeviceSnapshotSource, SuggestionSink};

/// How long a session without an open stream survives without a request.
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(15 * 60);

struct Session {
    handle: SchedulerHandle,
    task: JoinHandle<()>,
    /// Live [`SessionLease`]s on this worker.
    leases: usize,
    last_active: Instant,
}

/// Owns the per-user schedulers and the engine-wide settings.
///
/// Lock order is sessions then settings.
pub struct SuggestionHub<S, K> {
    source: S,
    sink: K,
    settings: Mutex<EngineSettings>,
    sessions: Mutex<HashMap<UserId, Session>>,
}

/// Keeps a user's session running while held. Dropping the last lease of a
/// session ends it.
pub struct SessionLease<S, K> {
    hub: Arc<SuggestionHub<S, K>>,
    user_id: UserId,
    handle: SchedulerHandle,
}

impl<S, K> SessionLease<S, K> {
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn handle(&self) -> &SchedulerHandle {
        &self.handle
    }
}

impl<S, K> Drop for SessionLease<S, K> {
    fn drop(&mut self) {
        self.hub.release(self.user_id, &self.handle);
    }
}

impl<S, K> SuggestionHub<S, K>
where
    S: DeviceSnapshotSource + Clone + Send + Sync + 'static,
    K: SuggestionSink + Clone + Send + Sync + 'static,
{
    pub fn new(source: S, sink: K, settings: EngineSettings) -> Self {
        Self {
            source,
            sink,
            settings: Mutex::new(settings),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start a scheduler for `user_id`, or return the running one.
    pub fn start_session(&self, user_id: UserId) -> SchedulerHandle {
        let mut sessions = self.lock_sessions();
        self.touch(&mut sessions, user_id).handle.clone()
    }

    /// Start or join the session of `user_id` for as long as the lease lives.
    pub fn attach(self: &Arc<Self>, user_id: UserId) -> SessionLease<S, K> {
        let mut sessions = self.lock_sessions();
        let session = self.touch(&mut sessions, user_id);
        session.leases += 1;
        SessionLease {
            hub: Arc::clone(self),
            user_id,
            handle: session.handle.clone(),
        }
    }

    fn touch<'a>(
        &self,
        sessions: &'a mut HashMap<UserId, Session>,
        user_id: UserId,
    ) -> &'a mut Session {
        if sessions
            .get(&user_id)
            .is_some_and(|session| session.handle.is_closed())
        {
            sessions.remove(&user_id);
        }
        let session = sessions.entry(user_id).or_insert_with(|| {
            // read under the sessions lock so a concurrent set_enabled either
            // sees this session or is seen by it
            let settings = *self.lock_settings();
            let (handle, task) =
                scheduler::spawn(user_id, self.source.clone(), self.sink.clone(), settings);
            tracing::info!(%user_id, "suggestion session started");
            Session {
                handle,
                task,
                leases: 0,
                last_active: Instant::now(),
            }
        });
        session.last_active = Instant::now();
        session
    }

    /// Stop the scheduler of `user_id`. Returns whether one was running.
    pub fn end_session(&self, user_id: UserId) -> bool {
        let Some(session) = self.lock_sessions().remove(&user_id) else {
            return false;
        };
        session.handle.shutdown();
        tracing::info!(%user_id, "suggestion session ended");
        true
    }

    /// End the sessions that hold no lease and saw no request for
    /// `idle_timeout`. Returns how many were ended.
    pub fn end_idle_sessions(&self, idle_timeout: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.lock_sessions();
        let idle: Vec<UserId> = sessions
            .iter()
            .filter(|(_, session)| {
                session.leases == 0 && now.duration_since(session.last_active) >= idle_timeout
            })
            .map(|(user_id, _)| *user_id)
            .collect();
        for user_id in &idle {
            if let Some(session) = sessions.remove(user_id) {
                session.handle.shutdown();
                tracing::info!(%user_id, "idle suggestion session ended");
            }
        }
        idle.len()
    }

    /// Periodically end idle sessions until the task is aborted.
    pub fn expire_idle(self: &Arc<Self>, idle_timeout: Duration) -> JoinHandle<()> {
        let hub = Arc::clone(self);
        let period = (idle_timeout / 4).max(Duration::from_millis(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let ended = hub.end_idle_sessions(idle_timeout);
                if ended > 0 {
                    tracing::debug!(ended, "expired idle suggestion sessions");
                }
            }
        })
    }

    /// Trigger an immediate re-evaluation. No-op without a session.
    pub fn notify_devices_changed(&self, user_id: UserId) {
        if let Some(session) = self.lock_sessions().get(&user_id) {
            session.handle.notify_devices_changed();
        }
    }

    /// Enable or disable the engine for every current and future session.
    pub fn set_enabled(&self, enabled: bool) {
        let sessions = self.lock_sessions();
        self.lock_settings().enabled = enabled;
        for session in sessions.values() {
            session.handle.set_enabled(enabled);
        }
        drop(sessions);
        tracing::info!(enabled, "suggestion engine toggled");
    }

    #[must_use]
    pub fn settings(&self) -> EngineSettings {
        *self.lock_settings()
    }

    /// Current state of `user_id`'s scheduler, if a session is running.
    #[must_use]
    pub fn state(&self, user_id: UserId) -> Option<SuggestionState> {
        self.lock_sessions()
            .get(&user_id)
            .map(|session| session.handle.state())
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.lock_sessions().len()
    }

    /// Stop every scheduler and wait for the workers to exit.
    pub async fn shutdown(&self) {
        let sessions: Vec<Session> = self.lock_sessions().drain().map(|(_, s)| s).collect();
        for session in &sessions {
            session.handle.shutdown();
        }
        for session in sessions {
            if let Err(err) = session.task.await {
                tracing::warn!(error = %err, "suggestion scheduler did not stop cleanly");
            }
        }
        tracing::debug!("suggestion hub stopped");
    }

    /// Translate device events into re-evaluations until the bus closes.
    pub fn follow(self: &Arc<Self>, mut events: broadcast::Receiver<DeviceEvent>) -> JoinHandle<()> {
        let hub = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => hub.notify_devices_changed(event.user_id),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "device events lagged, refreshing every session");
                        for session in hub.lock_sessions().values() {
                            session.handle.notify_devices_changed();
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl<S, K> SuggestionHub<S, K> {
    fn release(&self, user_id: UserId, handle: &SchedulerHandle) {
        let mut sessions = self.lock_sessions();
        let Some(session) = sessions.get_mut(&user_id) else {
            return;
        };
        // the session was restarted since this lease was taken
        if !session.handle.same_worker(handle) {
            return;
        }
        session.leases = session.leases.saturating_sub(1);
        if session.leases > 0 {
            return;
        }
        if let Some(session) = sessions.remove(&user_id) {
            session.handle.shutdown();
            tracing::info!(%user_id, "last suggestion stream closed, session ended");
        }
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<UserId, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_settings(&self) -> MutexGuard<'_, EngineSettings> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
