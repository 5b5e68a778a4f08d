//! Shared application state for axum handlers.

use std::sync::Arc;

use homewise_app::ports::{ActivityLogRepository, DeviceRepository, EventPublisher, UserRepository};
use homewise_app::services::admin_service::AdminService;
use homewise_app::services::device_service::DeviceService;
use homewise_app::services::user_service::UserService;
use homewise_app::suggestion::{BroadcastSuggestionSink, SuggestionHub};

/// Suggestion hub reading snapshots straight from the device service.
pub type Hub<UR, DR, LR, EP> =
    SuggestionHub<Arc<DeviceService<DR, UR, LR, EP>>, BroadcastSuggestionSink>;

/// Application state shared across all axum handlers.
///
/// Generic over the repository types and the event publisher to avoid
/// dynamic dispatch. `Clone` is implemented manually so only the `Arc`
/// wrappers are cloned.
pub struct AppState<UR, DR, LR, EP> {
    pub user_service: Arc<UserService<UR>>,
    pub device_service: Arc<DeviceService<DR, UR, LR, EP>>,
    pub admin_service: Arc<AdminService<UR, DR, LR>>,
    /// Per-user suggestion schedulers.
    pub suggestions: Arc<Hub<UR, DR, LR, EP>>,
    /// Fan-out of scheduler output, consumed by the SSE endpoint.
    pub suggestion_updates: BroadcastSuggestionSink,
}

impl<UR, DR, LR, EP> Clone for AppState<UR, DR, LR, EP> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            device_service: Arc::clone(&self.device_service),
            admin_service: Arc::clone(&self.admin_service),
            suggestions: Arc::clone(&self.suggestions),
            suggestion_updates: self.suggestion_updates.clone(),
        }
    }
}

impl<UR, DR, LR, EP> AppState<UR, DR, LR, EP>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    /// Create the state from pre-wrapped `Arc` services.
    ///
    /// The hub is shared with the background task that follows the event
    /// bus, so it is built by the caller.
    pub fn from_arcs(
        user_service: Arc<UserService<UR>>,
        device_service: Arc<DeviceService<DR, UR, LR, EP>>,
        admin_service: Arc<AdminService<UR, DR, LR>>,
        suggestions: Arc<Hub<UR, DR, LR, EP>>,
        suggestion_updates: BroadcastSuggestionSink,
    ) -> Self {
        Self {
            user_service,
            device_service,
            admin_service,
            suggestions,
            suggestion_updates,
        }
    }
}
