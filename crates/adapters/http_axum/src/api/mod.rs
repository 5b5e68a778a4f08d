//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod admin;
#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod settings;
#[allow(clippy::missing_errors_doc)]
pub mod suggestions;
#[allow(clippy::missing_errors_doc)]
pub mod users;

use axum::Router;
use axum::routing::{get, patch, post};

use homewise_app::ports::{ActivityLogRepository, DeviceRepository, EventPublisher, UserRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<UR, DR, LR, EP>() -> Router<AppState<UR, DR, LR, EP>>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        // Users
        .route(
            "/users",
            get(users::list::<UR, DR, LR, EP>).post(users::create::<UR, DR, LR, EP>),
        )
        .route("/users/{id}", get(users::get::<UR, DR, LR, EP>))
        .route(
            "/users/{id}/devices",
            get(users::devices::<UR, DR, LR, EP>).delete(users::clear_devices::<UR, DR, LR, EP>),
        )
        .route("/users/{id}/logs", get(users::logs::<UR, DR, LR, EP>))
        // Suggestions
        .route(
            "/users/{id}/suggestions",
            get(suggestions::state::<UR, DR, LR, EP>),
        )
        .route(
            "/users/{id}/suggestions/session",
            post(suggestions::start_session::<UR, DR, LR, EP>)
                .delete(suggestions::end_session::<UR, DR, LR, EP>),
        )
        .route(
            "/users/{id}/suggestions/stream",
            get(suggestions::stream::<UR, DR, LR, EP>),
        )
        // Devices
        .route("/devices", post(devices::create::<UR, DR, LR, EP>))
        .route(
            "/devices/{id}",
            get(devices::get::<UR, DR, LR, EP>)
                .patch(devices::toggle::<UR, DR, LR, EP>)
                .delete(devices::delete::<UR, DR, LR, EP>),
        )
        .route(
            "/devices/{id}/custom",
            patch(devices::update_settings::<UR, DR, LR, EP>),
        )
        // Admin
        .route("/admin/users", get(admin::users::<UR, DR, LR, EP>))
        .route("/admin/devices", get(admin::devices::<UR, DR, LR, EP>))
        .route("/admin/stats", get(admin::stats::<UR, DR, LR, EP>))
        .route("/admin/logs", get(admin::logs::<UR, DR, LR, EP>))
        // Settings
        .route(
            "/settings/suggestions",
            get(settings::get::<UR, DR, LR, EP>).put(settings::update::<UR, DR, LR, EP>),
        )
}
