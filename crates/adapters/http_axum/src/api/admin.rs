//! Read-only admin overview across every user.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use homewise_app::ports::{ActivityLogRepository, DeviceRepository, EventPublisher, UserRepository};
use homewise_domain::activity_log::ActivityLog;
use homewise_domain::device::Device;
use homewise_domain::stats::FleetStats;
use homewise_domain::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the admin endpoints.
pub enum AdminResponse {
    Users(Json<Vec<User>>),
    Devices(Json<Vec<Device>>),
    Stats(Json<FleetStats>),
    Logs(Json<Vec<ActivityLog>>),
}

impl IntoResponse for AdminResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Users(json) => json.into_response(),
            Self::Devices(json) => json.into_response(),
            Self::Stats(json) => json.into_response(),
            Self::Logs(json) => json.into_response(),
        }
    }
}

/// `GET /api/admin/users`
pub async fn users<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
) -> Result<AdminResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let users = state.user_service.list_users().await?;
    Ok(AdminResponse::Users(Json(users)))
}

/// `GET /api/admin/devices`
pub async fn devices<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
) -> Result<AdminResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let devices = state.device_service.list_all_devices().await?;
    Ok(AdminResponse::Devices(Json(devices)))
}

/// `GET /api/admin/stats`
pub async fn stats<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
) -> Result<AdminResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let stats = state.admin_service.stats().await?;
    Ok(AdminResponse::Stats(Json(stats)))
}

/// `GET /api/admin/logs`
pub async fn logs<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
) -> Result<AdminResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let logs = state.admin_service.recent_logs().await?;
    Ok(AdminResponse::Logs(Json(logs)))
}
