//! JSON REST handlers for users and their device fleets.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use homewise_app::ports::{ActivityLogRepository, DeviceRepository, EventPublisher, UserRepository};
use homewise_domain::activity_log::ActivityLog;
use homewise_domain::device::Device;
use homewise_domain::id::{UserId, parse};
use homewise_domain::user::{Role, User};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a user.
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Body returned after clearing a user's devices.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearedDevices {
    pub removed: u64,
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<User>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<User>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<User>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the device listing endpoint.
pub enum DevicesResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for DevicesResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the clear endpoint.
pub enum ClearResponse {
    Ok(Json<ClearedDevices>),
}

impl IntoResponse for ClearResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the activity log endpoint.
pub enum LogsResponse {
    Ok(Json<Vec<ActivityLog>>),
}

impl IntoResponse for LogsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/users`
pub async fn create<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<CreateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let user = state.user_service.register_user(&req.email, req.role).await?;
    Ok(CreateResponse::Created(Json(user)))
}

/// `GET /api/users`
pub async fn list<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
) -> Result<ListResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let users = state.user_service.list_users().await?;
    Ok(ListResponse::Ok(Json(users)))
}

/// `GET /api/users/:id`
pub async fn get<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let user_id: UserId = parse(&id)?;
    let user = state.user_service.get_user(user_id).await?;
    Ok(GetResponse::Ok(Json(user)))
}

/// `GET /api/users/:id/devices`
pub async fn devices<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Path(id): Path<String>,
) -> Result<DevicesResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let user_id: UserId = parse(&id)?;
    let devices = state.device_service.list_user_devices(user_id).await?;
    Ok(DevicesResponse::Ok(Json(devices)))
}

/// `DELETE /api/users/:id/devices`
pub async fn clear_devices<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Path(id): Path<String>,
) -> Result<ClearResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let user_id: UserId = parse(&id)?;
    let removed = state.device_service.clear_user_devices(user_id).await?;
    Ok(ClearResponse::Ok(Json(ClearedDevices { removed })))
}

/// `GET /api/users/:id/logs`
pub async fn logs<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Path(id): Path<String>,
) -> Result<LogsResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let user_id: UserId = parse(&id)?;
    state.user_service.get_user(user_id).await?;
    let logs = state.admin_service.user_logs(user_id).await?;
    Ok(LogsResponse::Ok(Json(logs)))
}
