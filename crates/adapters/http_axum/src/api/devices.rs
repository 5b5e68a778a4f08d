//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use homewise_app::ports::{ActivityLogRepository, DeviceRepository, EventPublisher, UserRepository};
use homewise_domain::device::{ConnectionType, Device, DeviceSettings, PowerState};
use homewise_domain::id::{DeviceId, UserId, parse};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for adding a device.
#[derive(Deserialize)]
pub struct CreateDeviceRequest {
    pub user_id: String,
    pub name: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub room: Option<String>,
    pub status: Option<PowerState>,
    pub temperature: Option<f64>,
    pub speed: Option<u8>,
    pub connection_type: Option<ConnectionType>,
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Device>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Device>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the toggle and settings endpoints.
pub enum UpdateResponse {
    Ok(Json<Device>),
}

impl IntoResponse for UpdateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `POST /api/devices`
pub async fn create<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Json(req): Json<CreateDeviceRequest>,
) -> Result<CreateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let user_id: UserId = parse(&req.user_id)?;

    let mut builder = Device::builder()
        .user_id(user_id)
        .name(req.name)
        .brand(req.brand)
        .kind(req.kind);
    if let Some(room) = req.room {
        builder = builder.room(room);
    }
    if let Some(status) = req.status {
        builder = builder.status(status);
    }
    if let Some(temperature) = req.temperature {
        builder = builder.temperature(temperature);
    }
    if let Some(speed) = req.speed {
        builder = builder.speed(speed);
    }
    if let Some(connection_type) = req.connection_type {
        builder = builder.connection_type(connection_type);
    }

    let device = builder.build()?;
    let created = state.device_service.add_device(device).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `GET /api/devices/:id`
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
    let device_id: DeviceId = parse(&id)?;
    let device = state.device_service.get_device(device_id).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `PATCH /api/devices/:id` flips the power state.
pub async fn toggle<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Path(id): Path<String>,
) -> Result<UpdateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let device_id: DeviceId = parse(&id)?;
    let device = state.device_service.toggle_device(device_id).await?;
    Ok(UpdateResponse::Ok(Json(device)))
}

/// `PATCH /api/devices/:id/custom`
pub async fn update_settings<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Path(id): Path<String>,
    Json(settings): Json<DeviceSettings>,
) -> Result<UpdateResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let device_id: DeviceId = parse(&id)?;
    let device = state
        .device_service
        .update_device_settings(device_id, settings)
        .await?;
    Ok(UpdateResponse::Ok(Json(device)))
}

/// `DELETE /api/devices/:id`
pub async fn delete<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    let device_id: DeviceId = parse(&id)?;
    state.device_service.delete_device(device_id).await?;
    Ok(DeleteResponse::NoContent)
}
