//! Suggestion engine settings.

use axum::Json;
use axum::extract::State;

use serde::{Deserialize, Serialize};

use homewise_app::ports::{ActivityLogRepository, DeviceRepository, EventPublisher, UserRepository};
use homewise_app::suggestion::EngineSettings;

use crate::state::AppState;

/// Engine settings as exposed over HTTP.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionSettings {
    pub enabled: bool,
    pub evaluation_interval_secs: u64,
    pub display_duration_secs: u64,
}

impl From<EngineSettings> for SuggestionSettings {
    fn from(settings: EngineSettings) -> Self {
        Self {
            enabled: settings.enabled,
            evaluation_interval_secs: settings.evaluation_interval.as_secs(),
            display_duration_secs: settings.display_duration.as_secs(),
        }
    }
}

/// Request body for the settings update. Only the enabled flag is mutable.
#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub enabled: bool,
}

/// `GET /api/settings/suggestions`
pub async fn get<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
) -> Json<SuggestionSettings>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    Json(state.suggestions.settings().into())
}

/// `PUT /api/settings/suggestions`
pub async fn update<UR, DR, LR, EP>(
    State(state): State<AppState<UR, DR, LR, EP>>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Json<SuggestionSettings>
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    state.suggestions.set_enabled(req.enabled);
    Json(state.suggestions.settings().into())
}
