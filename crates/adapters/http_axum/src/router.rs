//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use homewise_app::ports::{ActivityLogRepository, DeviceRepository, EventPublisher, UserRepository};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Mounts the JSON API under `/api` and a plain-text `/health` check.
/// Includes a [`TraceLayer`] that logs each HTTP request/response at the
/// `DEBUG` level using the `tracing` ecosystem.
pub fn build<UR, DR, LR, EP>(state: AppState<UR, DR, LR, EP>) -> Router
where
    UR: UserRepository + Send + Sync + 'static,
    DR: DeviceRepository + Send + Sync + 'static,
    LR: ActivityLogRepository + Send + Sync + 'static,
    EP: EventPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stub_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use homewise_domain::id::UserId;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        serde_json::from_slice(&resp.into_body().collect().await.unwrap().to_bytes()).unwrap()
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = build(stub_state());

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn should_return_404_for_unknown_route() {
        let app = build(stub_state());

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_reject_malformed_id_with_bad_request() {
        let app = build(stub_state());

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/devices/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "invalid identifier: not-a-uuid");
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_user() {
        let app = build(stub_state());

        let resp = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/users/{}", UserId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn should_not_start_session_for_unknown_user() {
        let state = stub_state();
        let hub = std::sync::Arc::clone(&state.suggestions);
        let app = build(state);

        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/users/{}/suggestions/session", UserId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(hub.session_count(), 0);
    }

    #[tokio::test]
    async fn should_toggle_engine_through_settings_endpoint() {
        let state = stub_state();
        let app = build(state.clone());

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/settings/suggestions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["enabled"], true);
        assert_eq!(body["evaluation_interval_secs"], 300);
        assert_eq!(body["display_duration_secs"], 6);

        let resp = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/settings/suggestions")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"enabled":false}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["enabled"], false);
        assert!(!state.suggestions.settings().enabled);
    }

    #[tokio::test]
    async fn should_return_empty_admin_stats() {
        let app = build(stub_state());

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/admin/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["user_count"], 0);
        assert_eq!(body["average_devices_per_user"], 0.0);
    }
}
