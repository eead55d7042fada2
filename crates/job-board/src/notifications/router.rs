use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::NotificationRequest;
use super::service::NotificationService;

/// Router exposing the JSON notification endpoint.
pub fn notification_router(service: Arc<NotificationService>) -> Router {
    Router::new()
        .route("/api/notifications", post(create_handler))
        .with_state(service)
}

pub(crate) async fn create_handler(
    State(service): State<Arc<NotificationService>>,
    payload: Result<Json<NotificationRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let payload = json!({ "error": rejection.body_text() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.create(request).await {
        Ok(notification_id) => {
            let payload = json!({
                "success": true,
                "notification_id": notification_id,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) if err.is_client_error() => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(err) => {
            error!(error = %err, "create_notification procedure failed");
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{InMemoryBackend, RepositoryError};
    use crate::notifications::domain::{NewNotification, NotificationId};
    use crate::notifications::procedure::NotificationProcedure;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    struct OfflineProcedure;

    #[async_trait]
    impl NotificationProcedure for OfflineProcedure {
        async fn create_notification(
            &self,
            _notification: &NewNotification,
        ) -> Result<NotificationId, RepositoryError> {
            Err(RepositoryError::Unavailable(
                "permission denied for function create_notification".to_string(),
            ))
        }
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::post("/api/notifications")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn router_with(backend: Arc<InMemoryBackend>) -> Router {
        notification_router(Arc::new(NotificationService::new(backend)))
    }

    #[tokio::test]
    async fn creates_notification_and_returns_id() {
        let backend = Arc::new(InMemoryBackend::default());
        let response = router_with(backend.clone())
            .oneshot(post_json(
                r#"{"user_id":"u1","title":"Hi","message":"m","type":"success"}"#,
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["success"], Value::Bool(true));
        let id = payload["notification_id"].as_str().expect("id string");
        assert!(!id.is_empty());

        let sent = backend.notifications().expect("readable");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.title, "Hi");
    }

    #[tokio::test]
    async fn missing_user_id_is_a_bad_request_and_skips_the_procedure() {
        let backend = Arc::new(InMemoryBackend::default());
        let response = router_with(backend.clone())
            .oneshot(post_json(r#"{"title":"Hi","message":"m"}"#))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert!(payload["error"]
            .as_str()
            .unwrap_or_default()
            .contains("user_id"));
        assert!(backend.notifications().expect("readable").is_empty());
    }

    #[tokio::test]
    async fn invalid_type_is_a_bad_request() {
        let backend = Arc::new(InMemoryBackend::default());
        let response = router_with(backend.clone())
            .oneshot(post_json(
                r#"{"user_id":"u1","title":"Hi","message":"m","type":"critical"}"#,
            ))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(backend.notifications().expect("readable").is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let backend = Arc::new(InMemoryBackend::default());
        let response = router_with(backend)
            .oneshot(post_json("{not json"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn procedure_failure_surfaces_upstream_message() {
        let router = notification_router(Arc::new(NotificationService::new(Arc::new(
            OfflineProcedure,
        ))));
        let response = router
            .oneshot(post_json(r#"{"user_id":"u1","title":"Hi","message":"m"}"#))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let payload = read_json_body(response).await;
        assert!(payload["error"]
            .as_str()
            .unwrap_or_default()
            .contains("permission denied"));
    }
}
