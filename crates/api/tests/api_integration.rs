//! Integration tests for the API server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use common::{Context, ContextError};
use service::{HealthService, ServiceError};
use storage::{InMemoryHealthStorage, StorageError};
use tower::ServiceExt;

/// Health service whose outcome is fixed at construction.
struct MockHealthService {
    fail_with: Option<fn() -> ServiceError>,
    calls: AtomicUsize,
    observed_deadline: std::sync::Mutex<Option<tokio::time::Instant>>,
}

impl MockHealthService {
    fn succeeding() -> Self {
        Self {
            fail_with: None,
            calls: AtomicUsize::new(0),
            observed_deadline: std::sync::Mutex::new(None),
        }
    }

    fn failing(err: fn() -> ServiceError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::succeeding()
        }
    }
}

#[async_trait]
impl HealthService for MockHealthService {
    async fn handle_health(&self, ctx: &Context) -> service::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.observed_deadline.lock().unwrap() = ctx.deadline();
        match self.fail_with {
            Some(err) => Err(err()),
            None => Ok(()),
        }
    }
}

fn setup(service: Arc<MockHealthService>) -> axum::Router {
    api::create_app(Arc::new(api::AppState::new(service)))
}

async fn get_health(app: axum::Router) -> Response {
    app.oneshot(
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_health_success() {
    let service = Arc::new(MockHealthService::succeeding());
    let response = get_health(setup(service.clone())).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/json");

    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({ "status": "success" }));
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_health_service_error() {
    let service = Arc::new(MockHealthService::failing(|| {
        ServiceError::Storage(StorageError::Context(ContextError::DeadlineExceeded))
    }));
    let response = get_health(setup(service)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type(&response), "application/json");

    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({ "status": "error", "error": "failed to record health check" })
    );
}

#[tokio::test]
async fn test_health_any_storage_error_is_500() {
    let errors: [fn() -> ServiceError; 3] = [
        || ServiceError::Storage(StorageError::Unavailable("down".to_string())),
        || ServiceError::Storage(StorageError::Context(ContextError::Cancelled)),
        || ServiceError::Storage(StorageError::Context(ContextError::DeadlineExceeded)),
    ];

    for err in errors {
        let response = get_health(setup(Arc::new(MockHealthService::failing(err)))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type(&response), "application/json");
        assert_eq!(body_json(response).await["status"], "error");
    }
}

#[tokio::test]
async fn test_health_applies_three_second_timeout() {
    let service = Arc::new(MockHealthService::succeeding());
    let before = tokio::time::Instant::now();
    let response = get_health(setup(service.clone())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let deadline = service.observed_deadline.lock().unwrap().unwrap();
    let budget = deadline - before;
    assert!(budget >= Duration::from_secs(3));
    assert!(budget < Duration::from_secs(4));
}

#[tokio::test]
async fn test_health_records_through_default_service() {
    let storage = InMemoryHealthStorage::new();
    let app = api::create_app(Arc::new(api::AppState::with_storage(storage.clone())));

    let response = get_health(app.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_health(app).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(storage.call_count(), 2);
}

#[tokio::test]
async fn test_health_storage_failure_through_default_service() {
    let storage = InMemoryHealthStorage::new();
    storage.set_fail_on_save(true);
    let app = api::create_app(Arc::new(api::AppState::with_storage(storage.clone())));

    let response = get_health(app).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["status"], "error");
    assert_eq!(storage.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup(Arc::new(MockHealthService::succeeding()));
    let response = app
        .oneshot(Request::builder().uri("/orders").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_rejects_post() {
    let app = setup(Arc::new(MockHealthService::succeeding()));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
