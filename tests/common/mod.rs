#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use chrono::{TimeZone, Utc};
use tokio::net::TcpListener;

use setlog::db::{create_memory_pool, DbPool};
use setlog::migrations::run_migrations_for_tests;
use setlog::models::{NewSet, Set};
use setlog::repositories::SetRepository;
use setlog::{ApiClient, ClientConfig};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    setlog::routes::app(pool)
}

/// One request as seen by a test backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub accept: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<serde_json::Value>,
}

pub type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

/// A router served on a real local port, with every request recorded.
pub struct TestBackend {
    pub base_url: String,
    pub requests: RequestLog,
}

impl TestBackend {
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&ClientConfig::new(self.base_url.clone())).unwrap()
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> ApiClient {
        ApiClient::new(&ClientConfig::new(self.base_url.clone()).with_timeout(timeout)).unwrap()
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(log: RequestLog, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let header_str = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    log.lock().unwrap().push(RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        accept: header_str(header::ACCEPT),
        content_type: header_str(header::CONTENT_TYPE),
        body: serde_json::from_slice(&bytes).ok(),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

pub async fn spawn_backend(router: Router) -> TestBackend {
    let requests: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let log = requests.clone();
    let router = router.layer(middleware::from_fn(move |request: Request, next: Next| {
        record(log.clone(), request, next)
    }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestBackend {
        base_url: format!("http://{}", addr),
        requests,
    }
}

/// The real API over a fresh in-memory database.
pub async fn spawn_api_backend() -> (TestBackend, DbPool) {
    let pool = setup_test_db();
    let backend = spawn_backend(create_test_app(pool.clone())).await;
    (backend, pool)
}

/// A backend that answers every request with `status` and `body`.
pub async fn spawn_canned_backend(status: StatusCode, body: &'static str) -> TestBackend {
    let router = Router::new().fallback(move || async move {
        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    });
    spawn_backend(router).await
}

/// A backend that waits `delay` before answering `[]`.
pub async fn spawn_slow_backend(delay: Duration) -> TestBackend {
    let router = Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        "[]"
    });
    spawn_backend(router).await
}

/// A base URL nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// Test data creation helpers
pub fn new_set(exercise_id: i64, weight: f64, repetitions: u32) -> NewSet {
    NewSet::new(
        exercise_id,
        1,
        weight,
        repetitions,
        Utc.with_ymd_and_hms(2024, 3, 7, 18, 30, 0).unwrap(),
    )
}

pub async fn create_test_set(pool: &DbPool, exercise_id: i64, weight: f64, repetitions: u32) -> Set {
    let set_repo = SetRepository::new(pool.clone());
    set_repo
        .create(new_set(exercise_id, weight, repetitions))
        .await
        .unwrap()
}
