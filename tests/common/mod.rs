use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use stocktrack_api::{config::AppConfig, db, handlers::AppServices, AppState};

/// Helper harness for spinning up an application state backed by a
/// throwaway SQLite database.
pub struct TestApp {
    router: Router,
    pub state: Arc<AppState>,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = db_dir.path().join("stocktrack_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        // A single connection keeps SQLite writers serialized; the engine's
        // row lock carries the contract on Postgres.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let services = AppServices::new(db_arc.clone());
        let state = Arc::new(AppState {
            db: db_arc,
            config: cfg,
            services,
        });

        let router = Router::new()
            .nest("/health", stocktrack_api::handlers::health::health_routes())
            .nest("/api", stocktrack_api::api_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _db_dir: db_dir,
        }
    }

    /// Send a JSON request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Create a product over the API and return its id.
    #[allow(dead_code)]
    pub async fn seed_product(&self, sku: &str, name: &str) -> i32 {
        let response = self
            .request(
                Method::POST,
                "/api/products",
                Some(serde_json::json!({ "sku": sku, "name": name, "unit_price": 1.0 })),
            )
            .await;
        assert_eq!(response.status(), 201, "seed product {sku}");
        let body = response_json(response).await;
        body["id"].as_i64().expect("seeded product id") as i32
    }
}

#[allow(dead_code)]
pub async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
