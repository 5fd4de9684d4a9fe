//! Test harness that serves the real router on an ephemeral port.
//!
//! Each harness gets its own in-memory stores, so tests never share state.
//! Postgres-backed tests use [`SharedTestInfra`] instead.

use anyhow::{Context, Result};
use cms_client::CmsClient;
use cms_core::domains::auth::JwtService;
use cms_core::kernel::ServerDeps;
use cms_core::server::{build_app, AppOptions};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub const TEST_SECRET: &str = "test_secret";
pub const TEST_ISSUER: &str = "test_issuer";

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TestHarness {
    pub base_url: String,
    pub deps: Arc<ServerDeps>,
    pub http: reqwest::Client,
    admin_token: String,
    server: JoinHandle<()>,
}

impl TestHarness {
    /// Harness with write protection on and in-memory stores.
    pub async fn new() -> Result<Self> {
        Self::with_options(AppOptions::default()).await
    }

    pub async fn with_options(options: AppOptions) -> Result<Self> {
        let jwt = Arc::new(JwtService::new(TEST_SECRET, TEST_ISSUER.to_string()));
        Self::with_deps(Arc::new(ServerDeps::in_memory(jwt)), options).await
    }

    pub async fn with_deps(deps: Arc<ServerDeps>, options: AppOptions) -> Result<Self> {
        init_tracing();

        let app = build_app(deps.clone(), options)?;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind test listener")?;
        let addr = listener.local_addr()?;

        let server = tokio::spawn(async move {
            let _ = axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await;
        });

        let admin_token = deps
            .jwt_service
            .create_token("admin@institute.test", true, chrono::Duration::hours(1))?;

        Ok(Self {
            base_url: format!("http://{addr}"),
            deps,
            http: reqwest::Client::new(),
            admin_token,
            server,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn admin_token(&self) -> &str {
        &self.admin_token
    }

    /// Client authenticated as an admin.
    pub fn client(&self) -> CmsClient {
        CmsClient::new(&self.base_url).with_token(&self.admin_token)
    }

    async fn finish(request: reqwest::RequestBuilder) -> (u16, Value) {
        let resp = request.send().await.expect("request failed");
        let status = resp.status().as_u16();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    /// Anonymous GET.
    pub async fn get(&self, path: &str) -> (u16, Value) {
        Self::finish(self.http.get(self.url(path))).await
    }

    /// Admin POST with a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        Self::finish(
            self.http
                .post(self.url(path))
                .bearer_auth(&self.admin_token)
                .json(body),
        )
        .await
    }

    /// Admin PUT with a JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> (u16, Value) {
        Self::finish(
            self.http
                .put(self.url(path))
                .bearer_auth(&self.admin_token)
                .json(body),
        )
        .await
    }

    /// Admin DELETE.
    pub async fn delete(&self, path: &str) -> (u16, Value) {
        Self::finish(self.http.delete(self.url(path)).bearer_auth(&self.admin_token)).await
    }

    /// Create an item and return its id, failing the test on any error.
    pub async fn create(&self, resource: &str, body: &Value) -> String {
        let (status, resp) = self.post(&format!("/api/{resource}"), body).await;
        assert_eq!(status, 201, "create {resource} failed: {resp}");
        resp["data"]["id"]
            .as_str()
            .expect("created item has an id")
            .to_string()
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        self.server.abort();
    }
}
