//! In-memory application fixture
//!
//! Builds the full router over `MemoryStore` without the heartbeat task and
//! wraps it in an `axum-test` server. The `AppState` stays reachable so tests
//! can seed records, drive heartbeat sweeps and observe live connections.

use axum_test::TestServer;
use serde_json::{json, Map, Value};

use schoolhub::backend::auth::users::hash_password;
use schoolhub::backend::server::{build_app, memory_state, AppState, ServerConfig};
use schoolhub::backend::store::{Collection, Record};
use schoolhub::shared::{Participant, Role};

/// Secret the test application signs tokens with
pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..ServerConfig::default()
    }
}

/// Application under test
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let state = memory_state(config);
        let server = TestServer::new(build_app(state.clone())).expect("Failed to start test server");
        Self { server, state }
    }

    /// Served over a real TCP listener, as WebSocket upgrades require
    pub fn over_http() -> Self {
        let state = memory_state(test_config());
        let server = TestServer::builder()
            .http_transport()
            .build(build_app(state.clone()))
            .expect("Failed to start test server");
        Self { server, state }
    }

    /// Insert a record bypassing validation
    pub async fn seed(&self, collection: Collection, body: Value) -> Record {
        let body = match body {
            Value::Object(map) => map,
            other => panic!("seed body must be an object, got {}", other),
        };
        self.state
            .records
            .insert(collection, body)
            .await
            .expect("Failed to seed record")
    }

    /// A student without a usable password
    pub async fn student(&self, name: &str) -> Participant {
        self.user(Role::Student, name, None).await
    }

    /// A teacher without a usable password
    pub async fn teacher(&self, name: &str) -> Participant {
        self.user(Role::Teacher, name, None).await
    }

    /// A user whose password is bcrypt-hashed like a created account
    pub async fn user_with_password(&self, role: Role, name: &str, password: &str) -> Participant {
        self.user(role, name, Some(password)).await
    }

    async fn user(&self, role: Role, name: &str, password: Option<&str>) -> Participant {
        let mut body = Map::new();
        body.insert("name".into(), json!(name));
        body.insert("email".into(), json!(email_for(name)));
        if let Some(password) = password {
            let hash = hash_password(password).expect("Failed to hash password");
            body.insert("password".into(), json!(hash));
        }
        let collection = match role {
            Role::Student => Collection::Students,
            Role::Teacher => Collection::Teachers,
        };
        let record = self.seed(collection, Value::Object(body)).await;
        Participant::new(record.id, name, role)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic email for a seeded user name
pub fn email_for(name: &str) -> String {
    format!("{}@school.test", name.to_lowercase())
}
