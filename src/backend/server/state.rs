/**
 * Application State Management
 *
 * This module defines the application state structure and implements the
 * `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central container shared by all handlers:
 * - `records` - document collections (students, teachers, classrooms, ...)
 * - `messaging` - the messaging service (threads, message log, directory)
 * - `connections` - the live WebSocket connection registry
 * - `config` - the loaded server configuration
 *
 * Every field is cheap to clone (`Arc` inside), so `AppState` is cloned per
 * request by Axum.
 *
 * # Example
 *
 * ```rust,no_run
 * use schoolhub::backend::messaging::MessagingService;
 * use axum::extract::State;
 *
 * async fn handler(State(messaging): State<MessagingService>) {
 *     let _threads = messaging.list_threads("a1b2").await;
 * }
 * ```
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::liveness::ConnectionRegistry;
use crate::backend::messaging::MessagingService;
use crate::backend::server::config::ServerConfig;
use crate::backend::store::{MessageStore, RecordStore};

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub messaging: MessagingService,
    pub connections: ConnectionRegistry,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire the services over the given stores
    pub fn new(
        records: Arc<dyn RecordStore>,
        messages: Arc<dyn MessageStore>,
        config: ServerConfig,
    ) -> Self {
        let messaging = MessagingService::new(records.clone(), messages, config.messaging_settings());
        Self {
            records,
            messaging,
            connections: ConnectionRegistry::new(),
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for Arc<dyn RecordStore> {
    fn from_ref(state: &AppState) -> Self {
        state.records.clone()
    }
}

impl FromRef<AppState> for MessagingService {
    fn from_ref(state: &AppState) -> Self {
        state.messaging.clone()
    }
}

impl FromRef<AppState> for ConnectionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.connections.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
