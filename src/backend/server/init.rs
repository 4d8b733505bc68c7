/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including store selection, state creation and the heartbeat task.
 *
 * # Initialization Process
 *
 * 1. Connect to PostgreSQL when configured, otherwise use the in-memory store
 * 2. Create the application state (messaging service, connection registry)
 * 3. Start the heartbeat sweep
 * 4. Create and configure the router
 */

use axum::Router;
use std::sync::Arc;

use crate::backend::liveness::spawn_heartbeat;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::{MemoryStore, StoreError};

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when a configured database cannot be reached or migrated.
pub async fn create_app(config: ServerConfig) -> Result<Router<()>, StoreError> {
    tracing::info!("Initializing SchoolHub backend server");

    // Step 1: Pick the store
    let state = match load_database(&config).await? {
        Some(pg) => {
            let pg = Arc::new(pg);
            AppState::new(pg.clone(), pg, config)
        }
        None => {
            let memory = Arc::new(MemoryStore::new());
            AppState::new(memory.clone(), memory, config)
        }
    };

    // Step 2: Start the heartbeat sweep over live connections
    let period = state.config.heartbeat_interval();
    spawn_heartbeat(state.connections.clone(), period);
    tracing::info!("Heartbeat started, sweeping every {:?}", period);

    // Step 3: Create router with all routes
    Ok(build_app(state))
}

/// Build the router over an existing state, without background tasks
pub fn build_app(state: AppState) -> Router<()> {
    create_router(state)
}

/// State over a fresh in-memory store
pub fn memory_state(config: ServerConfig) -> AppState {
    let memory = Arc::new(MemoryStore::new());
    AppState::new(memory.clone(), memory, config)
}
