/**
 * Connection Registry
 *
 * The single owner of live WebSocket connections, keyed by user id. Each
 * connection is represented by the sending half of a channel; the socket
 * task owns the receiving half and the transport.
 *
 * # Lifecycle
 *
 * ```text
 * register ──► Alive ──sweep──► Suspect ──sweep──► evicted (Close sent)
 *                ▲                 │
 *                └──── acknowledge ┘   (pong or any inbound frame)
 * ```
 *
 * A user has at most one registered connection. Registering again closes
 * the previous one. A connection can only unregister itself, so a
 * superseded socket shutting down never removes its successor.
 *
 * All mutation goes through one mutex; no lock is held across an `.await`.
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

use crate::shared::messaging::LiveEvent;

/// Liveness of a registered connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    /// Responded since the last sweep
    Alive,
    /// Probed by the last sweep and not heard from since
    Suspect,
}

/// Instructions for a socket task
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// Send a heartbeat probe
    Ping,
    /// Push an application event as a JSON text frame
    Event(LiveEvent),
    /// Close the transport and stop
    Close,
}

/// Identifies one registration of a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHandle {
    pub user_id: String,
    pub connection_id: u64,
}

#[derive(Debug)]
struct Connection {
    connection_id: u64,
    liveness: Liveness,
    outbound: mpsc::UnboundedSender<Outbound>,
}

/// Result of one heartbeat sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Connections marked suspect and sent a probe
    pub probed: usize,
    /// Connections dropped from the registry
    pub evicted: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<Mutex<HashMap<String, Connection>>>,
    next_id: Arc<AtomicU64>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Connection>> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a connection for `user_id`, superseding any existing one
    ///
    /// Returns the handle identifying this registration and the receiver the
    /// socket task drains.
    pub fn register(&self, user_id: &str) -> (ConnectionHandle, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connection_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let previous = self.lock().insert(
            user_id.to_string(),
            Connection {
                connection_id,
                liveness: Liveness::Alive,
                outbound: tx,
            },
        );

        if let Some(previous) = previous {
            tracing::info!("Connection for {} superseded by a new one", user_id);
            let _ = previous.outbound.send(Outbound::Close);
        }
        tracing::info!("User connected: {}", user_id);

        (
            ConnectionHandle {
                user_id: user_id.to_string(),
                connection_id,
            },
            rx,
        )
    }

    /// Mark the connection alive after a pong or inbound frame
    pub fn acknowledge(&self, handle: &ConnectionHandle) {
        if let Some(connection) = self.lock().get_mut(&handle.user_id) {
            if connection.connection_id == handle.connection_id {
                connection.liveness = Liveness::Alive;
            }
        }
    }

    /// Remove the connection if it is still the registered one
    pub fn unregister(&self, handle: &ConnectionHandle) -> bool {
        let mut connections = self.lock();
        match connections.get(&handle.user_id) {
            Some(connection) if connection.connection_id == handle.connection_id => {
                connections.remove(&handle.user_id);
                tracing::info!("User disconnected: {}", handle.user_id);
                true
            }
            _ => false,
        }
    }

    /// One heartbeat step
    ///
    /// Suspect connections are evicted and told to close. Every other
    /// connection becomes suspect and is sent a probe. A connection whose task
    /// is already gone is evicted right away.
    pub fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();
        let mut connections = self.lock();

        connections.retain(|user_id, connection| match connection.liveness {
            Liveness::Suspect => {
                tracing::info!("Evicting unresponsive connection for {}", user_id);
                let _ = connection.outbound.send(Outbound::Close);
                report.evicted += 1;
                false
            }
            Liveness::Alive => {
                connection.liveness = Liveness::Suspect;
                if connection.outbound.send(Outbound::Ping).is_err() {
                    tracing::debug!("Connection task for {} is gone", user_id);
                    report.evicted += 1;
                    return false;
                }
                report.probed += 1;
                true
            }
        });

        report
    }

    /// Push an event to the user's connection, if any
    ///
    /// Best effort: returns whether the event was handed to a live socket task.
    pub fn notify(&self, user_id: &str, event: LiveEvent) -> bool {
        self.lock()
            .get(user_id)
            .is_some_and(|connection| connection.outbound.send(Outbound::Event(event)).is_ok())
    }

    pub fn is_online(&self, user_id: &str) -> bool {
        self.lock().contains_key(user_id)
    }

    pub fn liveness(&self, user_id: &str) -> Option<Liveness> {
        self.lock().get(user_id).map(|c| c.liveness)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
