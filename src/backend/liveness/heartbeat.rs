//! Heartbeat task
//!
//! Runs [`ConnectionRegistry::sweep`] on a fixed interval. A connection that
//! stops answering is dropped after at most two intervals.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::registry::ConnectionRegistry;

/// Spawn the periodic sweep; the first sweep happens one `period` after start
pub fn spawn_heartbeat(registry: ConnectionRegistry, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            let report = registry.sweep();
            if report.evicted > 0 {
                tracing::info!(
                    "Heartbeat: evicted {} connection(s), {} remaining",
                    report.evicted,
                    registry.len()
                );
            } else {
                tracing::debug!("Heartbeat: probed {} connection(s)", report.probed);
            }
        }
    })
}
