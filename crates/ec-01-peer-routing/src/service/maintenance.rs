use crate::ports::RoutingApi;
use crate::service::RoutingService;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

impl RoutingService {
    /// Periodically evict stale nodes until `shutdown` fires.
    ///
    /// Spawn as a task: `tokio::spawn(service.clone().run_maintenance(token))`.
    pub async fn run_maintenance(self: Arc<Self>, shutdown: CancellationToken) {
        let period = Duration::from_secs(self.with_table(|t| t.config().cleanup_interval_secs).max(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("[routing] Maintenance stopped");
                    return;
                }
                _ = ticker.tick() => {
                    let evicted = self.cleanup_stale_nodes();
                    if evicted.is_empty() {
                        debug!("[routing] Maintenance sweep: nothing stale");
                    } else {
                        info!("[routing] Evicted {} stale node(s), {} remain", evicted.len(), self.len());
                    }
                }
            }
        }
    }
}
