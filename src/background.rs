use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};
use crate::state::AppState;

const SWEEP_INTERVAL_SECS: u64 = 60;

/// Reaps abandoned reservation sessions. A browser that walks away never
/// says goodbye; idle drafts past the TTL are simply dropped. Sessions
/// mid-commit are left alone.
pub async fn start_session_sweeper(state: Arc<AppState>) {
    info!("Starting reservation session sweeper...");

    let ttl = chrono::Duration::minutes(state.config.session_ttl_minutes);

    loop {
        sleep(Duration::from_secs(SWEEP_INTERVAL_SECS)).await;

        let removed = state.sessions.sweep_idle(ttl);
        if removed > 0 {
            info!("Swept {} abandoned reservation session(s)", removed);
        } else {
            debug!("Session sweep: nothing to reap ({} live)", state.sessions.len());
        }
    }
}
