use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use chrono::Duration;
use tokio::sync::Mutex as AsyncMutex;

use crate::domain::services::reservation::{FlowState, ReservationFlow};

/// In-process registry of live reservation attempts. One flow per
/// session id; each flow is serialized by its own async mutex so a
/// session behaves single-threaded while distinct sessions run in
/// parallel.
#[derive(Default)]
pub struct ReservationSessions {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<ReservationFlow>>>>,
}

impl ReservationSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, flow: ReservationFlow) -> String {
        let id = flow.id.clone();
        self.inner
            .lock()
            .unwrap()
            .insert(id.clone(), Arc::new(AsyncMutex::new(flow)));
        id
    }

    pub fn get(&self, id: &str) -> Option<Arc<AsyncMutex<ReservationFlow>>> {
        self.inner.lock().unwrap().get(id).cloned()
    }

    pub fn remove(&self, id: &str) {
        self.inner.lock().unwrap().remove(id);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    /// Drops sessions idle past `ttl`. A flow that is mid-commit is never
    /// swept; once a payment is captured the attempt runs to its end.
    pub fn sweep_idle(&self, ttl: Duration) -> usize {
        let cutoff = chrono::Utc::now() - ttl;
        let mut map = self.inner.lock().unwrap();
        let before = map.len();
        map.retain(|_, entry| match entry.try_lock() {
            Ok(flow) => flow.state == FlowState::Committing || flow.touched_at >= cutoff,
            // Locked means a request is on it right now; keep it.
            Err(_) => true,
        });
        before - map.len()
    }
}
