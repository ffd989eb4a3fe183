//! Controllable checker for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::checker::{Checker, Probe};

#[derive(Debug, Default)]
struct InMemoryCheckerState {
    unhealthy: AtomicBool,
    optional: AtomicBool,
    delay_ms: AtomicU64,
    probes: AtomicUsize,
}

/// In-memory checker whose health, criticality and latency can be changed at
/// runtime. Clones share state.
#[derive(Debug, Clone)]
pub struct InMemoryChecker {
    name: String,
    state: Arc<InMemoryCheckerState>,
}

impl InMemoryChecker {
    /// Creates a healthy, critical checker with no delay.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::default(),
        }
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state.unhealthy.store(!healthy, Ordering::SeqCst);
    }

    pub fn set_critical(&self, critical: bool) {
        self.state.optional.store(!critical, Ordering::SeqCst);
    }

    /// Makes every subsequent probe sleep for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.state.delay_ms.store(millis, Ordering::SeqCst);
    }

    /// Returns how many probes have completed.
    pub fn probe_count(&self) -> usize {
        self.state.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Checker for InMemoryChecker {
    fn name(&self) -> &str {
        &self.name
    }

    fn critical(&self) -> bool {
        !self.state.optional.load(Ordering::SeqCst)
    }

    async fn probe(&self) -> Probe {
        let delay = self.state.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.state.probes.fetch_add(1, Ordering::SeqCst);

        if self.state.unhealthy.load(Ordering::SeqCst) {
            Probe::unhealthy(format!("{} marked unhealthy", self.name))
        } else {
            Probe::healthy(format!("{} healthy", self.name))
        }
    }
}
