use crate::DiagnosticsConfig;
use atomic_counter::{AtomicCounter, RelaxedCounter};
use gtpu_filter::{Diagnostics, Event};
use slog::{Logger, debug, warn};
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::time::Instant;

/// Classifier diagnostics hook that logs through slog, limited to a fixed number of events per
/// one second window.  Events over the budget are counted rather than logged.
pub struct RateLimitedDiagnostics {
    logger: Logger,
    enabled: bool,
    max_per_window: u64,
    epoch: Instant,
    window: AtomicU64,
    used: AtomicU64,
    suppressed: RelaxedCounter,
}

impl RateLimitedDiagnostics {
    pub fn new(config: &DiagnosticsConfig, logger: Logger) -> Self {
        Self {
            logger,
            enabled: config.enabled,
            max_per_window: config.max_events_per_second,
            epoch: Instant::now(),
            window: AtomicU64::new(0),
            used: AtomicU64::new(0),
            suppressed: RelaxedCounter::new(0),
        }
    }

    pub fn suppressed(&self) -> usize {
        self.suppressed.get()
    }

    /// Abort verdicts are traced whether or not classifier events are enabled.
    pub fn abort(&self, frame_len: usize, ingress_ifindex: u32) {
        if self.admit() {
            warn!(self.logger, "Aborted frame"; "len" => frame_len, "ifindex" => ingress_ifindex);
        }
    }

    // Races between receive threads at a window boundary can let a few extra events through.
    fn admit(&self) -> bool {
        let now = self.epoch.elapsed().as_secs();
        if self.window.swap(now, Relaxed) != now {
            self.used.store(0, Relaxed);
        }
        if self.used.fetch_add(1, Relaxed) < self.max_per_window {
            true
        } else {
            self.suppressed.inc();
            false
        }
    }
}

impl Diagnostics for RateLimitedDiagnostics {
    fn record(&self, event: Event) {
        if self.enabled && self.admit() {
            debug!(self.logger, "{}", event);
        }
    }
}
