//! Long-run watchdog
//!
//! Logs a warning when a run exceeds the threshold. Never interrupts it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Run currently executing on the worker
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    current: Mutex<Option<(u64, Instant)>>,
    /// Runs the watchdog flagged as slow
    slow_runs: AtomicU64,
}

impl InFlight {
    pub(crate) fn start(&self, seq: u64) {
        *self.lock() = Some((seq, Instant::now()));
    }

    pub(crate) fn finish(&self) {
        *self.lock() = None;
    }

    pub(crate) fn slow_runs(&self) -> u64 {
        self.slow_runs.load(Ordering::Relaxed)
    }

    fn snapshot(&self) -> Option<(u64, Instant)> {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<(u64, Instant)>> {
        // the guarded value is plain data, a poisoned lock is still usable
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Shortest poll interval; zero would spin
const MIN_POLL: Duration = Duration::from_millis(1);

pub(crate) fn spawn(
    in_flight: Arc<InFlight>,
    shutdown: Arc<AtomicBool>,
    threshold: Duration,
    poll: Duration,
) -> std::io::Result<JoinHandle<()>> {
    let poll = poll.max(MIN_POLL);
    thread::Builder::new()
        .name("recompute-watchdog".into())
        .spawn(move || {
            let mut warned: Option<u64> = None;
            while !shutdown.load(Ordering::Acquire) {
                thread::sleep(poll);
                let Some((seq, started)) = in_flight.snapshot() else {
                    continue;
                };
                let elapsed = started.elapsed();
                if elapsed > threshold && warned != Some(seq) {
                    warned = Some(seq);
                    in_flight.slow_runs.fetch_add(1, Ordering::Relaxed);
                    observability::record_watchdog_warning();
                    warn!(
                        seq,
                        elapsed_ms = elapsed.as_millis() as u64,
                        threshold_ms = threshold.as_millis() as u64,
                        "recompute is taking unusually long"
                    );
                }
            }
            debug!("watchdog stopped");
        })
}
