//! Grace-window watchdog.
//!
//! After the solver exits, buffered output may still be in flight. The
//! watchdog bounds how long the orchestrator keeps draining: a timer thread
//! flips a shared cancellation flag exactly once on expiry, and the drain loop
//! checks the flag before every readiness wait. Disarming before expiry
//! guarantees the flag is never set.

use crossbeam_channel::{self, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Read side of the watchdog, checked by the drain loop.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Instant,
}

impl CancellationToken {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Time left until the deadline (zero once passed).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

pub struct GraceWatchdog {
    cancelled: Arc<AtomicBool>,
    deadline: Instant,
    grace: Duration,
    disarm_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl GraceWatchdog {
    /// Start the timer.
    pub fn arm(grace: Duration) -> Self {
        let deadline = Instant::now() + grace;
        let cancelled = Arc::new(AtomicBool::new(false));
        let (disarm_tx, disarm_rx) = crossbeam_channel::bounded::<()>(1);
        let flag = Arc::clone(&cancelled);

        let handle = thread::spawn(move || {
            if let Err(RecvTimeoutError::Timeout) = disarm_rx.recv_timeout(grace) {
                flag.store(true, Ordering::SeqCst);
                log::debug!("Grace window of {:?} expired; interrupting drain", grace);
            }
        });

        Self {
            cancelled,
            deadline,
            grace,
            disarm_tx: Some(disarm_tx),
            handle: Some(handle),
        }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            cancelled: Arc::clone(&self.cancelled),
            deadline: self.deadline,
        }
    }

    /// Stop the timer and report whether it had already fired.
    pub fn disarm(mut self) -> bool {
        self.shutdown();
        self.cancelled.load(Ordering::SeqCst)
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.disarm_tx.take() {
            // The timer thread may already have exited after firing.
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Grace watchdog thread panicked");
            }
        }
    }
}

impl Drop for GraceWatchdog {
    fn drop(&mut self) {
        self.shutdown();
    }
}
