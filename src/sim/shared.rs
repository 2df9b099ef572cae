//! Thread-safe owner for hosts that tick from a timer thread while commands
//! arrive from elsewhere.
//!
//! One mutex guards the whole [`Simulation`]. A tick and a command each hold
//! the lock for their full duration, so a substance or mass change lands
//! either entirely before or entirely after a tick.

use crate::error::SimError;
use crate::sim::simulation::Simulation;
use crate::sim::simulation_state::{SimCommand, ThermalSnapshot};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

#[derive(Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Simulation>>,
}

impl SharedSimulation {
    pub fn new(sim: Simulation) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sim)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Simulation>, SimError> {
        self.inner.lock().map_err(|_| SimError::Poisoned)
    }

    pub fn apply(&self, command: SimCommand) -> Result<(), SimError> {
        self.lock()?.apply(command)
    }

    pub fn tick(&self) -> Result<ThermalSnapshot, SimError> {
        Ok(self.lock()?.tick())
    }

    pub fn snapshot(&self) -> Result<ThermalSnapshot, SimError> {
        Ok(self.lock()?.snapshot())
    }

    /// Run `f` with exclusive access
    pub fn with<R>(&self, f: impl FnOnce(&mut Simulation) -> R) -> Result<R, SimError> {
        let mut guard = self.lock()?;
        Ok(f(&mut guard))
    }

    /// Start a timer thread that ticks at the configured interval and sends
    /// each snapshot to the returned receiver. The interval is re-read before
    /// every wait, so `SetTickInterval` applies from the next wait on.
    ///
    /// The thread exits when the [`Ticker`] is stopped or dropped (waking it
    /// mid-wait) or when the receiver is dropped.
    pub fn spawn_ticker(&self) -> (Ticker, Receiver<ThermalSnapshot>) {
        let (tx, rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let shared = self.clone();

        let handle = thread::spawn(move || {
            loop {
                let interval = match shared.with(|sim| sim.tick_interval()) {
                    Ok(interval) => interval,
                    Err(err) => {
                        warn!(%err, "ticker stopping");
                        break;
                    }
                };
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }

                match shared.tick() {
                    Ok(snapshot) => {
                        if tx.send(snapshot).is_err() {
                            debug!("snapshot receiver dropped, ticker stopping");
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(%err, "ticker stopping");
                        break;
                    }
                }
            }
            debug!("ticker exited");
        });

        (
            Ticker {
                stop: Some(stop_tx),
                handle: Some(handle),
            },
            rx,
        )
    }
}

/// Handle to a running timer thread. Stopping it is the cancellation point:
/// a pending wait ends at once, the tick in flight, if any, completes and
/// nothing is rolled back.
pub struct Ticker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn stop(mut self) {
        self.halt();
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn halt(&mut self) {
        // the thread may already be gone, in which case there is nobody to wake
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.halt();
    }
}
