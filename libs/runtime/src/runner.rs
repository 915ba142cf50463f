//! Scheduler thread ownership and shutdown handshake

use crate::idle::IdleStrategy;
use crate::worker::Worker;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{info, warn};

/// Owns the dedicated thread running one worker (usually a composite poller)
///
/// The loop is: `on_start`, then `do_work` per cycle with the idle strategy
/// applied to the work count, until [`AgentRunner::stop`] is observed, then
/// `on_close`. Dropping the runner stops and joins the thread.
pub struct AgentRunner {
    role: String,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AgentRunner {
    /// Spawn the scheduler thread and start cycling the worker
    pub fn start(
        mut worker: impl Worker + 'static,
        mut idle: impl IdleStrategy + 'static,
    ) -> io::Result<Self> {
        let role = worker.role_name().to_string();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let handle = std::thread::Builder::new()
            .name(role.clone())
            .spawn(move || {
                worker.on_start();
                while !thread_stop.load(Ordering::Acquire) {
                    let work = worker.do_work();
                    idle.idle_for(work);
                }
                worker.on_close();
                info!(role = worker.role_name(), "runner stopped");
            })?;
        info!(role = %role, "runner started");
        Ok(Self {
            role,
            stop,
            handle: Some(handle),
        })
    }

    /// Signal the scheduler loop to exit after its current cycle
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Stop and wait for the thread to run its close hooks
    pub fn join(mut self) {
        self.stop();
        self.join_inner();
    }

    fn join_inner(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(role = %self.role, "scheduler thread panicked");
            }
        }
    }
}

impl Drop for AgentRunner {
    fn drop(&mut self) {
        self.stop();
        self.join_inner();
    }
}
