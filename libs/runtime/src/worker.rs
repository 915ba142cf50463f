//! Worker trait and the composite multi-stream poller

use tracing::info;

/// A non-blocking unit of work driven by the scheduler
///
/// `do_work` must return quickly; long waits belong to the idle strategy
/// between cycles, never inside a worker.
pub trait Worker: Send {
    /// One polling cycle; returns the number of items processed
    fn do_work(&mut self) -> usize;

    /// Role label used in logs
    fn role_name(&self) -> &str;

    /// Called once on the scheduler thread before the first cycle
    fn on_start(&mut self) {}

    /// Called once on the scheduler thread during shutdown
    fn on_close(&mut self) {}
}

/// Runs a fixed, ordered set of workers one cycle each per `do_work`
///
/// The composite's work count is the sum over its children, so the owning
/// runner idles only when every stream was quiet.
pub struct MultiStreamPoller {
    role: String,
    workers: Vec<Box<dyn Worker>>,
}

impl MultiStreamPoller {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            workers: Vec::new(),
        }
    }

    /// Append a worker; cycle order is registration order
    pub fn add(&mut self, worker: Box<dyn Worker>) -> &mut Self {
        self.workers.push(worker);
        self
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Worker for MultiStreamPoller {
    fn do_work(&mut self) -> usize {
        let mut work = 0;
        for worker in &mut self.workers {
            work += worker.do_work();
        }
        work
    }

    fn role_name(&self) -> &str {
        &self.role
    }

    fn on_start(&mut self) {
        info!(role = %self.role, workers = self.workers.len(), "poller starting");
        for worker in &mut self.workers {
            worker.on_start();
        }
    }

    fn on_close(&mut self) {
        for worker in &mut self.workers {
            info!(role = worker.role_name(), "closing worker");
            worker.on_close();
        }
    }
}
