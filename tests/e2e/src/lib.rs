//! Shared fixtures for the end-to-end scenarios
//!
//! Every scenario runs all participating workers on the test thread and
//! drives them by hand, so assertions see deterministic frame counts
//! instead of racing against scheduler threads.

use transport::{IpcBus, Subscription};

pub const CHANNEL: &str = "ipc:fxgrid";

/// Fresh bus namespace per scenario
pub fn test_bus(name: &str) -> IpcBus {
    IpcBus::connect(name)
}

/// Poll a subscription until it goes quiet, collecting frame copies
pub fn drain(sub: &mut Box<dyn Subscription>) -> Vec<Vec<u8>> {
    let mut frames = Vec::new();
    while sub.poll(&mut |frame| frames.push(frame.to_vec()), 64) > 0 {}
    frames
}

/// Cycle a worker until it reports no work twice in a row
pub fn run_until_quiet(worker: &mut dyn runtime::Worker) {
    let mut quiet = 0;
    while quiet < 2 {
        if worker.do_work() == 0 {
            quiet += 1;
        } else {
            quiet = 0;
        }
    }
}
