//! Liveness heartbeats on the shared heartbeat stream

use crate::epoch_millis;
use crate::worker::Worker;
use codec::{decode_frame, Frame};
use std::time::{Duration, Instant};
use transport::{Publication, Subscription};
use types::{AppId, HeartbeatMsg, MessageHeader};
use tracing::{debug, warn};

const PEER_FRAGMENT_LIMIT: usize = 10;

/// Emits one heartbeat per interval and optionally watches a peer stream
///
/// An emission counts as work for the owning scheduler. The peer
/// subscription is view-only: counterpart heartbeats are decoded and logged,
/// nothing else.
pub struct HeartbeatAgent {
    app_id: AppId,
    interval: Duration,
    last_emit: Option<Instant>,
    publication: Box<dyn Publication>,
    peer: Option<Box<dyn Subscription>>,
    closed: bool,
    buf: [u8; MessageHeader::SIZE + HeartbeatMsg::BLOCK_LENGTH],
}

impl HeartbeatAgent {
    pub fn new(app_id: AppId, interval: Duration, publication: Box<dyn Publication>) -> Self {
        Self {
            app_id,
            interval,
            last_emit: None,
            publication,
            peer: None,
            closed: false,
            buf: [0; MessageHeader::SIZE + HeartbeatMsg::BLOCK_LENGTH],
        }
    }

    /// Watch a counterpart's heartbeat stream (decode and log only)
    pub fn with_peer(mut self, peer: Box<dyn Subscription>) -> Self {
        self.peer = Some(peer);
        self
    }

    fn due(&self) -> bool {
        match self.last_emit {
            Some(at) => at.elapsed() >= self.interval,
            None => true,
        }
    }

    fn emit(&mut self) -> usize {
        let msg = HeartbeatMsg {
            timestamp: epoch_millis(),
            app_id: u32::from(self.app_id),
            _padding: [0; 4],
        };
        let len = match codec::encode_heartbeat(&mut self.buf, 0, &msg) {
            Ok(len) => len,
            Err(err) => {
                warn!(app_id = ?self.app_id, error = %err, "heartbeat encode failed");
                return 0;
            }
        };
        match self.publication.offer(&self.buf[..len]) {
            Ok(_) => {
                self.last_emit = Some(Instant::now());
                1
            }
            Err(err) if err.is_transient() => {
                // window full; the next cycle tries again
                debug!(app_id = ?self.app_id, "heartbeat backpressured");
                0
            }
            Err(err) => {
                warn!(app_id = ?self.app_id, error = %err, "heartbeat channel failed");
                self.closed = true;
                0
            }
        }
    }

    fn poll_peer(&mut self) -> usize {
        let Some(peer) = self.peer.as_mut() else {
            return 0;
        };
        peer.poll(
            &mut |frame| match decode_frame(frame) {
                Ok(Frame::Heartbeat(msg)) => {
                    debug!(peer_app_id = msg.app_id, timestamp = msg.timestamp, "peer heartbeat");
                }
                Ok(_) => {}
                Err(err) => debug!(error = %err, "undecodable frame on heartbeat stream"),
            },
            PEER_FRAGMENT_LIMIT,
        )
    }
}

impl Worker for HeartbeatAgent {
    fn do_work(&mut self) -> usize {
        let mut work = 0;
        if !self.closed && self.due() {
            work += self.emit();
        }
        work + self.poll_peer()
    }

    fn role_name(&self) -> &str {
        "heartbeat"
    }

    fn on_close(&mut self) {
        if let Some(peer) = self.peer.as_mut() {
            peer.close();
        }
        self.closed = true;
    }
}
