//! In-process bus with bounded topics and a replayable log
//!
//! One [`Topic`] per (channel, stream id) pair. Frames carry absolute
//! positions in arrival order; each subscriber owns a cursor into the
//! sequence. Offers are refused with backpressure once the slowest attached
//! subscriber lags a full window, which is what keeps the publisher's retry
//! loop honest in tests. Recorded topics retain every frame so replay from
//! any position keeps working; plain topics prune frames below the slowest
//! cursor (at most a window when nobody is attached), so long-running
//! publishers hold bounded memory.

use crate::error::TransportError;
use crate::{Publication, Subscription};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum frame length accepted by the bus
pub const MAX_FRAME_LENGTH: usize = 4096;

/// Default in-flight window per topic
const DEFAULT_WINDOW: usize = 1024;

/// Identifier returned by [`IpcBus::start_recording`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordingId(pub u64);

/// Catalog entry for one recording
#[derive(Debug, Clone)]
pub struct RecordingInfo {
    pub id: RecordingId,
    pub channel: String,
    pub stream_id: i32,
    pub frame_count: usize,
    pub active: bool,
}

struct TopicState {
    frames: Vec<Arc<[u8]>>,
    /// Absolute position of `frames[0]`
    base: u64,
    cursors: HashMap<u64, u64>,
    recorded: bool,
    closed: bool,
}

impl TopicState {
    fn tail(&self) -> u64 {
        self.base + self.frames.len() as u64
    }

    /// Drop frames no attached subscriber can still read. Recorded topics
    /// keep everything for replay.
    fn prune(&mut self, window: usize) {
        if self.recorded {
            return;
        }
        let floor = match self.cursors.values().min() {
            Some(&slowest) => slowest,
            None => self.tail().saturating_sub(window as u64),
        };
        let consumed = floor.saturating_sub(self.base) as usize;
        if consumed > 0 {
            self.frames.drain(..consumed);
            self.base = floor;
        }
    }
}

struct Topic {
    channel: String,
    stream_id: i32,
    window: usize,
    state: RwLock<TopicState>,
}

impl Topic {
    fn new(channel: &str, stream_id: i32, window: usize) -> Self {
        Self {
            channel: channel.to_string(),
            stream_id,
            window,
            state: RwLock::new(TopicState {
                frames: Vec::new(),
                base: 0,
                cursors: HashMap::new(),
                recorded: false,
                closed: false,
            }),
        }
    }

    fn offer(&self, frame: &[u8]) -> Result<u64, TransportError> {
        if frame.len() > MAX_FRAME_LENGTH {
            return Err(TransportError::MessageTooLarge {
                size: frame.len(),
                max: MAX_FRAME_LENGTH,
            });
        }
        let mut state = self.state.write();
        if state.closed {
            return Err(TransportError::Closed {
                channel: self.channel.clone(),
                stream_id: self.stream_id,
            });
        }
        if let Some(&slowest) = state.cursors.values().min() {
            let in_flight = (state.tail() - slowest) as usize;
            if in_flight >= self.window {
                return Err(TransportError::Backpressured {
                    stream_id: self.stream_id,
                    in_flight,
                    capacity: self.window,
                });
            }
        }
        let position = state.tail();
        state.frames.push(Arc::from(frame));
        state.prune(self.window);
        Ok(position)
    }
}

struct RecordingEntry {
    id: RecordingId,
    topic: Arc<Topic>,
    active: bool,
}

struct BusInner {
    dir: String,
    topics: Mutex<HashMap<(String, i32), Arc<Topic>>>,
    recordings: Mutex<Vec<RecordingEntry>>,
    next_subscriber: AtomicU64,
    next_recording: AtomicU64,
}

/// In-process pub/sub bus with a replayable log
///
/// Cheap to clone; all clones share the same topic namespace. Construct one
/// per process (or per test) and hand handles to the workers that need them.
#[derive(Clone)]
pub struct IpcBus {
    inner: Arc<BusInner>,
}

impl IpcBus {
    /// Connect to (create) a bus namespace identified by `dir`
    pub fn connect(dir: &str) -> Self {
        info!(dir, "connected in-process bus");
        Self {
            inner: Arc::new(BusInner {
                dir: dir.to_string(),
                topics: Mutex::new(HashMap::new()),
                recordings: Mutex::new(Vec::new()),
                next_subscriber: AtomicU64::new(0),
                next_recording: AtomicU64::new(0),
            }),
        }
    }

    /// Bus namespace identifier
    pub fn dir(&self) -> &str {
        &self.inner.dir
    }

    fn topic(&self, channel: &str, stream_id: i32) -> Arc<Topic> {
        let mut topics = self.inner.topics.lock();
        topics
            .entry((channel.to_string(), stream_id))
            .or_insert_with(|| Arc::new(Topic::new(channel, stream_id, DEFAULT_WINDOW)))
            .clone()
    }

    /// Add a publication on (channel, stream id)
    pub fn publish(&self, channel: &str, stream_id: i32) -> Box<dyn Publication> {
        debug!(channel, stream_id, "added publication");
        Box::new(IpcPublication {
            topic: self.topic(channel, stream_id),
        })
    }

    /// Add a subscription on (channel, stream id); joins at the current tail
    pub fn subscribe(&self, channel: &str, stream_id: i32) -> Box<dyn Subscription> {
        let topic = self.topic(channel, stream_id);
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
        let tail = {
            let mut state = topic.state.write();
            let tail = state.tail();
            state.cursors.insert(id, tail);
            tail
        };
        debug!(channel, stream_id, subscriber = id, tail, "added subscription");
        Box::new(IpcSubscription {
            topic,
            id,
            open: true,
        })
    }

    /// Start retaining (channel, stream id) for replay
    pub fn start_recording(&self, channel: &str, stream_id: i32) -> RecordingId {
        let topic = self.topic(channel, stream_id);
        topic.state.write().recorded = true;
        let id = RecordingId(self.inner.next_recording.fetch_add(1, Ordering::Relaxed));
        self.inner.recordings.lock().push(RecordingEntry {
            id,
            topic,
            active: true,
        });
        info!(channel, stream_id, recording = id.0, "recording started");
        id
    }

    /// Stop a recording; replay of already-retained frames stays available
    pub fn stop_recording(&self, id: RecordingId) -> Result<(), TransportError> {
        let mut recordings = self.inner.recordings.lock();
        let entry = recordings
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(TransportError::UnknownRecording(id.0))?;
        entry.active = false;
        info!(recording = id.0, "recording stopped");
        Ok(())
    }

    /// Replay a recording from `from_position`; the returned subscription
    /// reports disconnected once the retained frames are exhausted
    pub fn replay(
        &self,
        id: RecordingId,
        from_position: u64,
    ) -> Result<Box<dyn Subscription>, TransportError> {
        let recordings = self.inner.recordings.lock();
        let entry = recordings
            .iter()
            .find(|entry| entry.id == id)
            .ok_or(TransportError::UnknownRecording(id.0))?;
        let frames: Vec<Arc<[u8]>> = {
            let state = entry.topic.state.read();
            let skip = from_position.saturating_sub(state.base) as usize;
            state.frames.iter().skip(skip).cloned().collect()
        };
        debug!(recording = id.0, from_position, frames = frames.len(), "replay opened");
        Ok(Box::new(ReplaySubscription { frames, cursor: 0 }))
    }

    /// Catalog of recordings known to this bus
    pub fn list_recordings(&self) -> Vec<RecordingInfo> {
        self.inner
            .recordings
            .lock()
            .iter()
            .map(|entry| RecordingInfo {
                id: entry.id,
                channel: entry.topic.channel.clone(),
                stream_id: entry.topic.stream_id,
                frame_count: entry.topic.state.read().frames.len(),
                active: entry.active,
            })
            .collect()
    }

    /// Close every topic: pending offers fail terminally, pollers observe
    /// disconnection and stop via their close hooks
    pub fn shutdown(&self) {
        let topics = self.inner.topics.lock();
        for topic in topics.values() {
            topic.state.write().closed = true;
        }
        info!(dir = %self.inner.dir, "bus shut down");
    }
}

struct IpcPublication {
    topic: Arc<Topic>,
}

impl Publication for IpcPublication {
    fn offer(&self, frame: &[u8]) -> Result<u64, TransportError> {
        self.topic.offer(frame)
    }

    fn channel(&self) -> &str {
        &self.topic.channel
    }

    fn stream_id(&self) -> i32 {
        self.topic.stream_id
    }
}

struct IpcSubscription {
    topic: Arc<Topic>,
    id: u64,
    open: bool,
}

impl Subscription for IpcSubscription {
    fn poll(&mut self, handler: &mut dyn FnMut(&[u8]), fragment_limit: usize) -> usize {
        if !self.open {
            return 0;
        }
        // Take the batch under the read lock, run the handler outside it so
        // a handler that offers back into the same topic cannot deadlock.
        let batch: Vec<Arc<[u8]>> = {
            let state = self.topic.state.read();
            let cursor = match state.cursors.get(&self.id) {
                Some(&cursor) => cursor,
                None => return 0,
            };
            let skip = cursor.saturating_sub(state.base) as usize;
            state
                .frames
                .iter()
                .skip(skip)
                .take(fragment_limit)
                .cloned()
                .collect()
        };
        if batch.is_empty() {
            return 0;
        }
        for frame in &batch {
            handler(frame);
        }
        let mut state = self.topic.state.write();
        if let Some(cursor) = state.cursors.get_mut(&self.id) {
            *cursor += batch.len() as u64;
        }
        state.prune(self.topic.window);
        batch.len()
    }

    fn is_connected(&self) -> bool {
        self.open && !self.topic.state.read().closed
    }

    fn close(&mut self) {
        if self.open {
            let mut state = self.topic.state.write();
            state.cursors.remove(&self.id);
            state.prune(self.topic.window);
            self.open = false;
        }
    }
}

impl Drop for IpcSubscription {
    fn drop(&mut self) {
        self.close();
    }
}

struct ReplaySubscription {
    frames: Vec<Arc<[u8]>>,
    cursor: usize,
}

impl Subscription for ReplaySubscription {
    fn poll(&mut self, handler: &mut dyn FnMut(&[u8]), fragment_limit: usize) -> usize {
        let mut polled = 0;
        while polled < fragment_limit && self.cursor < self.frames.len() {
            handler(&self.frames[self.cursor]);
            self.cursor += 1;
            polled += 1;
        }
        polled
    }

    fn is_connected(&self) -> bool {
        self.cursor < self.frames.len()
    }

    fn close(&mut self) {
        self.cursor = self.frames.len();
    }
}
