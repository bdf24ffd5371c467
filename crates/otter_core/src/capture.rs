//! Loopback Capture Session
//!
//! Wires an initialized capture device to the engine's record callback and
//! relays every delivered chunk to in-process subscribers:
//!
//! ```text
//!   engine thread ──(ptr,len)──> relay buffer ──&[u8]──> subscribers
//! ```
//!
//! The raw pointer never escapes the callback: bytes are copied into the
//! relay's grow-only buffer under its lock and subscribers only ever see a
//! borrowed slice. A loopback capture endpoint goes silent when its mirrored
//! playback endpoint is idle, so the session can drive a silent keep-alive
//! stream on the paired output for the duration of the capture. Keep-alive
//! failure is reported but does not abort the capture; capture failure rolls
//! the keep-alive back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use otter_native::{CaptureCallback, NativeEngine};

use crate::device::Device;
use crate::error::CoreResult;
use crate::registry::DeviceRegistry;

/// Sample format the capture delivers, taken from the device descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Identifies one subscriber for later removal.
pub type SubscriptionId = u64;

/// Lifecycle notifications, drained with [`CaptureSession::poll_event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureEvent {
    Started,
    Stopped,
    /// The silent keep-alive stream could not be started; capture continues
    /// but a loopback source may deliver nothing while its output is idle.
    KeepAliveFailed { message: String },
}

struct Relay {
    /// Grow-only staging buffer; capacity is the high-water mark of chunk
    /// sizes seen so far.
    buffer: Vec<u8>,
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut(&[u8]) + Send>)>,
    next_id: SubscriptionId,
}

/// One capture run on a device, with optional keep-alive playback.
pub struct CaptureSession {
    device: Arc<Device>,
    keep_alive: Option<Arc<Device>>,
    engine: Arc<dyn NativeEngine>,
    relay: Arc<Mutex<Relay>>,
    running: AtomicBool,
    format: CaptureFormat,
    events_tx: Sender<CaptureEvent>,
    events_rx: Receiver<CaptureEvent>,
    disposed: bool,
}

impl CaptureSession {
    /// Build a session on `device`, initializing it if needed. `keep_alive`
    /// names the output to hold open for the duration of the capture.
    pub fn new(device: Arc<Device>, keep_alive: Option<Arc<Device>>) -> CoreResult<Self> {
        if !device.is_initialized() {
            device.init()?;
        }
        let info = device.info()?;
        let engine = Arc::clone(device.engine());
        let (events_tx, events_rx) = unbounded();
        Ok(Self {
            device,
            keep_alive,
            engine,
            relay: Arc::new(Mutex::new(Relay {
                buffer: Vec::new(),
                subscribers: Vec::new(),
                next_id: 0,
            })),
            running: AtomicBool::new(false),
            format: CaptureFormat {
                sample_rate: info.sample_rate,
                channels: info.channels,
            },
            events_tx,
            events_rx,
            disposed: false,
        })
    }

    /// Build a loopback session on a capture endpoint, resolving its paired
    /// playback endpoint through the registry for keep-alive.
    pub fn loopback(registry: &DeviceRegistry, device: Arc<Device>) -> CoreResult<Self> {
        let playback = registry.find_playback_for(&device)?;
        Self::new(device, Some(playback))
    }

    /// Start the capture. Idempotent while running.
    ///
    /// The keep-alive stream starts first so a loopback source is already
    /// audible to the mixer when recording begins. If recording then fails,
    /// the keep-alive is stopped again before the error is returned.
    pub fn start(&self) -> CoreResult<()> {
        // Claim the running flag up front so two controllers racing into
        // start cannot both reach the engine; the loser's rollback would
        // otherwise tear down the winner's keep-alive.
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(());
        }

        let mut keep_alive_started = false;
        if let Some(keep_alive) = &self.keep_alive {
            match self.engine.playback_start(keep_alive.index()) {
                Ok(()) => keep_alive_started = true,
                Err(code) => {
                    warn!(index = keep_alive.index(), %code, "keep-alive start failed");
                    let _ = self.events_tx.send(CaptureEvent::KeepAliveFailed {
                        message: code.to_string(),
                    });
                }
            }
        }

        let relay = Arc::clone(&self.relay);
        let callback: CaptureCallback = Box::new(move |ptr, len| {
            if ptr.is_null() || len == 0 {
                return;
            }
            let mut relay = relay.lock();
            let Relay {
                buffer,
                subscribers,
                ..
            } = &mut *relay;
            if len > buffer.len() {
                buffer.resize(len, 0);
            }
            // SAFETY: the engine guarantees `ptr` is readable for `len` bytes
            // for the duration of this call; `buffer` was just grown to hold
            // at least `len`.
            unsafe { std::ptr::copy_nonoverlapping(ptr, buffer.as_mut_ptr(), len) };
            for (_, subscriber) in subscribers.iter_mut() {
                subscriber(&buffer[..len]);
            }
        });

        if let Err(code) = self.engine.record_start(self.device.index(), callback) {
            if keep_alive_started {
                if let Some(keep_alive) = &self.keep_alive {
                    if let Err(code) = self.engine.playback_stop(keep_alive.index()) {
                        warn!(index = keep_alive.index(), %code, "keep-alive rollback failed");
                    }
                }
            }
            self.running.store(false, Ordering::SeqCst);
            return Err(code.into());
        }

        debug!(index = self.device.index(), "capture started");
        let _ = self.events_tx.send(CaptureEvent::Started);
        Ok(())
    }

    /// Stop the capture and the keep-alive stream. Idempotent.
    ///
    /// Returns only after any capture callback that was executing when the
    /// stop was issued has finished, so no subscriber runs after this.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Err(code) = self.engine.record_stop(self.device.index()) {
            warn!(index = self.device.index(), %code, "record stop failed");
        }
        if let Some(keep_alive) = &self.keep_alive {
            if let Err(code) = self.engine.playback_stop(keep_alive.index()) {
                warn!(index = keep_alive.index(), %code, "keep-alive stop failed");
            }
        }

        // An in-flight callback holds the relay lock; taking it here blocks
        // until that delivery has drained.
        drop(self.relay.lock());

        debug!(index = self.device.index(), "capture stopped");
        let _ = self.events_tx.send(CaptureEvent::Stopped);
    }

    /// Register a subscriber for captured chunks. The slice is only valid for
    /// the duration of the call; subscribers copy what they keep.
    pub fn subscribe(&self, subscriber: impl FnMut(&[u8]) + Send + 'static) -> SubscriptionId {
        let mut relay = self.relay.lock();
        let id = relay.next_id;
        relay.next_id += 1;
        relay.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut relay = self.relay.lock();
        let before = relay.subscribers.len();
        relay.subscribers.retain(|(sub, _)| *sub != id);
        relay.subscribers.len() != before
    }

    /// Channel of lifecycle events, for consumers who want to block or
    /// `select!` on them.
    pub fn events(&self) -> Receiver<CaptureEvent> {
        self.events_rx.clone()
    }

    /// Drain the next pending lifecycle event, if any.
    pub fn poll_event(&self) -> Option<CaptureEvent> {
        self.events_rx.try_recv().ok()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn format(&self) -> CaptureFormat {
        self.format
    }

    /// Current relay buffer size: the largest chunk seen so far.
    pub fn relay_capacity(&self) -> usize {
        self.relay.lock().buffer.len()
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// Stop the capture, free the device and release relay resources.
    /// Idempotent; the session is unusable afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.stop();
        self.device.free_quiet();

        let mut relay = self.relay.lock();
        relay.buffer = Vec::new();
        relay.subscribers.clear();
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
