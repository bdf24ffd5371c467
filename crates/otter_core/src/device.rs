//! Audio Device Lifecycle
//!
//! A `Device` represents one audio endpoint by index. Devices are
//! process-wide singletons managed by [`DeviceRegistry`](crate::DeviceRegistry):
//! at most one `Device` object exists per index, handed out behind an `Arc`.
//! Disposal frees the native resources but never destroys the cached object
//! identity; a freed device can be re-initialized.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use otter_native::{DeviceInfo, NativeEngine, NativeResult};

use crate::error::{CoreError, CoreResult};

/// One audio input or output endpoint.
pub struct Device {
    index: u32,
    engine: Arc<dyn NativeEngine>,
    initialized: AtomicBool,
}

impl Device {
    pub(crate) fn new(index: u32, engine: Arc<dyn NativeEngine>) -> Self {
        Self {
            index,
            engine,
            initialized: AtomicBool::new(false),
        }
    }

    /// The index this device is identified by.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Query the capability descriptor. Always a fresh native query, so the
    /// default/enabled flags reflect the current system state.
    pub fn info(&self) -> CoreResult<DeviceInfo> {
        self.engine
            .device_info(self.index)
            .map_err(CoreError::from)
    }

    /// Initialize the device for use.
    ///
    /// Failure is an expected, recoverable outcome (device busy, unplugged,
    /// permission denied), so the native code is returned rather than
    /// escalated.
    pub fn init(&self) -> NativeResult<()> {
        self.engine.device_init(self.index)?;
        self.initialized.store(true, Ordering::SeqCst);
        debug!(index = self.index, "device initialized");
        Ok(())
    }

    /// Free the device's native resources.
    ///
    /// The engine frees the *current* device, so this switches the
    /// current-device context to `self` first. The cached `Device` object
    /// survives and can be re-initialized.
    pub fn free(&self) -> NativeResult<()> {
        self.engine.set_current_device(self.index)?;
        self.engine.device_free()?;
        self.initialized.store(false, Ordering::SeqCst);
        debug!(index = self.index, "device freed");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub(crate) fn engine(&self) -> &Arc<dyn NativeEngine> {
        &self.engine
    }

    /// Free without propagating, for drop paths.
    pub(crate) fn free_quiet(&self) {
        if self.is_initialized() {
            if let Err(code) = self.free() {
                warn!(index = self.index, %code, "failed to free device");
            }
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.info() {
            Ok(info) => write!(f, "{}", info.name),
            Err(_) => write!(f, "device #{}", self.index),
        }
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("index", &self.index)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
