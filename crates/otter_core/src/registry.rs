//! Device Registry
//!
//! The engine identifies devices by index and the binding identity must be
//! one-to-one with the native identity: two `Device` objects for the same
//! index would disagree about init state. The registry is therefore the sole
//! constructor of devices, caching one `Arc<Device>` per index for the life
//! of the process. Enumeration follows the engine's convention of probing
//! ascending indices until the first failure.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use otter_native::{DeviceKind, NativeEngine};

use crate::device::Device;
use crate::error::{CoreError, CoreResult};

/// Process-wide cache of per-index device singletons.
pub struct DeviceRegistry {
    engine: Arc<dyn NativeEngine>,
    cache: Mutex<HashMap<u32, Arc<Device>>>,
}

impl DeviceRegistry {
    pub fn new(engine: Arc<dyn NativeEngine>) -> Self {
        Self {
            engine,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The singleton device for `index`, validating the index on first use.
    ///
    /// The cache lock is held across the native probe so two threads racing
    /// on a first access cannot mint two objects for the same index.
    pub fn get(&self, index: u32) -> CoreResult<Arc<Device>> {
        let mut cache = self.cache.lock();
        if let Some(device) = cache.get(&index) {
            return Ok(Arc::clone(device));
        }

        if self.engine.device_info(index).is_err() {
            return Err(CoreError::InvalidDeviceIndex(index));
        }
        let device = Arc::new(Device::new(index, Arc::clone(&self.engine)));
        cache.insert(index, Arc::clone(&device));
        debug!(index, "device cached");
        Ok(device)
    }

    /// Iterate every device, probing ascending indices until the engine
    /// rejects one. Lazy; indices that appear between calls are picked up.
    pub fn devices(&self) -> impl Iterator<Item = Arc<Device>> + '_ {
        (0u32..).map_while(|index| self.get(index).ok())
    }

    /// Number of devices currently enumerable.
    pub fn count(&self) -> u32 {
        self.devices().count() as u32
    }

    /// The device flagged as the system default.
    pub fn default_device(&self) -> CoreResult<Arc<Device>> {
        for device in self.devices() {
            if device.info()?.is_default {
                return Ok(device);
            }
        }
        Err(CoreError::NoDefaultDevice)
    }

    /// The device holding the engine's current-device context.
    pub fn current_device(&self) -> CoreResult<Arc<Device>> {
        let index = self.engine.current_device()?;
        self.get(index)
    }

    /// Switch the engine's current-device context to `device`.
    pub fn set_current_device(&self, device: &Device) -> CoreResult<()> {
        self.engine.set_current_device(device.index())?;
        Ok(())
    }

    /// Find the playback endpoint a loopback capture device mirrors.
    ///
    /// Loopback capture descriptors carry the mirrored playback endpoint's id
    /// in their driver field; the match is exact on that id.
    pub fn find_playback_for(&self, capture: &Device) -> CoreResult<Arc<Device>> {
        let info = capture.info()?;
        for device in self.devices() {
            let candidate = device.info()?;
            if candidate.kind == DeviceKind::Output && candidate.id == info.driver {
                return Ok(device);
            }
        }
        Err(CoreError::NoMatchingPlayback(info.name))
    }
}
