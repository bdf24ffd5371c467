//! In-Memory Engine Emulation
//!
//! `MockEngine` implements [`NativeEngine`] against plain in-process state so
//! the binding layers can be tested without the native library or audio
//! hardware. It reproduces the behaviors the bindings rely on: byte-accurate
//! parameter storage, the banded peaking-EQ selector protocol, device
//! init/free bookkeeping and the current-device context, plus hooks for fault
//! injection (`fail_record_start`, `free_channel`).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::engine::{CaptureCallback, ChannelHandle, DeviceInfo, FxHandle, NativeEngine};
use crate::error::{ErrorCode, NativeResult};
use crate::params::{ChorusParams, EffectKind, PeakEqParams, ReverbParams};

struct FxSlot {
    channel: ChannelHandle,
    kind: EffectKind,
    #[allow(dead_code)]
    priority: i32,
    /// Raw block bytes as last pushed (engine defaults before any push).
    bytes: Vec<u8>,
    /// Banded store for peaking EQ: (center, gain) per band.
    eq_bands: Vec<(f32, f32)>,
    /// Non-indexed EQ fields shared across bands.
    eq_global: PeakEqParams,
}

#[derive(Default)]
struct State {
    next_handle: u32,
    channels: HashSet<u32>,
    effects: HashMap<u32, FxSlot>,
    devices: Vec<DeviceInfo>,
    initialized: HashSet<u32>,
    current_device: Option<u32>,
    recording: HashMap<u32, Arc<dyn Fn(*const u8, usize) + Send + Sync>>,
    playing: HashSet<u32>,
    fail_record_start: bool,
}

/// In-memory stand-in for the native engine.
pub struct MockEngine {
    state: Mutex<State>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Create a valid channel handle for tests.
    pub fn add_channel(&self) -> ChannelHandle {
        let mut state = self.state.lock();
        state.next_handle += 1;
        let handle = state.next_handle;
        state.channels.insert(handle);
        ChannelHandle(handle)
    }

    /// Invalidate a channel and every effect attached to it, as if it were
    /// freed externally. Subsequent parameter calls fail with `Handle`.
    pub fn free_channel(&self, channel: ChannelHandle) {
        let mut state = self.state.lock();
        state.channels.remove(&channel.0);
        state.effects.retain(|_, slot| slot.channel != channel);
        debug!(channel = channel.0, "channel invalidated");
    }

    /// Append a device to the device list; returns its index.
    pub fn push_device(&self, info: DeviceInfo) -> u32 {
        let mut state = self.state.lock();
        state.devices.push(info);
        (state.devices.len() - 1) as u32
    }

    /// Make the next `record_start` fail with `Busy`.
    pub fn fail_record_start(&self, fail: bool) {
        self.state.lock().fail_record_start = fail;
        debug!(fail, "record-start fault toggled");
    }

    /// Invoke the capture callback registered for `index` with `data`, the
    /// way the engine's processing thread would.
    pub fn deliver_capture(&self, index: u32, data: &[u8]) {
        let callback = self.state.lock().recording.get(&index).cloned();
        if let Some(callback) = callback {
            callback(data.as_ptr(), data.len());
        }
    }

    pub fn is_recording(&self, index: u32) -> bool {
        self.state.lock().recording.contains_key(&index)
    }

    pub fn is_playing(&self, index: u32) -> bool {
        self.state.lock().playing.contains(&index)
    }

    pub fn is_initialized(&self, index: u32) -> bool {
        self.state.lock().initialized.contains(&index)
    }

    pub fn fx_exists(&self, fx: FxHandle) -> bool {
        self.state.lock().effects.contains_key(&fx.0)
    }

    fn default_bytes(kind: EffectKind) -> Vec<u8> {
        match kind {
            EffectKind::Reverb => struct_bytes(&ReverbParams::default()),
            EffectKind::Chorus => struct_bytes(&ChorusParams::default()),
            EffectKind::PeakEq => struct_bytes(&PeakEqParams::default()),
        }
    }
}

fn struct_bytes<T: Copy>(value: &T) -> Vec<u8> {
    // Parameter structs are repr(C) plain data.
    unsafe {
        std::slice::from_raw_parts((value as *const T).cast::<u8>(), std::mem::size_of::<T>())
            .to_vec()
    }
}

impl NativeEngine for MockEngine {
    fn channel_set_fx(
        &self,
        channel: ChannelHandle,
        kind: EffectKind,
        priority: i32,
    ) -> NativeResult<FxHandle> {
        let mut state = self.state.lock();
        if !state.channels.contains(&channel.0) {
            return Err(ErrorCode::Handle);
        }

        state.next_handle += 1;
        let handle = state.next_handle;
        state.effects.insert(
            handle,
            FxSlot {
                channel,
                kind,
                priority,
                bytes: Self::default_bytes(kind),
                eq_bands: Vec::new(),
                eq_global: PeakEqParams::default(),
            },
        );
        Ok(FxHandle(handle))
    }

    fn channel_remove_fx(&self, fx: FxHandle) -> NativeResult<()> {
        match self.state.lock().effects.remove(&fx.0) {
            Some(_) => Ok(()),
            None => Err(ErrorCode::Handle),
        }
    }

    fn fx_set_parameters(&self, fx: FxHandle, params: *const u8, len: usize) -> NativeResult<()> {
        let mut state = self.state.lock();
        let slot = state.effects.get_mut(&fx.0).ok_or(ErrorCode::Handle)?;
        if len != slot.bytes.len() {
            return Err(ErrorCode::Parameter);
        }

        // SAFETY: the caller hands us `len` readable bytes, per the trait
        // contract.
        let incoming = unsafe { std::slice::from_raw_parts(params, len) };
        slot.bytes.copy_from_slice(incoming);

        if slot.kind == EffectKind::PeakEq {
            // SAFETY: len was checked against size_of::<PeakEqParams>() via
            // slot.bytes, and the struct is plain repr(C) data.
            let block = unsafe { std::ptr::read_unaligned(params.cast::<PeakEqParams>()) };
            let band = block.band;
            if band < 0 {
                return Err(ErrorCode::Parameter);
            }
            let band = band as usize;
            if band == slot.eq_bands.len() {
                slot.eq_bands.push((block.center, block.gain));
            } else if band < slot.eq_bands.len() {
                slot.eq_bands[band] = (block.center, block.gain);
            } else {
                return Err(ErrorCode::Parameter);
            }
            slot.eq_global = block;
        }
        Ok(())
    }

    fn fx_get_parameters(&self, fx: FxHandle, params: *mut u8, len: usize) -> NativeResult<()> {
        let state = self.state.lock();
        let slot = state.effects.get(&fx.0).ok_or(ErrorCode::Handle)?;
        if len != slot.bytes.len() {
            return Err(ErrorCode::Parameter);
        }

        if slot.kind == EffectKind::PeakEq {
            // The engine reads the selector out of the caller's block, then
            // fills the indexed payload fields for that band.
            // SAFETY: caller hands us `len` read/writable bytes.
            let block = unsafe { std::ptr::read_unaligned(params.cast::<PeakEqParams>()) };
            let band = block.band;
            if band < 0 || band as usize >= slot.eq_bands.len() {
                return Err(ErrorCode::Parameter);
            }
            let (center, gain) = slot.eq_bands[band as usize];
            let filled = PeakEqParams {
                band,
                bandwidth: slot.eq_global.bandwidth,
                q: slot.eq_global.q,
                center,
                gain,
                channel: slot.eq_global.channel,
            };
            unsafe { std::ptr::write_unaligned(params.cast::<PeakEqParams>(), filled) };
        } else {
            // SAFETY: caller hands us `len` writable bytes.
            let out = unsafe { std::slice::from_raw_parts_mut(params, len) };
            out.copy_from_slice(&slot.bytes);
        }
        Ok(())
    }

    fn device_info(&self, index: u32) -> NativeResult<DeviceInfo> {
        self.state
            .lock()
            .devices
            .get(index as usize)
            .cloned()
            .ok_or(ErrorCode::Device)
    }

    fn device_init(&self, index: u32) -> NativeResult<()> {
        let mut state = self.state.lock();
        if index as usize >= state.devices.len() {
            return Err(ErrorCode::Device);
        }
        if !state.initialized.insert(index) {
            return Err(ErrorCode::Already);
        }
        state.current_device = Some(index);
        Ok(())
    }

    fn device_free(&self) -> NativeResult<()> {
        let mut state = self.state.lock();
        let current = state.current_device.ok_or(ErrorCode::Init)?;
        if !state.initialized.remove(&current) {
            return Err(ErrorCode::Init);
        }
        state.recording.remove(&current);
        Ok(())
    }

    fn current_device(&self) -> NativeResult<u32> {
        self.state.lock().current_device.ok_or(ErrorCode::Init)
    }

    fn set_current_device(&self, index: u32) -> NativeResult<()> {
        let mut state = self.state.lock();
        if index as usize >= state.devices.len() {
            return Err(ErrorCode::Device);
        }
        state.current_device = Some(index);
        Ok(())
    }

    fn record_start(&self, index: u32, callback: CaptureCallback) -> NativeResult<()> {
        let mut state = self.state.lock();
        if state.fail_record_start {
            return Err(ErrorCode::Busy);
        }
        if !state.initialized.contains(&index) {
            return Err(ErrorCode::Init);
        }
        if state.recording.contains_key(&index) {
            return Err(ErrorCode::Already);
        }
        state.recording.insert(index, Arc::from(callback));
        Ok(())
    }

    fn record_stop(&self, index: u32) -> NativeResult<()> {
        match self.state.lock().recording.remove(&index) {
            Some(_) => Ok(()),
            None => Err(ErrorCode::NotAvailable),
        }
    }

    fn playback_start(&self, index: u32) -> NativeResult<()> {
        let mut state = self.state.lock();
        if index as usize >= state.devices.len() {
            return Err(ErrorCode::Device);
        }
        state.playing.insert(index);
        Ok(())
    }

    fn playback_stop(&self, index: u32) -> NativeResult<()> {
        if self.state.lock().playing.remove(&index) {
            Ok(())
        } else {
            Err(ErrorCode::NotAvailable)
        }
    }
}
