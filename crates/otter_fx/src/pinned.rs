//! Address-Stable Parameter Blocks
//!
//! The engine reads and writes parameter blocks through a raw address, and
//! that address must stay valid for the whole life of the effect instance.
//! `PinnedBlock` owns one heap-allocated block whose storage never moves:
//! the allocation is made once, there is no resize operation, and the
//! address is released only when the block is dropped. The owning binding
//! guards against use after disposal; this type only guarantees stability
//! while it is alive.

use std::pin::Pin;

use otter_native::EffectParameters;

/// One default-initialized parameter block at a stable address.
pub struct PinnedBlock<P: EffectParameters> {
    block: Pin<Box<P>>,
}

impl<P: EffectParameters> PinnedBlock<P> {
    pub fn new() -> Self {
        Self {
            block: Box::pin(P::default()),
        }
    }

    /// Local read access. Never calls into the engine.
    pub fn get(&self) -> &P {
        &self.block
    }

    /// Local write access. Never calls into the engine.
    pub fn get_mut(&mut self) -> &mut P {
        &mut self.block
    }

    /// The stable address handed to the engine. Valid until drop.
    pub fn as_ptr(&self) -> *const u8 {
        (&*self.block as *const P).cast()
    }

    /// Mutable view of the same stable address, for pulls from the engine.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        (&mut *self.block as *mut P).cast()
    }

    /// Block size in bytes, fixed at allocation.
    pub fn len(&self) -> usize {
        std::mem::size_of::<P>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P: EffectParameters> Default for PinnedBlock<P> {
    fn default() -> Self {
        Self::new()
    }
}
