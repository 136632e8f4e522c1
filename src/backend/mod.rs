mod gpu;
mod headless;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smol_str::SmolStr;

use crate::error::BackendError;
use crate::geometry::BoxConstants;
use crate::style::{CompiledStyle, StyleIdentity};

pub use gpu::*;
pub use headless::*;

slotmap::new_key_type! {
    pub struct PipelineId;
    pub struct UniformRegion;
}

/// What the element tree needs from a graphics device. One pipeline per
/// style identity, one uniform region per View, one slot per frame in flight.
pub trait GpuBackend {
    fn frames_in_flight(&self) -> usize;

    /// `compile` runs only when `identity` has not been seen before.
    fn get_or_create_pipeline(
        &mut self,
        identity: &StyleIdentity,
        compile: &dyn Fn() -> CompiledStyle,
    ) -> Result<PipelineId, BackendError>;

    fn allocate_uniforms(
        &mut self,
        pipeline: PipelineId,
        size: usize,
        images: &[SmolStr],
    ) -> Result<UniformRegion, BackendError>;

    fn uniform_slot(
        &mut self,
        region: UniformRegion,
        frame: usize,
    ) -> Result<&mut [u8], BackendError>;

    fn draw_unit_quad(
        &mut self,
        pipeline: PipelineId,
        constants: BoxConstants,
        region: UniformRegion,
        frame: usize,
    ) -> Result<(), BackendError>;
}

/// Passed down the tree for one frame instead of any global "current" state.
pub struct RenderContext<'a> {
    pub backend: &'a mut dyn GpuBackend,
    pub frame_index: usize,
    pub viewport: (u32, u32),
}

impl<'a> RenderContext<'a> {
    pub fn new(backend: &'a mut dyn GpuBackend, frame_index: usize, viewport: (u32, u32)) -> Self {
        Self {
            backend,
            frame_index,
            viewport,
        }
    }
}

/// Identity-keyed store shared by the backends. Entries live as long as the
/// cache; there is no eviction.
pub struct PipelineCache<T> {
    by_identity: FxHashMap<StyleIdentity, PipelineId>,
    entries: SlotMap<PipelineId, T>,
}

impl<T> Default for PipelineCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PipelineCache<T> {
    pub fn new() -> Self {
        Self {
            by_identity: FxHashMap::default(),
            entries: SlotMap::with_key(),
        }
    }

    pub fn get_or_try_insert_with<E, F: FnOnce() -> Result<T, E>>(
        &mut self,
        identity: &StyleIdentity,
        create: F,
    ) -> Result<PipelineId, E> {
        if let Some(id) = self.by_identity.get(identity) {
            return Ok(*id);
        }
        let id = self.entries.insert(create()?);
        self.by_identity.insert(identity.clone(), id);
        Ok(id)
    }

    pub fn lookup(&self, identity: &StyleIdentity) -> Option<PipelineId> {
        self.by_identity.get(identity).copied()
    }

    pub fn get(&self, id: PipelineId) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn check_frame(frame: usize, frames_in_flight: usize) -> Result<(), BackendError> {
    if frame >= frames_in_flight {
        return Err(BackendError::FrameOutOfRange {
            frame,
            frames_in_flight,
        });
    }
    Ok(())
}
