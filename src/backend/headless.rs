use slotmap::SlotMap;
use smol_str::SmolStr;

use super::{GpuBackend, PipelineCache, PipelineId, UniformRegion, check_frame};
use crate::error::BackendError;
use crate::geometry::BoxConstants;
use crate::style::{CompiledStyle, StyleIdentity};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub pipeline: PipelineId,
    pub region: UniformRegion,
    pub frame: usize,
    pub constants: BoxConstants,
    /// Slot contents at the time of the draw.
    pub uniforms: Vec<u8>,
}

#[derive(Debug)]
struct HeadlessRegion {
    pipeline: PipelineId,
    images: Vec<SmolStr>,
    slots: Vec<Vec<u8>>,
}

/// Records everything in memory. Used by tests and `tau-dump`.
pub struct HeadlessBackend {
    frames_in_flight: usize,
    pipelines: PipelineCache<CompiledStyle>,
    regions: SlotMap<UniformRegion, HeadlessRegion>,
    draws: Vec<DrawCall>,
    compile_count: usize,
}

impl HeadlessBackend {
    pub fn new(frames_in_flight: usize) -> Self {
        Self {
            frames_in_flight,
            pipelines: PipelineCache::new(),
            regions: SlotMap::with_key(),
            draws: Vec::new(),
            compile_count: 0,
        }
    }

    pub fn draws(&self) -> &[DrawCall] {
        &self.draws
    }

    pub fn take_draws(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draws)
    }

    /// How many times a style was actually compiled, cache misses only.
    pub fn compile_count(&self) -> usize {
        self.compile_count
    }

    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    pub fn compiled(&self, pipeline: PipelineId) -> Option<&CompiledStyle> {
        self.pipelines.get(pipeline)
    }

    pub fn slot(&self, region: UniformRegion, frame: usize) -> Option<&[u8]> {
        self.regions
            .get(region)
            .and_then(|region| region.slots.get(frame))
            .map(Vec::as_slice)
    }

    pub fn region_images(&self, region: UniformRegion) -> Option<&[SmolStr]> {
        self.regions.get(region).map(|region| region.images.as_slice())
    }
}

impl GpuBackend for HeadlessBackend {
    fn frames_in_flight(&self) -> usize {
        self.frames_in_flight
    }

    fn get_or_create_pipeline(
        &mut self,
        identity: &StyleIdentity,
        compile: &dyn Fn() -> CompiledStyle,
    ) -> Result<PipelineId, BackendError> {
        let compile_count = &mut self.compile_count;
        self.pipelines
            .get_or_try_insert_with(identity, || {
                *compile_count += 1;
                Ok(compile())
            })
    }

    fn allocate_uniforms(
        &mut self,
        pipeline: PipelineId,
        size: usize,
        images: &[SmolStr],
    ) -> Result<UniformRegion, BackendError> {
        if self.pipelines.get(pipeline).is_none() {
            return Err(BackendError::PipelineMissing);
        }
        Ok(self.regions.insert(HeadlessRegion {
            pipeline,
            images: images.to_vec(),
            slots: vec![vec![0; size]; self.frames_in_flight],
        }))
    }

    fn uniform_slot(
        &mut self,
        region: UniformRegion,
        frame: usize,
    ) -> Result<&mut [u8], BackendError> {
        check_frame(frame, self.frames_in_flight)?;
        let region = self
            .regions
            .get_mut(region)
            .ok_or(BackendError::RegionMissing)?;
        Ok(region.slots[frame].as_mut_slice())
    }

    fn draw_unit_quad(
        &mut self,
        pipeline: PipelineId,
        constants: BoxConstants,
        region: UniformRegion,
        frame: usize,
    ) -> Result<(), BackendError> {
        check_frame(frame, self.frames_in_flight)?;
        let entry = self.regions.get(region).ok_or(BackendError::RegionMissing)?;
        if entry.pipeline != pipeline || self.pipelines.get(pipeline).is_none() {
            return Err(BackendError::PipelineMissing);
        }
        self.draws.push(DrawCall {
            pipeline,
            region,
            frame,
            constants,
            uniforms: entry.slots[frame].clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Border, Color, ImageBackground, Style};

    #[test]
    fn slots_are_per_frame_and_sized_exactly() {
        let mut backend = HeadlessBackend::new(2);
        let style = Style::from(Border::new(4.0, 1.0, Color::RED));
        let pipeline = backend
            .get_or_create_pipeline(&style.identity(), &|| style.compile())
            .unwrap();
        let region = backend.allocate_uniforms(pipeline, 32, &[]).unwrap();

        backend.uniform_slot(region, 1).unwrap()[0] = 7;
        assert_eq!(backend.slot(region, 0).unwrap(), &[0u8; 32][..]);
        assert_eq!(backend.slot(region, 1).unwrap()[0], 7);
        assert!(matches!(
            backend.uniform_slot(region, 2),
            Err(BackendError::FrameOutOfRange { .. })
        ));
    }

    #[test]
    fn draw_requires_matching_pipeline() {
        let mut backend = HeadlessBackend::new(2);
        let a = Style::from(Border::new(4.0, 1.0, Color::RED));
        let b = Style::from(Border::new(4.0, 1.0, Color::RED)) | Style::Default;
        let pa = backend
            .get_or_create_pipeline(&a.identity(), &|| a.compile())
            .unwrap();
        let pb = backend
            .get_or_create_pipeline(&b.identity(), &|| b.compile())
            .unwrap();
        let region = backend.allocate_uniforms(pa, 32, &[]).unwrap();

        let err = backend
            .draw_unit_quad(pb, BoxConstants::default(), region, 0)
            .unwrap_err();
        assert!(matches!(err, BackendError::PipelineMissing));
        assert_eq!(backend.compile_count(), 2);
    }

    #[test]
    fn regions_remember_their_images_and_draws_drain() {
        let mut backend = HeadlessBackend::new(2);
        let style = Style::from(ImageBackground::new("sky.png"));
        let pipeline = backend
            .get_or_create_pipeline(&style.identity(), &|| style.compile())
            .unwrap();
        let region = backend
            .allocate_uniforms(pipeline, 0, &style.image_keys())
            .unwrap();
        assert_eq!(backend.region_images(region).unwrap(), &["sky.png"][..]);

        backend
            .draw_unit_quad(pipeline, BoxConstants::default(), region, 1)
            .unwrap();
        let drained = backend.take_draws();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].frame, 1);
        assert!(drained[0].uniforms.is_empty());
        assert!(backend.draws().is_empty());
    }
}
