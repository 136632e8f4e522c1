use crate::backend::{GpuBackend, RenderContext};
use crate::config::RuntimeConfig;
use crate::error::{Result, TauError};
use crate::geometry::PixelBox;
use crate::ui::Element;

/// Owns the backend and the mounted tree, and drives layout and frames.
pub struct UiRuntime<B: GpuBackend> {
    backend: B,
    config: RuntimeConfig,
    root: Option<Element>,
    viewport: PixelBox,
    frame_index: usize,
    frames_rendered: u64,
}

impl<B: GpuBackend> UiRuntime<B> {
    pub fn new(backend: B, config: RuntimeConfig) -> Result<Self> {
        config.validate()?;
        if backend.frames_in_flight() != config.frames_in_flight {
            return Err(TauError::Config(format!(
                "backend has {} frames in flight, config expects {}",
                backend.frames_in_flight(),
                config.frames_in_flight
            )));
        }
        Ok(Self {
            backend,
            config,
            root: None,
            viewport: PixelBox::default(),
            frame_index: 0,
            frames_rendered: 0,
        })
    }

    pub fn mount(&mut self, root: impl Into<Element>, viewport: (u32, u32)) {
        self.root = Some(root.into());
        self.viewport = PixelBox::from_size(viewport.0, viewport.1);
        self.relayout();
    }

    /// Lays the whole tree out again when the size actually changed.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let next = PixelBox::from_size(width, height);
        if next == self.viewport {
            return false;
        }
        self.viewport = next;
        self.relayout();
        true
    }

    fn relayout(&mut self) {
        if let Some(root) = self.root.as_mut() {
            let placed = root.layout(self.viewport);
            log::trace!("relayout in {:?} placed root at {:?}", self.viewport, placed);
        }
    }

    /// Renders into the current frame slot, then advances to the next one.
    pub fn render_frame(&mut self) -> Result<()> {
        let root = self.root.as_mut().ok_or(TauError::NotMounted)?;
        if root.rerender_dirty() {
            root.layout(self.viewport);
        }

        if self.viewport.is_empty() {
            log::warn!("skipping frame for empty viewport {:?}", self.viewport);
            return Ok(());
        }

        let mut ctx = RenderContext::new(
            &mut self.backend,
            self.frame_index,
            (self.viewport.width, self.viewport.height),
        );
        root.render(&mut ctx)?;

        self.frame_index = (self.frame_index + 1) % self.config.frames_in_flight;
        self.frames_rendered += 1;
        Ok(())
    }

    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.root.as_mut()
    }

    pub fn viewport(&self) -> PixelBox {
        self.viewport
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::layout::Block;
    use crate::style::{Color, Gradient};
    use crate::ui::view;

    fn runtime() -> UiRuntime<HeadlessBackend> {
        UiRuntime::new(HeadlessBackend::new(2), RuntimeConfig::default()).unwrap()
    }

    #[test]
    fn frame_index_wraps_after_each_frame() {
        let mut rt = runtime();
        rt.mount(
            view(Block::new(), Gradient::new(Color::RED, Color::BLUE)),
            (800, 600),
        );

        let mut frames = Vec::new();
        for _ in 0..3 {
            frames.push(rt.frame_index());
            rt.render_frame().unwrap();
        }
        assert_eq!(frames, [0, 1, 0]);
        let draws: Vec<usize> = rt.backend().draws().iter().map(|d| d.frame).collect();
        assert_eq!(draws, [0, 1, 0]);
    }

    #[test]
    fn rendering_before_mount_fails() {
        let mut rt = runtime();
        assert!(matches!(rt.render_frame(), Err(TauError::NotMounted)));
    }

    #[test]
    fn mismatched_frame_counts_are_rejected() {
        let result = UiRuntime::new(HeadlessBackend::new(3), RuntimeConfig::default());
        assert!(matches!(result, Err(TauError::Config(_))));
    }

    #[test]
    fn empty_viewport_skips_drawing() {
        let mut rt = runtime();
        rt.mount(
            view(Block::new(), Gradient::new(Color::RED, Color::BLUE)),
            (0, 600),
        );
        rt.render_frame().unwrap();
        assert!(rt.backend().draws().is_empty());
        assert_eq!(rt.frame_index(), 0);
    }
}
