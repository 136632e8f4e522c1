use super::{Children, Element, next_node_id};
use crate::backend::{PipelineId, RenderContext, UniformRegion};
use crate::error::BackendError;
use crate::geometry::{BoxConstants, PixelBox};
use crate::layout::{Layout, LayoutNode};
use crate::style::{self, Style};

/// Backend handles acquired on first render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewGpu {
    pub pipeline: PipelineId,
    pub region: UniformRegion,
}

/// A styled box with owned children.
pub struct View {
    id: u64,
    layout: Layout,
    style: Style,
    children: Vec<Element>,
    bounds: PixelBox,
    content: PixelBox,
    gpu: Option<ViewGpu>,
}

impl View {
    pub fn new(layout: impl Into<Layout>, style: impl Into<Style>, children: Children) -> Self {
        Self {
            id: next_node_id(),
            layout: layout.into(),
            style: style.into(),
            children: children.into_vec(),
            bounds: PixelBox::default(),
            content: PixelBox::default(),
            gpu: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bounds(&self) -> PixelBox {
        self.bounds
    }

    pub fn content(&self) -> PixelBox {
        self.content
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Replaces the style. Field changes keep the backend handles; a change
    /// of shape drops them so the next render acquires new ones.
    pub fn set_style(&mut self, style: impl Into<Style>) {
        let style = style.into();
        if style.identity() != self.style.identity() {
            self.gpu = None;
        }
        self.style = style;
    }

    pub fn layout_strategy(&self) -> &Layout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: impl Into<Layout>) {
        self.layout = layout.into();
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Element] {
        &mut self.children
    }

    pub fn gpu(&self) -> Option<ViewGpu> {
        self.gpu
    }

    pub fn layout(&mut self, available: PixelBox) -> PixelBox {
        self.bounds = self.layout.resolve(
            available,
            LayoutNode {
                children: &mut self.children,
                content: &mut self.content,
            },
        );
        self.bounds
    }

    pub fn render(&mut self, ctx: &mut RenderContext<'_>) -> Result<(), BackendError> {
        for child in &mut self.children {
            child.render(ctx)?;
        }
        if self.style.is_inert() {
            return Ok(());
        }

        let gpu = match self.gpu {
            Some(gpu) => gpu,
            None => {
                let gpu = self.acquire(ctx)?;
                self.gpu = Some(gpu);
                gpu
            }
        };

        let slot = ctx.backend.uniform_slot(gpu.region, ctx.frame_index)?;
        style::write(&self.style, slot);
        ctx.backend.draw_unit_quad(
            gpu.pipeline,
            BoxConstants::for_content(self.content, ctx.viewport),
            gpu.region,
            ctx.frame_index,
        )
    }

    fn acquire(&self, ctx: &mut RenderContext<'_>) -> Result<ViewGpu, BackendError> {
        let identity = self.style.identity();
        let pipeline = ctx
            .backend
            .get_or_create_pipeline(&identity, &|| self.style.compile())?;
        let region = ctx.backend.allocate_uniforms(
            pipeline,
            style::layout_size(&self.style),
            &self.style.image_keys(),
        )?;
        log::debug!("view {} bound to pipeline {identity}", self.id);
        Ok(ViewGpu { pipeline, region })
    }
}

/// `view(layout, style).children(a | b)`
pub struct ViewBuilder {
    layout: Layout,
    style: Style,
    children: Children,
}

pub fn view(layout: impl Into<Layout>, style: impl Into<Style>) -> ViewBuilder {
    ViewBuilder {
        layout: layout.into(),
        style: style.into(),
        children: Children::new(),
    }
}

impl ViewBuilder {
    pub fn child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl Into<Children>) -> Self {
        for child in children.into() {
            self.children.push(child);
        }
        self
    }

    pub fn build(self) -> Element {
        Element::View(View::new(self.layout, self.style, self.children))
    }
}

impl From<ViewBuilder> for Element {
    fn from(value: ViewBuilder) -> Self {
        value.build()
    }
}
