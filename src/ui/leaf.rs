use smol_str::SmolStr;

use super::next_node_id;
use crate::geometry::PixelBox;
use crate::layout::{Fixed, LayoutNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafKind {
    Span,
    Text(SmolStr),
    Background,
    Noop,
}

/// Childless node. Takes a fixed extent, zero unless sized.
#[derive(Debug, Clone)]
pub struct Leaf {
    id: u64,
    kind: LeafKind,
    size: Fixed,
    bounds: PixelBox,
}

impl Leaf {
    fn new(kind: LeafKind) -> Self {
        Self {
            id: next_node_id(),
            kind,
            size: Fixed::default(),
            bounds: PixelBox::default(),
        }
    }

    pub fn span() -> Self {
        Self::new(LeafKind::Span)
    }

    pub fn text(text: impl Into<SmolStr>) -> Self {
        Self::new(LeafKind::Text(text.into()))
    }

    pub fn background() -> Self {
        Self::new(LeafKind::Background)
    }

    pub fn noop() -> Self {
        Self::new(LeafKind::Noop)
    }

    pub fn sized(mut self, size: Fixed) -> Self {
        self.size = size;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> &LeafKind {
        &self.kind
    }

    pub fn bounds(&self) -> PixelBox {
        self.bounds
    }

    pub fn layout(&mut self, available: PixelBox) -> PixelBox {
        let mut content = PixelBox::default();
        self.bounds = self.size.resolve(
            available,
            LayoutNode {
                children: &mut [],
                content: &mut content,
            },
        );
        self.bounds
    }
}
