use super::{LayoutNode, resolve_insets};
use crate::geometry::PixelBox;
use crate::quantity::Quantity2D;

/// Vertical stack. Children share one content box whose top advances by
/// each child's placed height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Block {
    pub dimensions: Quantity2D,
    pub padding: Quantity2D,
    pub margin: Quantity2D,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(mut self, dimensions: Quantity2D) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn padding(mut self, padding: Quantity2D) -> Self {
        self.padding = padding;
        self
    }

    pub fn margin(mut self, margin: Quantity2D) -> Self {
        self.margin = margin;
        self
    }

    pub fn resolve(&self, available: PixelBox, node: LayoutNode<'_>) -> PixelBox {
        let width = self
            .dimensions
            .x
            .map_or(available.width, |q| q.resolve_px(available.width));
        // Height resolves against the available width as well.
        let fixed_height = self.dimensions.y.map(|q| q.resolve_px(available.width));

        let mut own = PixelBox::new(
            available.left,
            available.top,
            width,
            fixed_height.unwrap_or(available.height),
        );
        let insets = resolve_insets(&self.margin, &self.padding, available.width, own.width);

        let mut cursor = own.inset(insets.x(), insets.y());
        for child in node.children.iter_mut() {
            let placed = child.layout(cursor);
            cursor.top = cursor.top.saturating_add(placed.height);
        }

        if fixed_height.is_none() {
            own.height = cursor
                .top
                .saturating_sub(own.top)
                .saturating_add(insets.y());
        }

        *node.content = insets.content_of(own);
        own
    }
}
