use super::{LayoutNode, resolve_insets};
use crate::geometry::PixelBox;
use crate::quantity::Quantity2D;

/// Left-to-right row. Only the placement contract exists: children get the
/// remaining main-axis space in order and an unset own size wraps them.
/// There is no measurement pass, no grow/shrink and no wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Flex {
    pub dimensions: Quantity2D,
    pub padding: Quantity2D,
    pub margin: Quantity2D,
}

impl Flex {
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
        let fixed_width = self.dimensions.x.map(|q| q.resolve_px(available.width));
        let fixed_height = self.dimensions.y.map(|q| q.resolve_px(available.height));

        let mut own = PixelBox::new(
            available.left,
            available.top,
            fixed_width.unwrap_or(available.width),
            fixed_height.unwrap_or(available.height),
        );
        let insets = resolve_insets(&self.margin, &self.padding, available.width, own.width);
        let inner = own.inset(insets.x(), insets.y());

        let mut main = inner.left;
        let mut cross = 0;
        for child in node.children.iter_mut() {
            let slot = PixelBox::new(
                main,
                inner.top,
                inner.right().saturating_sub(main),
                inner.height,
            );
            let placed = child.layout(slot);
            main = main.saturating_add(placed.width);
            cross = cross.max(placed.height);
        }

        if fixed_width.is_none() {
            own.width = (main - inner.left).saturating_add(insets.x().saturating_mul(2));
        }
        if fixed_height.is_none() {
            own.height = cross.saturating_add(insets.y().saturating_mul(2));
        }

        *node.content = insets.content_of(own);
        own
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Fixed;
    use crate::quantity::Length;
    use crate::ui::{Element, Leaf};

    fn sized(width: u32, height: u32) -> Element {
        Leaf::span().sized(Fixed::new(width, height)).into()
    }

    #[test]
    fn places_children_left_to_right() {
        let mut children = [sized(30, 10), sized(50, 40)];
        let mut content = PixelBox::default();
        let placed = Flex::new().resolve(
            PixelBox::new(0, 0, 800, 600),
            LayoutNode {
                children: &mut children,
                content: &mut content,
            },
        );

        assert_eq!(children[0].bounds(), PixelBox::new(0, 0, 30, 10));
        assert_eq!(children[1].bounds(), PixelBox::new(30, 0, 50, 40));
        assert_eq!(placed, PixelBox::new(0, 0, 80, 40));
    }

    #[test]
    fn unset_size_includes_both_insets() {
        let mut children = [sized(30, 10)];
        let mut content = PixelBox::default();
        let placed = Flex::new()
            .padding(Quantity2D::uniform(4.px()))
            .margin(Quantity2D::uniform(2.px()))
            .resolve(
                PixelBox::new(0, 0, 800, 600),
                LayoutNode {
                    children: &mut children,
                    content: &mut content,
                },
            );

        assert_eq!(children[0].bounds(), PixelBox::new(6, 6, 30, 10));
        assert_eq!(placed, PixelBox::new(0, 0, 42, 22));
        assert_eq!(content, PixelBox::new(6, 6, 30, 10));
    }

    #[test]
    fn fixed_height_resolves_against_available_height() {
        let mut content = PixelBox::default();
        let placed = Flex::new()
            .dimensions(Quantity2D::both(50.percent(), 50.percent()))
            .resolve(
                PixelBox::new(0, 0, 800, 600),
                LayoutNode {
                    children: &mut [],
                    content: &mut content,
                },
            );
        assert_eq!(placed, PixelBox::new(0, 0, 400, 300));
    }
}
