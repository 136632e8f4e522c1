mod block;
mod flex;

use crate::geometry::PixelBox;
use crate::quantity::{Quantity, Quantity2D};
use crate::ui::Element;

pub use block::Block;
pub use flex::Flex;

/// What a strategy may touch on the node it lays out.
pub struct LayoutNode<'a> {
    pub children: &'a mut [Element],
    pub content: &'a mut PixelBox,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Block(Block),
    Flex(Flex),
    Fixed(Fixed),
}

impl Default for Layout {
    fn default() -> Self {
        Self::Block(Block::default())
    }
}

impl Layout {
    pub fn resolve(&self, available: PixelBox, node: LayoutNode<'_>) -> PixelBox {
        let placed = match self {
            Self::Block(block) => block.resolve(available, node),
            Self::Flex(flex) => flex.resolve(available, node),
            Self::Fixed(fixed) => fixed.resolve(available, node),
        };
        log::trace!("{} layout in {:?} -> {:?}", self.kind(), available, placed);
        placed
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Block(_) => "block",
            Self::Flex(_) => "flex",
            Self::Fixed(_) => "fixed",
        }
    }
}

impl From<Block> for Layout {
    fn from(value: Block) -> Self {
        Self::Block(value)
    }
}

impl From<Flex> for Layout {
    fn from(value: Flex) -> Self {
        Self::Flex(value)
    }
}

impl From<Fixed> for Layout {
    fn from(value: Fixed) -> Self {
        Self::Fixed(value)
    }
}

/// Leaf sizing: a box of constant pixel extent at the available origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fixed {
    pub width: u32,
    pub height: u32,
}

impl Fixed {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn resolve(&self, available: PixelBox, node: LayoutNode<'_>) -> PixelBox {
        let placed = PixelBox::new(available.left, available.top, self.width, self.height);
        *node.content = placed;
        placed
    }
}

/// Horizontal and vertical insets of a box model, already in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Insets {
    pub margin: (u32, u32),
    pub padding: (u32, u32),
}

impl Insets {
    pub fn x(&self) -> u32 {
        self.margin.0.saturating_add(self.padding.0)
    }

    pub fn y(&self) -> u32 {
        self.margin.1.saturating_add(self.padding.1)
    }

    pub fn content_of(&self, own: PixelBox) -> PixelBox {
        own.inset(self.margin.0, self.margin.1)
            .inset(self.padding.0, self.padding.1)
    }
}

pub(crate) fn resolve_or_zero(quantity: Option<Quantity>, reference: u32) -> u32 {
    quantity.map_or(0, |q| q.resolve_px(reference))
}

/// Margins resolve against the available width, padding against the own width.
pub(crate) fn resolve_insets(
    margin: &Quantity2D,
    padding: &Quantity2D,
    available_width: u32,
    own_width: u32,
) -> Insets {
    Insets {
        margin: (
            resolve_or_zero(margin.x, available_width),
            resolve_or_zero(margin.y, available_width),
        ),
        padding: (
            resolve_or_zero(padding.x, own_width),
            resolve_or_zero(padding.y, own_width),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::Length;

    #[test]
    fn fixed_ignores_available_extent() {
        let mut content = PixelBox::default();
        let placed = Fixed::new(30, 10).resolve(
            PixelBox::new(5, 7, 800, 600),
            LayoutNode {
                children: &mut [],
                content: &mut content,
            },
        );
        assert_eq!(placed, PixelBox::new(5, 7, 30, 10));
        assert_eq!(content, placed);
    }

    #[test]
    fn insets_split_references() {
        let margin = Quantity2D::uniform(10.percent());
        let padding = Quantity2D::uniform(10.percent());
        let insets = resolve_insets(&margin, &padding, 400, 200);
        assert_eq!(insets.margin, (40, 40));
        assert_eq!(insets.padding, (20, 20));
        assert_eq!(insets.x(), 60);
        assert_eq!(
            insets.content_of(PixelBox::new(0, 0, 200, 200)),
            PixelBox::new(60, 60, 80, 80)
        );
    }
}
