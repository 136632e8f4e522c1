use std::ops::BitOr;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Component, Leaf, View, ViewBuilder};
use crate::backend::RenderContext;
use crate::error::BackendError;
use crate::geometry::PixelBox;

pub(crate) fn next_node_id() -> u64 {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

pub enum Element {
    View(View),
    Component(Component),
    Leaf(Leaf),
}

impl Element {
    pub fn id(&self) -> u64 {
        match self {
            Self::View(view) => view.id(),
            Self::Component(component) => component.id(),
            Self::Leaf(leaf) => leaf.id(),
        }
    }

    /// Box as placed by the parent during the last layout pass.
    pub fn bounds(&self) -> PixelBox {
        match self {
            Self::View(view) => view.bounds(),
            Self::Component(component) => component.bounds(),
            Self::Leaf(leaf) => leaf.bounds(),
        }
    }

    pub fn content(&self) -> PixelBox {
        match self {
            Self::View(view) => view.content(),
            Self::Component(component) => component.content(),
            Self::Leaf(leaf) => leaf.bounds(),
        }
    }

    /// Direct children. A component reports its expanded subtree, if any.
    pub fn children(&self) -> &[Element] {
        match self {
            Self::View(view) => view.children(),
            Self::Component(component) => match component.child() {
                Some(child) => std::slice::from_ref(child),
                None => &[],
            },
            Self::Leaf(_) => &[],
        }
    }

    pub fn layout(&mut self, available: PixelBox) -> PixelBox {
        match self {
            Self::View(view) => view.layout(available),
            Self::Component(component) => component.layout(available),
            Self::Leaf(leaf) => leaf.layout(available),
        }
    }

    pub fn render(&mut self, ctx: &mut RenderContext<'_>) -> Result<(), BackendError> {
        match self {
            Self::View(view) => view.render(ctx),
            Self::Component(component) => component.render(ctx),
            Self::Leaf(_) => Ok(()),
        }
    }

    /// Rebuilds every component whose props changed since it was expanded.
    /// Returns whether anything was rebuilt, in which case the tree needs a
    /// fresh layout pass.
    pub fn rerender_dirty(&mut self) -> bool {
        match self {
            Self::View(view) => view
                .children_mut()
                .iter_mut()
                .fold(false, |rebuilt, child| child.rerender_dirty() | rebuilt),
            Self::Component(component) => {
                let rebuilt = component.rerender();
                let nested = component
                    .child_mut()
                    .is_some_and(|child| child.rerender_dirty());
                rebuilt || nested
            }
            Self::Leaf(_) => false,
        }
    }

    pub fn as_view(&self) -> Option<&View> {
        match self {
            Self::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_view_mut(&mut self) -> Option<&mut View> {
        match self {
            Self::View(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Self::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_component_mut(&mut self) -> Option<&mut Component> {
        match self {
            Self::Component(component) => Some(component),
            _ => None,
        }
    }
}

impl From<View> for Element {
    fn from(value: View) -> Self {
        Self::View(value)
    }
}

impl From<Component> for Element {
    fn from(value: Component) -> Self {
        Self::Component(value)
    }
}

impl From<Leaf> for Element {
    fn from(value: Leaf) -> Self {
        Self::Leaf(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxSnapshot {
    pub id: u64,
    pub depth: usize,
    pub bounds: PixelBox,
    pub content: PixelBox,
}

/// Preorder dump of every node's boxes.
pub fn collect_boxes(root: &Element) -> Vec<BoxSnapshot> {
    fn walk(node: &Element, depth: usize, out: &mut Vec<BoxSnapshot>) {
        out.push(BoxSnapshot {
            id: node.id(),
            depth,
            bounds: node.bounds(),
            content: node.content(),
        });
        for child in node.children() {
            walk(child, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(root, 0, &mut out);
    out
}

/// Ordered sibling list built with `|`.
#[derive(Default)]
pub struct Children(Vec<Element>);

impl Children {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: impl Into<Element>) {
        self.0.push(element.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Element> {
        self.0
    }
}

impl From<Element> for Children {
    fn from(value: Element) -> Self {
        Self(vec![value])
    }
}

impl From<ViewBuilder> for Children {
    fn from(value: ViewBuilder) -> Self {
        Self(vec![value.build()])
    }
}

impl From<Vec<Element>> for Children {
    fn from(value: Vec<Element>) -> Self {
        Self(value)
    }
}

impl IntoIterator for Children {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<R: Into<Element>> BitOr<R> for Children {
    type Output = Children;

    fn bitor(mut self, rhs: R) -> Self::Output {
        self.push(rhs);
        self
    }
}

impl<R: Into<Element>> BitOr<R> for Element {
    type Output = Children;

    fn bitor(self, rhs: R) -> Self::Output {
        Children(vec![self, rhs.into()])
    }
}

impl<R: Into<Element>> BitOr<R> for ViewBuilder {
    type Output = Children;

    fn bitor(self, rhs: R) -> Self::Output {
        Children(vec![self.build(), rhs.into()])
    }
}
