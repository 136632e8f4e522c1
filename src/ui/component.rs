use std::any::{Any, TypeId};
use std::rc::Rc;

use super::{Element, next_node_id};
use crate::backend::RenderContext;
use crate::error::BackendError;
use crate::geometry::PixelBox;

trait ComponentState {
    fn build(&self) -> Element;
    fn props_mut(&mut self) -> &mut dyn Any;
}

struct Bound<P, F> {
    props: P,
    render: Rc<F>,
}

impl<P, F> ComponentState for Bound<P, F>
where
    P: 'static,
    F: Fn(&P) -> Element + 'static,
{
    fn build(&self) -> Element {
        (self.render)(&self.props)
    }

    fn props_mut(&mut self) -> &mut dyn Any {
        &mut self.props
    }
}

/// A deferred subtree. The render function runs on first use and its
/// result is kept until props change and [`Component::rerender`] is called.
pub struct Component {
    id: u64,
    tag: TypeId,
    state: Box<dyn ComponentState>,
    child: Option<Box<Element>>,
    generation: u64,
    built_generation: u64,
}

impl Component {
    pub fn new<P, F>(props: P, render: Rc<F>) -> Self
    where
        P: 'static,
        F: Fn(&P) -> Element + 'static,
    {
        Self {
            id: next_node_id(),
            tag: TypeId::of::<F>(),
            state: Box::new(Bound { props, render }),
            child: None,
            generation: 0,
            built_generation: 0,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Identity of the render function this component was created from.
    pub fn tag(&self) -> TypeId {
        self.tag
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_dirty(&self) -> bool {
        self.child.is_some() && self.generation > self.built_generation
    }

    pub fn child(&self) -> Option<&Element> {
        self.child.as_deref()
    }

    pub fn child_mut(&mut self) -> Option<&mut Element> {
        self.child.as_deref_mut()
    }

    /// Returns the cached subtree, invoking the render function only if
    /// nothing has been built yet.
    pub fn expand(&mut self) -> &mut Element {
        if self.child.is_none() {
            self.built_generation = self.generation;
        }
        let state = &self.state;
        self.child.get_or_insert_with(|| Box::new(state.build()))
    }

    /// Mutates the props in place and marks the component dirty. Returns
    /// false, leaving everything untouched, when `P` is not this
    /// component's props type.
    pub fn update_props<P: 'static>(&mut self, update: impl FnOnce(&mut P)) -> bool {
        let Some(props) = self.state.props_mut().downcast_mut::<P>() else {
            return false;
        };
        update(props);
        self.generation += 1;
        true
    }

    /// Rebuilds the child when props changed after it was built. A component
    /// that was never expanded is expanded here. Returns whether the render
    /// function ran.
    pub fn rerender(&mut self) -> bool {
        if self.child.is_some() && self.generation <= self.built_generation {
            return false;
        }
        log::trace!("component {} rebuilt at generation {}", self.id, self.generation);
        self.child = Some(Box::new(self.state.build()));
        self.built_generation = self.generation;
        true
    }

    pub fn bounds(&self) -> PixelBox {
        self.child().map(Element::bounds).unwrap_or_default()
    }

    pub fn content(&self) -> PixelBox {
        self.child().map(Element::content).unwrap_or_default()
    }

    pub fn layout(&mut self, available: PixelBox) -> PixelBox {
        self.expand().layout(available)
    }

    pub fn render(&mut self, ctx: &mut RenderContext<'_>) -> Result<(), BackendError> {
        self.expand().render(ctx)
    }
}

/// Turns a render function into a factory of component elements sharing it.
pub fn component<P, F>(render: F) -> impl Fn(P) -> Element
where
    P: 'static,
    F: Fn(&P) -> Element + 'static,
{
    let render = Rc::new(render);
    move |props| Element::Component(Component::new(props, Rc::clone(&render)))
}
