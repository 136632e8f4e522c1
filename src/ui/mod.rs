mod component;
mod element;
mod leaf;
mod runtime;
mod view;

pub use component::*;
pub use element::*;
pub use leaf::*;
pub use runtime::*;
pub use view::*;
