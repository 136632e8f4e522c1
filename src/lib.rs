pub mod backend;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod quantity;
pub mod style;
pub mod ui;

pub use backend::{GpuBackend, HeadlessBackend, RenderContext, WgpuBackend};
pub use config::{RuntimeConfig, ShaderDebugFlags};
pub use error::{BackendError, Result, TauError};
pub use geometry::{BoxConstants, PixelBox};
pub use layout::{Block, Fixed, Flex, Layout};
pub use quantity::{Length, Quantity, Quantity2D, percent, px};
pub use style::{Border, Color, CompiledStyle, Gradient, ImageBackground, Style, StyleIdentity};
pub use ui::{Children, Component, Element, Leaf, UiRuntime, View, component, view};
