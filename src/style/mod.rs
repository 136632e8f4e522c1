mod color;
mod fragment;
pub mod shader;
pub mod uniform;

use std::fmt;
use std::ops::BitOr;

use smol_str::SmolStr;

pub use color::*;
pub use fragment::*;
pub use shader::emit_shader;
pub use uniform::{
    Uniform, UniformField, UniformType, UniformValue, layout_size, uniform_fields, write,
};

use uniform::Uniform as FieldVisit;

/// A style composition tree. Leaves are the closed set of fragments;
/// `Combined` joins two subtrees left to right.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Style {
    #[default]
    Default,
    Border(Border),
    Gradient(Gradient),
    ImageBackground(ImageBackground),
    Combined(Box<Style>, Box<Style>),
}

impl Style {
    pub fn compose(left: impl Into<Style>, right: impl Into<Style>) -> Self {
        Self::Combined(Box::new(left.into()), Box::new(right.into()))
    }

    pub fn identity(&self) -> StyleIdentity {
        fn describe(style: &Style, out: &mut String) {
            match style {
                Style::Default => out.push_str("default"),
                Style::Border(_) => out.push_str("border"),
                Style::Gradient(_) => out.push_str("gradient"),
                Style::ImageBackground(_) => out.push_str("image"),
                Style::Combined(left, right) => {
                    out.push('(');
                    describe(left, out);
                    out.push('|');
                    describe(right, out);
                    out.push(')');
                }
            }
        }

        let mut out = String::new();
        describe(self, &mut out);
        StyleIdentity(SmolStr::new(out))
    }

    /// True when every leaf is `Default`, so there is nothing to draw.
    pub fn is_inert(&self) -> bool {
        match self {
            Self::Default => true,
            Self::Combined(left, right) => left.is_inert() && right.is_inert(),
            _ => false,
        }
    }

    /// Image keys of every `ImageBackground` leaf, in binding order.
    pub fn image_keys(&self) -> Vec<SmolStr> {
        fn collect(style: &Style, out: &mut Vec<SmolStr>) {
            match style {
                Style::ImageBackground(image) => out.push(image.image.clone()),
                Style::Combined(left, right) => {
                    collect(left, out);
                    collect(right, out);
                }
                _ => {}
            }
        }

        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }

    pub(crate) fn for_each_uniform(&self, visit: &mut dyn FnMut(FieldVisit)) {
        match self {
            Self::Border(border) => border.for_each_uniform(visit),
            Self::Gradient(gradient) => gradient.for_each_uniform(visit),
            Self::Default | Self::ImageBackground(_) => {}
            Self::Combined(left, right) => {
                left.for_each_uniform(visit);
                right.for_each_uniform(visit);
            }
        }
    }

    pub fn compile(&self) -> CompiledStyle {
        let compiled = CompiledStyle {
            identity: self.identity(),
            fragment_source: emit_shader(self),
            uniform_size: layout_size(self),
            image_count: self.image_keys().len(),
        };
        log::debug!(
            "compiled style {} ({} uniform bytes, {} images)",
            compiled.identity,
            compiled.uniform_size,
            compiled.image_count
        );
        compiled
    }
}

/// Structural shape of a style tree; field values do not participate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleIdentity(SmolStr);

impl StyleIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StyleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a backend needs to build the pipeline for one identity.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStyle {
    pub identity: StyleIdentity,
    pub fragment_source: String,
    pub uniform_size: usize,
    pub image_count: usize,
}

impl From<Border> for Style {
    fn from(value: Border) -> Self {
        Self::Border(value)
    }
}

impl From<Gradient> for Style {
    fn from(value: Gradient) -> Self {
        Self::Gradient(value)
    }
}

impl From<ImageBackground> for Style {
    fn from(value: ImageBackground) -> Self {
        Self::ImageBackground(value)
    }
}

impl<R: Into<Style>> BitOr<R> for Style {
    type Output = Style;

    fn bitor(self, rhs: R) -> Self::Output {
        Style::compose(self, rhs)
    }
}

macro_rules! impl_fragment_bitor {
    ($($fragment:ty),*) => {
        $(
            impl<R: Into<Style>> BitOr<R> for $fragment {
                type Output = Style;

                fn bitor(self, rhs: R) -> Self::Output {
                    Style::compose(self, rhs)
                }
            }
        )*
    };
}

impl_fragment_bitor!(Border, Gradient, ImageBackground);
