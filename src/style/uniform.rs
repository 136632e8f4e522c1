use super::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    Float,
    Vec4,
}

impl UniformType {
    pub const fn align(self) -> usize {
        match self {
            Self::Float => 4,
            Self::Vec4 => 16,
        }
    }

    pub const fn size(self) -> usize {
        match self {
            Self::Float => 4,
            Self::Vec4 => 16,
        }
    }

    pub const fn glsl(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Vec4 => "vec4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec4([f32; 4]),
}

impl UniformValue {
    pub const fn ty(self) -> UniformType {
        match self {
            Self::Float(_) => UniformType::Float,
            Self::Vec4(_) => UniformType::Vec4,
        }
    }
}

/// One field of a fragment's uniform block, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniform {
    pub name: &'static str,
    pub value: UniformValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformField {
    pub name: String,
    pub ty: UniformType,
    pub offset: usize,
}

pub(crate) const fn align_to(offset: usize, align: usize) -> usize {
    (offset + align - 1) / align * align
}

/// Byte cursor shared by `layout_size` and `write`.
#[derive(Debug, Default)]
struct UniformCursor {
    offset: usize,
}

impl UniformCursor {
    fn place(&mut self, ty: UniformType) -> usize {
        let at = align_to(self.offset, ty.align());
        self.offset = at + ty.size();
        at
    }
}

fn walk_uniforms(style: &Style, visit: &mut dyn FnMut(Uniform)) {
    match style {
        Style::Combined(left, right) => {
            walk_uniforms(left, visit);
            walk_uniforms(right, visit);
        }
        leaf => leaf.for_each_uniform(visit),
    }
}

pub fn layout_size(style: &Style) -> usize {
    let mut cursor = UniformCursor::default();
    walk_uniforms(style, &mut |uniform| {
        cursor.place(uniform.value.ty());
    });
    cursor.offset
}

/// Serializes the current field values and returns the final cursor.
///
/// # Panics
///
/// Panics when `buffer` is shorter than [`layout_size`].
pub fn write(style: &Style, buffer: &mut [u8]) -> usize {
    let mut cursor = UniformCursor::default();
    walk_uniforms(style, &mut |uniform| {
        let at = cursor.place(uniform.value.ty());
        match uniform.value {
            UniformValue::Float(v) => {
                buffer[at..at + 4].copy_from_slice(bytemuck::bytes_of(&v));
            }
            UniformValue::Vec4(v) => {
                buffer[at..at + 16].copy_from_slice(bytemuck::bytes_of(&v));
            }
        }
    });
    cursor.offset
}

/// Reflects the block: names carry the same ordinal suffixes as the
/// emitted declarations, offsets come from the write cursor.
pub fn uniform_fields(style: &Style) -> Vec<UniformField> {
    fn walk(
        style: &Style,
        ordinal: &mut u32,
        cursor: &mut UniformCursor,
        out: &mut Vec<UniformField>,
    ) {
        match style {
            Style::Combined(left, right) => {
                *ordinal += 1;
                walk(left, ordinal, cursor, out);
                walk(right, ordinal, cursor, out);
            }
            leaf => {
                let own = *ordinal;
                leaf.for_each_uniform(&mut |uniform| {
                    let ty = uniform.value.ty();
                    out.push(UniformField {
                        name: format!("{}_{own}", uniform.name),
                        ty,
                        offset: cursor.place(ty),
                    });
                });
                *ordinal += 1;
            }
        }
    }

    let mut out = Vec::new();
    walk(style, &mut 0, &mut UniformCursor::default(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Border, Color, Gradient};

    #[test]
    fn scalars_pack_and_vectors_realign() {
        let style = Style::from(Border::new(16.0, 4.0, Color::GREEN));
        let fields = uniform_fields(&style);
        let offsets: Vec<usize> = fields.iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 4, 16]);
        assert_eq!(layout_size(&style), 32);
    }

    #[test]
    fn vector_after_scalars_skips_to_next_sixteen() {
        let style = Border::new(1.0, 2.0, Color::RED) | Gradient::new(Color::RED, Color::BLUE);
        let offsets: Vec<usize> = uniform_fields(&style).iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 4, 16, 32, 48]);
        assert_eq!(layout_size(&style), 64);
    }

    #[test]
    fn default_leaves_occupy_nothing() {
        assert_eq!(layout_size(&Style::Default), 0);
        assert_eq!(layout_size(&(Style::Default | Style::Default)), 0);
        assert_eq!(write(&Style::Default, &mut []), 0);
    }

    #[test]
    fn write_places_values_at_reflected_offsets() {
        let style = Style::from(Border::new(16.0, 4.0, Color::GREEN));
        let mut buffer = vec![0xAAu8; layout_size(&style)];
        write(&style, &mut buffer);

        assert_eq!(&buffer[0..4], &16.0f32.to_ne_bytes());
        assert_eq!(&buffer[4..8], &4.0f32.to_ne_bytes());
        // padding between width and color is left untouched
        assert_eq!(&buffer[8..16], &[0xAA; 8]);
        assert_eq!(&buffer[16..20], &0.0f32.to_ne_bytes());
        assert_eq!(&buffer[20..24], &1.0f32.to_ne_bytes());
    }
}
