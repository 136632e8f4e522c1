use smol_str::SmolStr;

use super::Color;
use super::shader::ShaderBuilder;
use super::uniform::{Uniform, UniformValue};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub corner_radius: f32,
    pub width: f32,
    pub color: Color,
}

impl Border {
    pub const fn new(corner_radius: f32, width: f32, color: Color) -> Self {
        Self {
            corner_radius,
            width,
            color,
        }
    }

    pub(crate) fn for_each_uniform(&self, visit: &mut dyn FnMut(Uniform)) {
        visit(Uniform {
            name: "corner_radius",
            value: UniformValue::Float(self.corner_radius),
        });
        visit(Uniform {
            name: "width",
            value: UniformValue::Float(self.width),
        });
        visit(Uniform {
            name: "color",
            value: UniformValue::Vec4(self.color.to_array()),
        });
    }

    pub(crate) fn emit(&self, n: u32, shader: &mut ShaderBuilder) {
        shader.helper(format!(
            "float border_sdf_{n}(vec2 p, vec2 b, float r) {{ vec2 q = abs(p) - b + vec2(r); \
             return min(max(q.x, q.y), 0.0) + length(max(q, vec2(0.0))) - r; }}"
        ));
        shader.body(format!(
            "float border_d_{n} = border_sdf_{n}((uv - vec2(0.5)) * dim, dim * 0.5, ubo.corner_radius_{n});"
        ));
        shader.body(format!(
            "float border_in_{n} = clamp(0.5 - border_d_{n}, 0.0, 1.0);"
        ));
        shader.body(format!(
            "float border_ring_{n} = border_in_{n} * clamp(border_d_{n} + ubo.width_{n} + 0.5, 0.0, 1.0);"
        ));
        if shader.painted() {
            shader.paint(format!(
                "outColor = vec4(mix(outColor.rgb, ubo.color_{n}.rgb, border_ring_{n} * ubo.color_{n}.a), outColor.a * border_in_{n});"
            ));
        } else {
            shader.paint(format!(
                "outColor = vec4(ubo.color_{n}.rgb, ubo.color_{n}.a * border_ring_{n});"
            ));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub from: Color,
    pub to: Color,
}

impl Gradient {
    pub const fn new(from: Color, to: Color) -> Self {
        Self { from, to }
    }

    pub(crate) fn for_each_uniform(&self, visit: &mut dyn FnMut(Uniform)) {
        visit(Uniform {
            name: "from",
            value: UniformValue::Vec4(self.from.to_array()),
        });
        visit(Uniform {
            name: "to",
            value: UniformValue::Vec4(self.to.to_array()),
        });
    }

    pub(crate) fn emit(&self, n: u32, shader: &mut ShaderBuilder) {
        shader.paint(format!("outColor = mix(ubo.from_{n}, ubo.to_{n}, uv.y);"));
    }
}

/// Samples a texture looked up by `image` in the backend's image store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageBackground {
    pub image: SmolStr,
}

impl ImageBackground {
    pub fn new(image: impl Into<SmolStr>) -> Self {
        Self {
            image: image.into(),
        }
    }

    pub(crate) fn emit(&self, n: u32, shader: &mut ShaderBuilder) {
        let binding = shader.take_texture_binding();
        shader.helper(format!(
            "layout(binding={binding}) uniform texture2D image_texture_{n};"
        ));
        shader.helper(format!(
            "layout(binding={}) uniform sampler image_sampler_{n};",
            binding + 1
        ));
        shader.helper(format!(
            "vec4 image_sample_{n}(vec2 p) {{ return texture(sampler2D(image_texture_{n}, image_sampler_{n}), p); }}"
        ));
        shader.body(format!("vec4 image_texel_{n} = image_sample_{n}(uv);"));
        if shader.painted() {
            shader.paint(format!(
                "outColor = vec4(mix(outColor.rgb, image_texel_{n}.rgb, image_texel_{n}.a), max(outColor.a, image_texel_{n}.a));"
            ));
        } else {
            shader.paint(format!("outColor = image_texel_{n};"));
        }
    }
}
