use std::fmt::Write as _;

use super::Style;

pub const SHADER_HEADER: &str = "#version 450\n\
layout(location=0) out vec4 outColor;\n\
layout(location=0) in vec2 uv;\n\
layout(location=1) in vec2 dim;\n";

/// Texture/sampler pairs start right after the uniform block at binding 0.
pub const FIRST_TEXTURE_BINDING: u32 = 1;

/// Accumulates the three sections of a fragment shader during one traversal.
#[derive(Debug)]
pub struct ShaderBuilder {
    ordinal: u32,
    texture_binding: u32,
    painted: bool,
    fields: Vec<String>,
    helpers: Vec<String>,
    body: Vec<String>,
}

impl Default for ShaderBuilder {
    fn default() -> Self {
        Self {
            ordinal: 0,
            texture_binding: FIRST_TEXTURE_BINDING,
            painted: false,
            fields: Vec::new(),
            helpers: Vec::new(),
            body: Vec::new(),
        }
    }
}

impl ShaderBuilder {
    fn next_ordinal(&mut self) -> u32 {
        let ordinal = self.ordinal;
        self.ordinal += 1;
        ordinal
    }

    pub(crate) fn helper(&mut self, source: String) {
        self.helpers.push(source);
    }

    pub(crate) fn body(&mut self, statement: String) {
        self.body.push(statement);
    }

    /// Whether an earlier leaf has already assigned `outColor`.
    pub(crate) fn painted(&self) -> bool {
        self.painted
    }

    /// Pushes a statement that assigns `outColor`.
    pub(crate) fn paint(&mut self, statement: String) {
        self.painted = true;
        self.body.push(statement);
    }

    pub(crate) fn take_texture_binding(&mut self) -> u32 {
        let binding = self.texture_binding;
        self.texture_binding += 2;
        binding
    }

    fn visit(&mut self, style: &Style) {
        match style {
            Style::Combined(left, right) => {
                // Composites burn an ordinal that never names a field.
                self.next_ordinal();
                self.visit(left);
                self.visit(right);
            }
            leaf => {
                let n = self.ordinal;
                match leaf {
                    Style::Border(border) => border.emit(n, self),
                    Style::Gradient(gradient) => gradient.emit(n, self),
                    Style::ImageBackground(image) => image.emit(n, self),
                    Style::Default | Style::Combined(..) => {}
                }
                let mut fields = Vec::new();
                leaf.for_each_uniform(&mut |uniform| {
                    fields.push(format!("{} {}_{n};", uniform.value.ty().glsl(), uniform.name));
                });
                self.fields.extend(fields);
                self.next_ordinal();
            }
        }
    }

    fn finish(self) -> String {
        let mut source = String::from(SHADER_HEADER);
        let _ = writeln!(
            source,
            "layout(binding=0) uniform UBO {{ {} }} ubo;",
            self.fields.join(" ")
        );
        for helper in &self.helpers {
            source.push_str(helper);
            source.push('\n');
        }
        let _ = writeln!(source, "void main() {{ {} }}", self.body.join(" "));
        source
    }
}

pub fn emit_shader(style: &Style) -> String {
    let mut builder = ShaderBuilder::default();
    builder.visit(style);
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Border, Color, Gradient, ImageBackground};

    fn ubo_line(source: &str) -> &str {
        source
            .lines()
            .find(|line| line.starts_with("layout(binding=0) uniform UBO"))
            .expect("shader declares the uniform block")
    }

    #[test]
    fn follows_the_fixed_template() {
        let source = emit_shader(&Style::from(Gradient::new(Color::RED, Color::BLUE)));
        let lines: Vec<&str> = source.lines().collect();
        assert_eq!(lines[0], "#version 450");
        assert_eq!(lines[1], "layout(location=0) out vec4 outColor;");
        assert_eq!(lines[2], "layout(location=0) in vec2 uv;");
        assert_eq!(lines[3], "layout(location=1) in vec2 dim;");
        assert_eq!(
            lines[4],
            "layout(binding=0) uniform UBO { vec4 from_0; vec4 to_0; } ubo;"
        );
        assert_eq!(
            lines.last().copied(),
            Some("void main() { outColor = mix(ubo.from_0, ubo.to_0, uv.y); }")
        );
    }

    #[test]
    fn composite_consumes_an_ordinal_before_its_children() {
        let style = Gradient::new(Color::RED, Color::BLUE) | Border::new(16.0, 4.0, Color::GREEN);
        let source = emit_shader(&style);
        assert_eq!(
            ubo_line(&source),
            "layout(binding=0) uniform UBO { vec4 from_1; vec4 to_1; float corner_radius_2; \
             float width_2; vec4 color_2; } ubo;"
        );
        assert!(!source.contains("_0;"));
    }

    #[test]
    fn nested_composites_skip_one_ordinal_each() {
        let style = (Style::from(Gradient::new(Color::RED, Color::BLUE)) | Style::Default)
            | Border::new(1.0, 1.0, Color::WHITE);
        // ((gradient | default) | border): 0 root, 1 inner, 2 gradient, 3 default, 4 border
        let source = emit_shader(&style);
        assert!(ubo_line(&source).contains("vec4 from_2;"));
        assert!(ubo_line(&source).contains("float corner_radius_4;"));
    }

    #[test]
    fn repeated_leaves_emit_their_own_helpers() {
        let style = Border::new(4.0, 1.0, Color::RED) | Border::new(8.0, 2.0, Color::BLUE);
        let source = emit_shader(&style);
        assert!(source.contains("float border_sdf_1(vec2 p"));
        assert!(source.contains("float border_sdf_2(vec2 p"));
        assert_eq!(source.matches("return min(max(q.x, q.y), 0.0)").count(), 2);
    }

    #[test]
    fn image_backgrounds_take_consecutive_binding_pairs() {
        let style = ImageBackground::new("a.png") | ImageBackground::new("b.png");
        let source = emit_shader(&style);
        assert!(source.contains("layout(binding=1) uniform texture2D image_texture_1;"));
        assert!(source.contains("layout(binding=2) uniform sampler image_sampler_1;"));
        assert!(source.contains("layout(binding=3) uniform texture2D image_texture_2;"));
        assert!(source.contains("layout(binding=4) uniform sampler image_sampler_2;"));
        assert_eq!(ubo_line(&source), "layout(binding=0) uniform UBO {  } ubo;");
    }

    #[test]
    fn first_painting_leaf_does_not_read_the_output() {
        let lone = emit_shader(&Style::from(Border::new(4.0, 1.0, Color::RED)));
        let main = lone.lines().last().unwrap();
        assert!(!main.contains("outColor.rgb"));
        assert!(main.contains("outColor = vec4(ubo.color_0.rgb, ubo.color_0.a * border_ring_0);"));

        let layered = emit_shader(
            &(Style::from(Gradient::new(Color::RED, Color::BLUE)) | Border::new(4.0, 1.0, Color::RED)),
        );
        let main = layered.lines().last().unwrap();
        assert!(main.contains("mix(outColor.rgb, ubo.color_2.rgb"));

        let image = emit_shader(&(Style::Default | ImageBackground::new("a.png")));
        let main = image.lines().last().unwrap();
        assert!(main.ends_with("outColor = image_texel_2; }"));
    }

    #[test]
    fn default_contributes_no_text() {
        let source = emit_shader(&Style::Default);
        assert!(source.ends_with("void main() {  }\n"));
    }
}
