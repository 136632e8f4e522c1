#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::from_rgba_u32(0xffffffff);
    pub const BLACK: Self = Self::from_rgba_u32(0x000000ff);
    pub const RED: Self = Self::from_rgba_u32(0xff0000ff);
    pub const GREEN: Self = Self::from_rgba_u32(0x00ff00ff);
    pub const BLUE: Self = Self::from_rgba_u32(0x0000ffff);
    pub const TRANSPARENT: Self = Self::from_rgba_u32(0x00000000);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Unpacks `0xRRGGBBAA`, each channel scaled by 1/255.
    pub const fn from_rgba_u32(value: u32) -> Self {
        Self::rgba(
            (value >> 24) as u8,
            (value >> 16) as u8,
            (value >> 8) as u8,
            value as u8,
        )
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    pub fn hex(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix('#')?;
        let nibbles = digits
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()?;

        let [r, g, b, a] = match nibbles.as_slice() {
            [r, g, b] => [r * 17, g * 17, b * 17, 255],
            [r, g, b, a] => [r * 17, g * 17, b * 17, a * 17],
            [r1, r2, g1, g2, b1, b2] => [r1 << 4 | r2, g1 << 4 | g2, b1 << 4 | b2, 255],
            [r1, r2, g1, g2, b1, b2, a1, a2] => {
                [r1 << 4 | r2, g1 << 4 | g2, b1 << 4 | b2, a1 << 4 | a2]
            }
            _ => return None,
        };
        Some(Self::rgba(r, g, b, a))
    }

    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_wgpu_color(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self::from_rgba_u32(value)
    }
}

impl From<[f32; 4]> for Color {
    fn from(value: [f32; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}
