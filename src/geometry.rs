use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PixelBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBox {
    pub const fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub const fn zero_at(left: u32, top: u32) -> Self {
        Self::new(left, top, 0, 0)
    }

    pub const fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    /// Moves the origin by `(dx, dy)` and shrinks the extent by twice that amount.
    pub const fn inset(self, dx: u32, dy: u32) -> Self {
        Self {
            left: self.left.saturating_add(dx),
            top: self.top.saturating_add(dy),
            width: self.width.saturating_sub(dx.saturating_mul(2)),
            height: self.height.saturating_sub(dy.saturating_mul(2)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Maps the box onto the unit quad in normalized device coordinates:
    /// `position` is the quad center and `scale` its half extent.
    pub fn normalized(&self, viewport: (u32, u32)) -> ([f32; 2], [f32; 2]) {
        let extent = Vec2::new(viewport.0.max(1) as f32, viewport.1.max(1) as f32);
        let origin = Vec2::new(self.left as f32, self.top as f32);
        let size = Vec2::new(self.width as f32, self.height as f32);

        let scale = size / extent;
        let position = Vec2::splat(-1.0) + 2.0 * origin / extent + scale;
        (position.to_array(), scale.to_array())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C, align(16))]
pub struct BoxConstants {
    pub position: [f32; 2],
    pub scale: [f32; 2],
    pub dimensions: [i32; 2],
    _pad: [i32; 2],
}

impl BoxConstants {
    pub fn for_content(content: PixelBox, viewport: (u32, u32)) -> Self {
        let (position, scale) = content.normalized(viewport);
        Self {
            position,
            scale,
            dimensions: [viewport.0 as i32, viewport.1 as i32],
            _pad: [0; 2],
        }
    }
}
