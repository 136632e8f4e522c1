//! Scalar sizes used by layout strategies.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    Pixel(f32),
    /// Stored as a fraction of the reference, so `percent(50.0)` holds `0.5`.
    Percentage(f32),
}

impl Quantity {
    pub const fn px(value: f32) -> Self {
        Self::Pixel(value)
    }

    pub const fn percent(value: f32) -> Self {
        Self::Percentage(value / 100.0)
    }

    pub fn resolve(self, reference: f32) -> f32 {
        match self {
            Self::Pixel(v) => v,
            Self::Percentage(v) => v * reference,
        }
    }

    pub fn resolve_px(self, reference: u32) -> u32 {
        self.resolve(reference as f32) as u32
    }
}

pub const fn px(value: f32) -> Quantity {
    Quantity::px(value)
}

pub const fn percent(value: f32) -> Quantity {
    Quantity::percent(value)
}

/// Literal-style constructors, `16.px()` and `50.percent()`.
pub trait Length {
    fn px(self) -> Quantity;
    fn percent(self) -> Quantity;
}

macro_rules! impl_length {
    ($($ty:ty),*) => {
        $(
            impl Length for $ty {
                fn px(self) -> Quantity {
                    Quantity::px(self as f32)
                }

                fn percent(self) -> Quantity {
                    Quantity::percent(self as f32)
                }
            }
        )*
    };
}

// One integer and one float impl so unsuffixed literals resolve.
impl_length!(i32, f64);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quantity2D {
    pub x: Option<Quantity>,
    pub y: Option<Quantity>,
}

impl Quantity2D {
    pub const fn new(x: Option<Quantity>, y: Option<Quantity>) -> Self {
        Self { x, y }
    }

    pub const fn both(x: Quantity, y: Quantity) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    pub const fn uniform(value: Quantity) -> Self {
        Self::both(value, value)
    }

    pub const fn x(mut self, x: Quantity) -> Self {
        self.x = Some(x);
        self
    }

    pub const fn y(mut self, y: Quantity) -> Self {
        self.y = Some(y);
        self
    }

    pub const fn unset() -> Self {
        Self { x: None, y: None }
    }
}
