use crate::animation::Interpolatable;
use crate::platform::Bounds;

pub const MIN_EXTENT: f64 = 1.0;
pub const MIN_RADIUS: f64 = 0.0;

/// Shape of the notch: window size plus the bottom corner radius of its mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

impl Geometry {
    pub fn new(width: f64, height: f64, radius: f64) -> Self {
        Self {
            width,
            height,
            radius,
        }
    }

    /// Clamps to a drawable shape: at least 1x1 with a non-negative radius.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(MIN_EXTENT),
            height: self.height.max(MIN_EXTENT),
            radius: self.radius.max(MIN_RADIUS),
        }
    }

    /// Window frame for this geometry on `screen`: centered horizontally with the top
    /// edge flush against the top of the screen.
    pub fn anchored_frame(&self, screen: &Bounds) -> Bounds {
        let x = screen.min_x() + (screen.size.width - self.width) / 2.0;
        let y = screen.max_y() - self.height;
        Bounds::new(x, y, self.width, self.height)
    }
}

impl Interpolatable for Geometry {
    fn interpolate(&self, target: &Self, t: f64) -> Self {
        Geometry {
            width: self.width.interpolate(&target.width, t),
            height: self.height.interpolate(&target.height, t),
            radius: self.radius.interpolate(&target.radius, t),
        }
        .clamped()
    }
}
