use serde_derive::{Deserialize, Serialize};

use nalgebra as na;

/// One frame's observation of a blob: centroid position and apparent size.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub size: f32,
}

impl Detection {
    #[inline]
    pub fn new(x: f32, y: f32, z: f32, size: f32) -> Self {
        Self { x, y, z, size }
    }

    #[inline(always)]
    pub fn position(&self) -> na::Point3<f32> {
        na::Point3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.size.is_finite()
    }
}
