use nalgebra as na;

use crate::Float;

/// Euclidean distance between two centroid positions.
pub fn euclidean<T: Float>(a: &na::Point3<T>, b: &na::Point3<T>) -> T {
    let d = b - a;

    (d.x * d.x + d.y * d.y + d.z * d.z).sqrt()
}

/// Euclidean distance with the size difference mixed in under `weight`.
pub fn size_weighted<T: Float>(
    a: &na::Point3<T>,
    size_a: T,
    b: &na::Point3<T>,
    size_b: T,
    weight: T,
) -> T {
    let d = b - a;
    let ds = size_b - size_a;

    (d.x * d.x + d.y * d.y + d.z * d.z + weight * ds * ds).sqrt()
}

/// Matching metric between a tracked position and a detection.
///
/// `size_weight == 0.0` keeps size out of the comparison entirely, so a
/// shrinking blob still matches as long as its centroid stays put.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentroidMetric {
    pub size_weight: f32,
}

impl Default for CentroidMetric {
    fn default() -> Self {
        Self { size_weight: 0.0 }
    }
}

impl CentroidMetric {
    #[inline]
    pub fn distance(&self, a: &na::Point3<f32>, size_a: f32, b: &na::Point3<f32>, size_b: f32) -> f32 {
        if self.size_weight == 0.0 {
            euclidean(a, b)
        } else {
            size_weighted(a, size_a, b, size_b, self.size_weight)
        }
    }
}
