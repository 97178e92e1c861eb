use serde_derive::{Deserialize, Serialize};

use nalgebra as na;

use crate::Detection;

/// Identifier of a tracked object. Assigned sequentially, never reused.
pub type ObjectId = u32;

/// Persistent state carried across frames for one identity.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TrackedObject {
    pub id: ObjectId,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub size: f32,

    /// Consecutive frames this object has gone unmatched.
    pub disappeared_frames: u32,

    /// Consecutive frames this object has been matched since its last miss.
    pub match_streak: u32,

    /// Set once the object has been handed out as a target. Never cleared.
    pub claimed: bool,
}

impl TrackedObject {
    pub(crate) fn new(id: ObjectId, det: &Detection) -> Self {
        Self {
            id,
            x: det.x,
            y: det.y,
            z: det.z,
            size: det.size,
            disappeared_frames: 0,
            match_streak: 1,
            claimed: false,
        }
    }

    /// Refresh position and size from a matched detection.
    ///
    /// Does not touch `disappeared_frames`: a re-found object keeps the
    /// count it accumulated while missing.
    #[inline]
    pub(crate) fn absorb(&mut self, det: &Detection) {
        self.x = det.x;
        self.y = det.y;
        self.z = det.z;
        self.size = det.size;
        self.match_streak += 1;
    }

    #[inline]
    pub(crate) fn miss(&mut self) {
        self.disappeared_frames += 1;
        self.match_streak = 0;
    }

    #[inline(always)]
    pub fn position(&self) -> na::Point3<f32> {
        na::Point3::new(self.x, self.y, self.z)
    }
}
