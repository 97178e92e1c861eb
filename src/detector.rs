use std::collections::VecDeque;

use serde_derive::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::Detection;

/// Source of per-frame detections.
///
/// The tracker never looks at pixels; whatever turns a frame into blob
/// centroids lives behind this trait.
pub trait Detector {
    type Frame;

    fn detect(&mut self, frame: &Self::Frame) -> Result<Vec<Detection>, Error>;
}

/// Boundary filter applied to raw detections before they reach the tracker.
///
/// Non-finite coordinates would poison the distance ordering, so they are
/// rejected here rather than inside the tracker.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BlobFilter {
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for BlobFilter {
    fn default() -> Self {
        Self {
            min_size: 0.0,
            max_size: f32::INFINITY,
        }
    }
}

impl BlobFilter {
    #[inline]
    pub fn accepts(&self, det: &Detection) -> bool {
        det.is_finite() && det.size >= self.min_size && det.size <= self.max_size
    }

    /// Drop non-finite and out-of-range detections in place.
    pub fn apply(&self, detections: &mut Vec<Detection>) {
        let before = detections.len();
        detections.retain(|det| self.accepts(det));

        if detections.len() < before {
            debug!(dropped = before - detections.len(), "filtered raw detections");
        }
    }
}

/// Replays prerecorded per-frame detection lists through the `Detector`
/// interface. Past the end of the recording every frame is empty.
pub struct ReplayDetector {
    frames: VecDeque<Vec<Detection>>,
    filter: BlobFilter,
}

impl ReplayDetector {
    pub fn new(frames: Vec<Vec<Detection>>) -> Self {
        Self::with_filter(frames, BlobFilter::default())
    }

    pub fn with_filter(frames: Vec<Vec<Detection>>, filter: BlobFilter) -> Self {
        Self {
            frames: frames.into(),
            filter,
        }
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Detector for ReplayDetector {
    type Frame = ();

    fn detect(&mut self, _frame: &()) -> Result<Vec<Detection>, Error> {
        let mut dets = self.frames.pop_front().unwrap_or_default();
        self.filter.apply(&mut dets);

        Ok(dets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_rejects_non_finite() {
        let filter = BlobFilter::default();

        assert!(filter.accepts(&Detection::new(1.0, 2.0, 3.0, 4.0)));
        assert!(!filter.accepts(&Detection::new(f32::NAN, 2.0, 3.0, 4.0)));
        assert!(!filter.accepts(&Detection::new(1.0, f32::INFINITY, 3.0, 4.0)));
        assert!(!filter.accepts(&Detection::new(1.0, 2.0, 3.0, f32::NAN)));
    }

    #[test]
    fn filter_enforces_size_range() {
        let filter = BlobFilter {
            min_size: 1.0,
            max_size: 10.0,
        };

        let mut dets = vec![
            Detection::new(0.0, 0.0, 0.0, 0.5),
            Detection::new(1.0, 0.0, 0.0, 5.0),
            Detection::new(2.0, 0.0, 0.0, 50.0),
        ];
        filter.apply(&mut dets);

        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].size, 5.0);
    }

    #[test]
    fn replay_yields_frames_then_empties() {
        let mut replay = ReplayDetector::new(vec![
            vec![Detection::new(0.0, 0.0, 0.0, 1.0)],
            vec![],
        ]);

        assert_eq!(replay.detect(&()).unwrap().len(), 1);
        assert_eq!(replay.detect(&()).unwrap().len(), 0);
        assert_eq!(replay.detect(&()).unwrap().len(), 0);
        assert_eq!(replay.remaining(), 0);
    }
}
