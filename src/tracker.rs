use serde_derive::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::metric::CentroidMetric;
use crate::object::{ObjectId, TrackedObject};
use crate::registry::{Ranking, Registry, SizeDescending};
use crate::solver::Solver;
use crate::Detection;

/// Tracker construction parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum metric distance for a detection to refresh an identity.
    /// Same units as the detection coordinates.
    pub distance_tolerance: f32,

    /// Consecutive missed frames tolerated before an identity is dropped.
    pub max_disappeared_frames: u32,

    /// Consecutive matched frames required before an identity becomes
    /// eligible for `top_valid`.
    pub min_valid_frame_count: u32,

    /// Weight of the size difference in the matching distance. Zero keeps
    /// size out of the metric.
    pub size_weight: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            distance_tolerance: 1.0,
            max_disappeared_frames: 10,
            min_valid_frame_count: 5,
            size_weight: 0.0,
        }
    }
}

/// Assigns persistent identities to per-frame detections and selects
/// targets for downstream action.
///
/// Single-threaded, no internal locking; callers invoking from multiple
/// threads must serialize access themselves.
pub struct Tracker {
    config: TrackerConfig,
    solver: Solver,
    registry: Registry,
}

impl Tracker {
    /// Build a tracker ranking objects by descending size.
    pub fn new(config: TrackerConfig) -> Result<Self, Error> {
        Self::with_ranking(config, Box::new(SizeDescending))
    }

    /// Build a tracker with an injected ranking policy.
    pub fn with_ranking(config: TrackerConfig, ranking: Box<dyn Ranking>) -> Result<Self, Error> {
        if !config.distance_tolerance.is_finite() || config.distance_tolerance <= 0.0 {
            return Err(Error::InvalidConfig(
                "distance_tolerance must be positive and finite".into(),
            ));
        }

        if !config.size_weight.is_finite() || config.size_weight < 0.0 {
            return Err(Error::InvalidConfig(
                "size_weight must be non-negative and finite".into(),
            ));
        }

        let metric = CentroidMetric {
            size_weight: config.size_weight,
        };

        Ok(Self {
            solver: Solver::new(metric, config.distance_tolerance),
            registry: Registry::new(ranking),
            config,
        })
    }

    /// Ingest one frame's detections.
    ///
    /// Runs the assignment, refreshes matched identities, ages missed
    /// ones, registers leftovers as new, then drops every identity that
    /// has been missing longer than the configured tolerance.
    pub fn update(&mut self, detections: &[Detection]) {
        let correspondence = self.solver.solve(&self.registry, detections);

        for (id, j) in correspondence.matched {
            if let Some(obj) = self.registry.get_mut(id) {
                obj.absorb(&detections[j]);
            }
        }

        for id in correspondence.missed {
            if let Some(obj) = self.registry.get_mut(id) {
                obj.miss();
            }
        }

        if self.registry.is_empty() && !correspondence.fresh.is_empty() {
            debug!("no current objects, registering every detection");
        }

        for j in correspondence.fresh {
            self.registry.register(&detections[j]);
        }

        self.cleanup();
    }

    fn cleanup(&mut self) {
        let expired: Vec<ObjectId> = self
            .registry
            .iter()
            .filter(|obj| obj.disappeared_frames > self.config.max_disappeared_frames)
            .map(|obj| obj.id)
            .collect();

        for id in expired {
            if let Some(obj) = self.registry.deregister(id) {
                debug!(id, missed = obj.disappeared_frames, "dropping object out of scope");
            }
        }
    }

    /// All tracked objects in descending rank order.
    pub fn active_objects(&self) -> Vec<TrackedObject> {
        self.registry.ranked().copied().collect()
    }

    /// Number of currently tracked identities.
    #[inline]
    pub fn count(&self) -> usize {
        self.registry.len()
    }

    /// The highest-ranked identity, regardless of eligibility.
    pub fn top(&self) -> Option<TrackedObject> {
        self.registry.ranked().next().copied()
    }

    /// The next target: the first identity (ascending id order) with a
    /// long enough match streak that has not been handed out before.
    ///
    /// Consuming read: the returned identity is flagged as claimed and
    /// will never be returned here again.
    pub fn top_valid(&mut self) -> Option<TrackedObject> {
        self.registry.claim_first(self.config.min_valid_frame_count)
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }
}
