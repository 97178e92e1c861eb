use std::cmp::Ordering;

use ndarray::Array2;

use crate::metric::CentroidMetric;
use crate::object::{ObjectId, TrackedObject};
use crate::registry::Registry;
use crate::Detection;

/// Outcome of matching one frame's detections against the registry.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Correspondence {
    /// Identity matched to the detection at this index.
    pub matched: Vec<(ObjectId, usize)>,
    /// Identities with no detection within tolerance this frame.
    pub missed: Vec<ObjectId>,
    /// Detection indices no identity claimed; to be registered as new.
    pub fresh: Vec<usize>,
}

/// Greedy nearest-first assignment between tracked objects and detections.
///
/// Not globally optimal: a detection close to two identities goes to
/// whichever row wins the nearest-candidate ordering, traded for
/// O(m * n log n) simplicity.
pub struct Solver {
    metric: CentroidMetric,
    tolerance: f32,
}

impl Solver {
    pub fn new(metric: CentroidMetric, tolerance: f32) -> Self {
        Self { metric, tolerance }
    }

    pub fn solve(&self, registry: &Registry, detections: &[Detection]) -> Correspondence {
        let mut out = Correspondence::default();

        if detections.is_empty() {
            out.missed.extend(registry.ranked_ids());
            return out;
        }

        if registry.is_empty() {
            out.fresh.extend(0..detections.len());
            return out;
        }

        let objs: Vec<&TrackedObject> = registry.ranked().collect();
        let m = objs.len();
        let n = detections.len();

        let dist = Array2::from_shape_fn((m, n), |(i, j)| {
            let obj = objs[i];
            let det = &detections[j];

            self.metric
                .distance(&obj.position(), obj.size, &det.position(), det.size)
        });

        // Each row's candidate columns, nearest first. The sort is stable,
        // so ties keep input order.
        let mut cols: Vec<Vec<usize>> = (0..m).map(|_| (0..n).collect()).collect();
        for (i, row) in cols.iter_mut().enumerate() {
            row.sort_by(|&a, &b| cmp_dist(dist[[i, a]], dist[[i, b]]));
        }

        // Rows whose nearest candidate is closest claim detections first.
        let mut rows: Vec<usize> = (0..m).collect();
        rows.sort_by(|&a, &b| cmp_dist(dist[[a, cols[a][0]]], dist[[b, cols[b][0]]]));

        let mut used = vec![false; n];

        for &i in &rows {
            let claim = cols[i]
                .iter()
                .copied()
                .find(|&j| !used[j] && dist[[i, j]] < self.tolerance);

            match claim {
                Some(j) => {
                    used[j] = true;
                    out.matched.push((objs[i].id, j));
                }
                None => out.missed.push(objs[i].id),
            }
        }

        // Columns never claimed become new identities. Any row's ranking is
        // a permutation of all columns; the first row's decides the
        // registration order.
        for &j in &cols[0] {
            if !used[j] {
                out.fresh.push(j);
            }
        }

        out
    }
}

#[inline]
fn cmp_dist(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SizeDescending;

    fn solver(tolerance: f32) -> Solver {
        Solver::new(CentroidMetric::default(), tolerance)
    }

    fn registry_with(dets: &[Detection]) -> Registry {
        let mut reg = Registry::new(Box::new(SizeDescending));
        for det in dets {
            reg.register(det);
        }
        reg
    }

    #[test]
    fn empty_frame_misses_everything() {
        let reg = registry_with(&[
            Detection::new(0.0, 0.0, 0.0, 1.0),
            Detection::new(5.0, 0.0, 0.0, 2.0),
        ]);

        let out = solver(1.0).solve(&reg, &[]);
        assert!(out.matched.is_empty());
        assert!(out.fresh.is_empty());
        assert_eq!(out.missed.len(), 2);
    }

    #[test]
    fn empty_registry_registers_in_input_order() {
        let reg = Registry::new(Box::new(SizeDescending));
        let dets = [
            Detection::new(0.0, 0.0, 0.0, 1.0),
            Detection::new(5.0, 0.0, 0.0, 2.0),
            Detection::new(9.0, 0.0, 0.0, 3.0),
        ];

        let out = solver(1.0).solve(&reg, &dets);
        assert_eq!(out.fresh, vec![0, 1, 2]);
        assert!(out.matched.is_empty());
        assert!(out.missed.is_empty());
    }

    #[test]
    fn tolerance_is_strict() {
        let reg = registry_with(&[Detection::new(0.0, 0.0, 0.0, 1.0)]);

        // Exactly at tolerance: a miss, and the detection comes back fresh.
        let out = solver(1.0).solve(&reg, &[Detection::new(1.0, 0.0, 0.0, 1.0)]);
        assert!(out.matched.is_empty());
        assert_eq!(out.missed.len(), 1);
        assert_eq!(out.fresh, vec![0]);

        // Just inside: matched.
        let out = solver(1.0).solve(&reg, &[Detection::new(0.99, 0.0, 0.0, 1.0)]);
        assert_eq!(out.matched.len(), 1);
        assert!(out.fresh.is_empty());
    }

    #[test]
    fn closest_row_claims_contested_detection() {
        // Two objects, one detection between them but nearer the second.
        let reg = registry_with(&[
            Detection::new(0.0, 0.0, 0.0, 1.0),
            Detection::new(3.0, 0.0, 0.0, 1.0),
        ]);
        let ids: Vec<ObjectId> = reg.iter().map(|o| o.id).collect();

        let out = solver(5.0).solve(&reg, &[Detection::new(2.0, 0.0, 0.0, 1.0)]);

        assert_eq!(out.matched, vec![(ids[1], 0)]);
        assert_eq!(out.missed, vec![ids[0]]);
        assert!(out.fresh.is_empty());
    }

    #[test]
    fn displaced_row_falls_back_to_next_unused_column() {
        // Both objects are nearest to detection 0; the winner takes it and
        // the loser falls through to detection 1, which is still in
        // tolerance.
        let reg = registry_with(&[
            Detection::new(0.0, 0.0, 0.0, 1.0),
            Detection::new(0.6, 0.0, 0.0, 1.0),
        ]);
        let ids: Vec<ObjectId> = reg.iter().map(|o| o.id).collect();

        let dets = [
            Detection::new(0.1, 0.0, 0.0, 1.0),
            Detection::new(1.5, 0.0, 0.0, 1.0),
        ];
        let out = solver(2.0).solve(&reg, &dets);

        let mut matched = out.matched.clone();
        matched.sort();
        assert_eq!(matched, vec![(ids[0], 0), (ids[1], 1)]);
        assert!(out.missed.is_empty());
    }

    #[test]
    fn unclaimed_columns_come_back_fresh() {
        let reg = registry_with(&[Detection::new(0.0, 0.0, 0.0, 1.0)]);

        let dets = [
            Detection::new(0.1, 0.0, 0.0, 1.0),
            Detection::new(50.0, 0.0, 0.0, 2.0),
            Detection::new(80.0, 0.0, 0.0, 3.0),
        ];
        let out = solver(1.0).solve(&reg, &dets);

        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.fresh, vec![1, 2]);
    }
}
