use std::cmp::Ordering;
use std::collections::BTreeMap;

use tracing::info;

use crate::object::{ObjectId, TrackedObject};
use crate::Detection;

/// Ordering policy used to present tracked objects as target candidates.
///
/// `Ordering::Greater` means `a` ranks above `b`.
pub trait Ranking {
    fn compare(&self, a: &TrackedObject, b: &TrackedObject) -> Ordering;
}

/// Default policy: bigger blobs first.
#[derive(Debug, Default, Clone, Copy)]
pub struct SizeDescending;

impl Ranking for SizeDescending {
    #[inline]
    fn compare(&self, a: &TrackedObject, b: &TrackedObject) -> Ordering {
        a.size.partial_cmp(&b.size).unwrap_or(Ordering::Equal)
    }
}

/// Authoritative table of tracked identities.
///
/// Holds one record per identity plus the id list kept in descending rank
/// order. The list is always a permutation of the table's key set; rank
/// position is maintained by insertion, never by a full re-sort.
pub struct Registry {
    objects: BTreeMap<ObjectId, TrackedObject>,
    ordered: Vec<ObjectId>,
    next_id: ObjectId,
    ranking: Box<dyn Ranking>,
}

impl Registry {
    pub fn new(ranking: Box<dyn Ranking>) -> Self {
        Self {
            objects: BTreeMap::new(),
            ordered: Vec::new(),
            next_id: 1,
            ranking,
        }
    }

    /// Admit a detection as a brand-new identity and return its id.
    pub fn register(&mut self, det: &Detection) -> ObjectId {
        let id = self.next_id;
        self.next_id += 1;

        let obj = TrackedObject::new(id, det);

        let at = self
            .ordered
            .iter()
            .position(|other| self.ranking.compare(&self.objects[other], &obj) != Ordering::Greater)
            .unwrap_or(self.ordered.len());

        self.ordered.insert(at, id);
        self.objects.insert(id, obj);

        info!(id, x = det.x, y = det.y, z = det.z, size = det.size, "tracking new object");

        id
    }

    /// Remove an identity from the table and the ranked list.
    pub fn deregister(&mut self, id: ObjectId) -> Option<TrackedObject> {
        let obj = self.objects.remove(&id)?;

        if let Some(at) = self.ordered.iter().position(|&other| other == id) {
            self.ordered.remove(at);
        }

        Some(obj)
    }

    /// Claim the first unclaimed identity with a long enough match streak.
    ///
    /// Scans in ascending id order, sets the `claimed` flag and returns a
    /// copy. Each identity can be returned here at most once in its
    /// lifetime.
    pub fn claim_first(&mut self, min_streak: u32) -> Option<TrackedObject> {
        for obj in self.objects.values_mut() {
            if obj.match_streak >= min_streak && !obj.claimed {
                obj.claimed = true;
                return Some(*obj);
            }
        }

        None
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&TrackedObject> {
        self.objects.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut TrackedObject> {
        self.objects.get_mut(&id)
    }

    /// Current ids in descending rank order.
    #[inline]
    pub fn ranked_ids(&self) -> &[ObjectId] {
        &self.ordered
    }

    /// Objects in descending rank order.
    #[inline]
    pub fn ranked(&self) -> impl Iterator<Item = &TrackedObject> {
        self.ordered.iter().map(move |id| &self.objects[id])
    }

    /// Objects in ascending id order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &TrackedObject> {
        self.objects.values()
    }
}
