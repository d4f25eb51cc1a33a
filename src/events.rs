use std::cmp::Ordering;
use std::collections::BTreeMap;

use geo::{Coordinate, GeoFloat};
use slab::Slab;
use smallvec::SmallVec;

use crate::{segments::Segment, Error};

/// Wraps a [`Coordinate`] to support lexicographic ordering.
///
/// The ordering is by `x` and then by `y`. Implements `PartialOrd`,
/// `Ord` and `Eq` even though `Coordinate` doesn't implement these.
/// This is necessary to support insertion into ordered collections as
/// required by sweep algorithms.
///
/// Note that the trait impls exist even when `T` is not `Eq` or `Ord`.
/// We must ensure that any sweep point only contains values that can be
/// consistently ordered, which the finiteness check at construction
/// guarantees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint<T: GeoFloat>(Coordinate<T>);

impl<T: GeoFloat> SweepPoint<T> {
    /// The wrapped coordinate.
    #[inline]
    pub fn coord(&self) -> Coordinate<T> {
        self.0
    }
}

/// Implement lexicographic ordering by `x` and then by `y` coordinate.
impl<T: GeoFloat> PartialOrd for SweepPoint<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.0.x.partial_cmp(&other.0.x) {
            Some(Ordering::Equal) => self.0.y.partial_cmp(&other.0.y),
            o => o,
        }
    }
}

/// Derive `Ord` from `PartialOrd` and expect to not fail.
impl<T: GeoFloat> Ord for SweepPoint<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap()
    }
}

/// We derive `Eq` manually to not require `T: Eq`.
impl<T: GeoFloat> Eq for SweepPoint<T> {}

/// Create from `Coordinate` while checking the components are finite.
impl<T: GeoFloat> From<Coordinate<T>> for SweepPoint<T> {
    fn from(pt: Coordinate<T>) -> Self {
        assert!(
            pt.x.is_finite(),
            "sweep point requires a finite x-coordinate"
        );
        assert!(
            pt.y.is_finite(),
            "sweep point requires a finite y-coordinate"
        );
        SweepPoint(pt)
    }
}

/// Keys of the segments participating in an event, grouped by role.
type Keys = SmallVec<[usize; 4]>;

/// A coordinate at which the active-segment set changes.
///
/// An event aggregates, at one coordinate, the segments starting here
/// (`left`), ending here (`right`), crossing here without an end-point
/// (`inner`), and the vertical segments whose lower (`low`) or higher
/// (`high`) end-point is here. A segment occupies exactly one group
/// within a given event.
///
/// The `left`, `right` and `inner` groups are kept sorted under the
/// sweep order evaluated at this event's coordinate; that order is
/// stable because the coordinate is fixed. The vertical groups are
/// unordered.
#[derive(Debug, Clone)]
pub(crate) struct Event<T: GeoFloat> {
    point: SweepPoint<T>,
    pub(crate) left: Keys,
    pub(crate) right: Keys,
    pub(crate) inner: Keys,
    pub(crate) low: Keys,
    pub(crate) high: Keys,
}

impl<T: GeoFloat> Event<T> {
    fn new(point: SweepPoint<T>) -> Self {
        Event {
            point,
            left: Keys::new(),
            right: Keys::new(),
            inner: Keys::new(),
            low: Keys::new(),
            high: Keys::new(),
        }
    }

    #[inline]
    pub(crate) fn point(&self) -> SweepPoint<T> {
        self.point
    }

    /// Add a segment to the group matching its relation to this
    /// event's coordinate.
    pub(crate) fn add_segment(
        &mut self,
        key: usize,
        storage: &Slab<Segment<T>>,
    ) -> Result<(), Error> {
        let seg = &storage[key];
        let pt = self.point.coord();
        let x = pt.x;
        if seg.start() == pt {
            if seg.is_vertical() {
                self.low.push(key);
            } else {
                insert_sorted(&mut self.left, key, storage, x)?;
            }
        } else if seg.end() == pt {
            if seg.is_vertical() {
                self.high.push(key);
            } else {
                insert_sorted(&mut self.right, key, storage, x)?;
            }
        } else {
            insert_sorted(&mut self.inner, key, storage, x)?;
        }
        Ok(())
    }
}

/// Insert `key` into `keys` preserving the sweep order at `x`.
fn insert_sorted<T: GeoFloat>(
    keys: &mut Keys,
    key: usize,
    storage: &Slab<Segment<T>>,
    x: T,
) -> Result<(), Error> {
    let seg = &storage[key];
    let mut lo = 0;
    let mut hi = keys.len();
    while lo < hi {
        let mid = (lo + hi) / 2;
        match seg.order_at(&storage[keys[mid]], x)? {
            Ordering::Less => hi = mid,
            _ => lo = mid + 1,
        }
    }
    keys.insert(lo, key);
    Ok(())
}

/// A coordinate-ordered queue of [`Event`]s.
///
/// Backed by a single ordered map keyed on the event coordinate, which
/// provides both the extraction order (smallest coordinate first) and
/// the merge-or-create lookup needed when the sweep discovers a new
/// crossing at a coordinate that may already hold an event. The lookup
/// is O(log S) in the queue size rather than a hash map's O(1); float
/// coordinates are not hashable, and the sweep's overall bound is
/// dominated by the ordered operations anyway.
///
/// When computing the intersections of N segments the queue never holds
/// more than the 2N end-point events plus the crossing events
/// discovered so far.
#[derive(Debug)]
pub(crate) struct EventQueue<T: GeoFloat> {
    events: BTreeMap<SweepPoint<T>, Event<T>>,
}

impl<T: GeoFloat> EventQueue<T> {
    /// Build the initial queue from the end-points of all stored
    /// segments.
    pub(crate) fn new(storage: &Slab<Segment<T>>) -> Result<Self, Error> {
        let mut queue = EventQueue {
            events: BTreeMap::new(),
        };
        for (key, seg) in storage.iter() {
            queue
                .get_or_create(seg.start().into())
                .add_segment(key, storage)?;
            queue
                .get_or_create(seg.end().into())
                .add_segment(key, storage)?;
        }
        Ok(queue)
    }

    /// The event at `point`, created and enqueued if absent.
    pub(crate) fn get_or_create(&mut self, point: SweepPoint<T>) -> &mut Event<T> {
        self.events.entry(point).or_insert_with(|| Event::new(point))
    }

    /// Attach `key` to the `inner` group of the event at `point`,
    /// creating the event if needed.
    ///
    /// Fails with [`Error::EndpointNotInner`] when `point` is one of
    /// the segment's own end-points: a true end-point is not an inner
    /// crossing.
    pub(crate) fn add_intersecting_segment(
        &mut self,
        key: usize,
        point: SweepPoint<T>,
        storage: &Slab<Segment<T>>,
    ) -> Result<(), Error> {
        let seg = &storage[key];
        if point.coord() == seg.start() || point.coord() == seg.end() {
            return Err(Error::EndpointNotInner);
        }
        let event = self.get_or_create(point);
        if !event.inner.contains(&key) {
            event.add_segment(key, storage)?;
        }
        Ok(())
    }

    /// Extract and remove the minimum-coordinate event.
    pub(crate) fn next_event(&mut self) -> Option<Event<T>> {
        let point = *self.events.keys().next()?;
        self.events.remove(&point)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
