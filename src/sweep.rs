use std::cmp::Ordering;

use geo::GeoFloat;
use itertools::{iproduct, Itertools};
use log::{debug, trace};
use slab::Slab;

use crate::{
    crossings::Crossing,
    events::{Event, EventQueue, SweepPoint},
    segments::{Intersection, Segment},
    sweep_line::SweepLine,
    Error,
};

/// One run of the sweep over a set of segments.
///
/// Holds the segment storage, the pending events, the ordered active
/// set and the set of vertical segments currently being swept. Consumed
/// by [`run`].
///
/// Each event is handled in five phases: vertical lower end-points
/// first, then right end-points, inner crossings, left end-points, and
/// vertical upper end-points last. The phase order guarantees that a
/// vertical segment stays in the vertical set for the whole x-range it
/// spans and that neighbor probes see the post-event active set.
///
/// [`run`]: Sweep::run
pub(crate) struct Sweep<T: GeoFloat> {
    storage: Slab<Segment<T>>,
    queue: EventQueue<T>,
    sweep_line: SweepLine<T>,
    verticals: Vec<usize>,
}

impl<T: GeoFloat> Sweep<T> {
    pub(crate) fn new<I>(iter: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Segment<T>>,
    {
        let iter = iter.into_iter();
        let size = {
            let (min, max) = iter.size_hint();
            max.unwrap_or(min)
        };
        let mut storage = Slab::with_capacity(size);
        for seg in iter {
            storage.insert(seg);
        }
        let queue = EventQueue::new(&storage)?;
        Ok(Sweep {
            storage,
            queue,
            sweep_line: SweepLine::new(),
            verticals: Vec::new(),
        })
    }

    /// Sweep left to right, reporting each pairwise intersection
    /// exactly once.
    pub(crate) fn run(mut self) -> Result<Vec<Crossing<T>>, Error> {
        let mut output = Vec::new();
        while let Some(event) = self.queue.next_event() {
            self.handle_event(event, &mut output)?;
        }
        Ok(output)
    }

    fn handle_event(&mut self, event: Event<T>, out: &mut Vec<Crossing<T>>) -> Result<(), Error> {
        let pt = event.point();
        let x = pt.coord().x;
        debug!("handling event: {:?}", pt.coord());
        self.sweep_line.set_current_x(x);

        // Vertical segments starting here intersect the verticals
        // already being swept and every active segment within their
        // y-span.
        for &key in &event.low {
            let seg = self.storage[key];
            let mut others = self.verticals.clone();
            others.extend(self.sweep_line.between_y(
                seg.start().y,
                seg.end().y,
                seg.start().x,
                &self.storage,
            )?);
            for other in others {
                self.record(key, other, out);
            }
            self.verticals.push(key);
        }

        // Segments ending here intersect everything else meeting at
        // this coordinate. After their removal the segments bounding
        // the vacated gap become adjacent and are probed for a future
        // crossing.
        if !event.right.is_empty() {
            for (&a, &b) in iproduct!(&event.right, &event.left) {
                self.record_point(a, b, out);
            }
            for (&a, &b) in event.right.iter().tuple_combinations() {
                self.record_point(a, b, out);
            }
            for (&a, &b) in iproduct!(&event.right, &event.inner) {
                self.record_point(a, b, out);
            }
            // Converging segments sit in reverse gradient order just
            // left of their shared end-point, so the block's outside
            // neighbors are above the first and below the last group
            // member.
            let below = event.right.last().and_then(|&k| self.sweep_line.below(k));
            let above = event.right.first().and_then(|&k| self.sweep_line.above(k));
            for &key in &event.right {
                self.sweep_line.remove(key);
            }
            if let (Some(lo), Some(hi)) = (below, above) {
                self.schedule_if_crossing(lo, hi, pt)?;
            }
        }

        // Segments crossing here intersect each other and the segments
        // starting here; their order in the active set flips.
        for (&a, &b) in iproduct!(&event.inner, &event.left) {
            self.record(a, b, out);
        }
        for (&a, &b) in event.inner.iter().tuple_combinations() {
            self.record_point(a, b, out);
        }
        if !event.inner.is_empty() {
            self.sweep_line.revert_order(x, &event.inner);
        }

        // Segments starting here enter the active set. They intersect
        // the verticals being swept and each other.
        for (i, &key) in event.left.iter().enumerate() {
            self.sweep_line.add(key, &self.storage)?;
            for &other in &self.verticals {
                self.record(key, other, out);
            }
            for &other in &event.left[i + 1..] {
                self.record(key, other, out);
            }
        }

        // An active segment can pass through this coordinate without an
        // end-point or a scheduled crossing here. No group covers it,
        // yet it meets every segment starting here: a touch at the
        // entrant's start, or a collinear overlap that no crossing
        // event will ever report.
        if let Some(&anchor) = event.left.first() {
            for passer in self.meeting_at(anchor, &event, pt) {
                for &key in &event.left {
                    self.record(key, passer, out);
                }
            }
        }

        // The extremal entrants may cross their new neighbors further
        // right; probe the groups that just became adjacent.
        let greatest = self.extremal(event.left.last(), event.inner.last(), x, Ordering::Greater)?;
        if let Some(top) = greatest {
            let level = self.sweep_line.same_level_as(top, &self.storage)?;
            let above = self.sweep_line.above_segments(top, &self.storage)?;
            for (&a, &b) in iproduct!(&level, &above) {
                self.schedule_if_crossing(a, b, pt)?;
            }
        }
        let smallest = self.extremal(event.left.first(), event.inner.first(), x, Ordering::Less)?;
        if let Some(bottom) = smallest {
            let level = self.sweep_line.same_level_as(bottom, &self.storage)?;
            let below = self.sweep_line.below_segments(bottom, &self.storage)?;
            for (&a, &b) in iproduct!(&level, &below) {
                self.schedule_if_crossing(a, b, pt)?;
            }
        }

        // Vertical segments ending here leave the vertical set.
        for &key in &event.high {
            self.verticals.retain(|&k| k != key);
        }
        Ok(())
    }

    /// Pick, of the two candidate keys, the one whose segment compares
    /// as `extreme` at `x`.
    fn extremal(
        &self,
        left: Option<&usize>,
        inner: Option<&usize>,
        x: T,
        extreme: Ordering,
    ) -> Result<Option<usize>, Error> {
        Ok(match (left, inner) {
            (Some(&l), Some(&i)) => {
                if self.storage[l].order_at(&self.storage[i], x)? == extreme {
                    Some(l)
                } else {
                    Some(i)
                }
            }
            (Some(&l), None) => Some(l),
            (None, Some(&i)) => Some(i),
            (None, None) => None,
        })
    }

    /// Report the intersection of two segments known to meet at the
    /// event being handled.
    fn record(&self, first: usize, second: usize, out: &mut Vec<Crossing<T>>) {
        let s1 = self.storage[first];
        let s2 = self.storage[second];
        if let Some(geom) = s1.intersection_with(&s2) {
            debug!("crossing: {:?} x {:?}", s1, s2);
            out.push(Crossing {
                first: s1,
                second: s2,
                geom,
            });
        }
    }

    /// As [`record`], but only for point intersections. A collinear
    /// overlap between two segments meeting at an event was already
    /// reported when the later of the two entered the active set.
    ///
    /// [`record`]: Sweep::record
    fn record_point(&self, first: usize, second: usize, out: &mut Vec<Crossing<T>>) {
        let s1 = self.storage[first];
        let s2 = self.storage[second];
        if let Some(geom @ Intersection::Point(_)) = s1.intersection_with(&s2) {
            debug!("crossing: {:?} x {:?}", s1, s2);
            out.push(Crossing {
                first: s1,
                second: s2,
                geom,
            });
        }
    }

    /// Active segments passing through `at` that belong to none of the
    /// event's groups.
    ///
    /// Such segments sit at the event's level in the active set,
    /// contiguous with the entrants, so walking outward from one
    /// entrant until the level ends finds them all. Group members
    /// encountered on the way are skipped, not collected.
    fn meeting_at(&self, anchor: usize, event: &Event<T>, at: SweepPoint<T>) -> Vec<usize> {
        // The anchor goes first so the interpolated crossing lands
        // exactly on its end-point when the meeting happens there.
        let anchor_seg = self.storage[anchor];
        let meets = |seg: &Segment<T>| match anchor_seg.intersection_with(seg) {
            Some(Intersection::Point(p)) => p == at.coord(),
            Some(Intersection::Overlap(_)) => true,
            None => false,
        };
        let mut found = Vec::new();
        let mut cursor = anchor;
        while let Some(key) = self.sweep_line.below(cursor) {
            cursor = key;
            if event.left.contains(&key) || event.inner.contains(&key) {
                continue;
            }
            if meets(&self.storage[key]) {
                found.push(key);
            } else {
                break;
            }
        }
        cursor = anchor;
        while let Some(key) = self.sweep_line.above(cursor) {
            cursor = key;
            if event.left.contains(&key) || event.inner.contains(&key) {
                continue;
            }
            if meets(&self.storage[key]) {
                found.push(key);
            } else {
                break;
            }
        }
        found
    }

    /// Schedule the crossing of a pair of newly adjacent segments.
    /// Only a crossing strictly ahead of the sweep can be new here;
    /// anything at the current coordinate is covered by the event's
    /// own records.
    fn schedule_if_crossing(
        &mut self,
        first: usize,
        second: usize,
        at: SweepPoint<T>,
    ) -> Result<(), Error> {
        let s1 = self.storage[first];
        let s2 = self.storage[second];
        if let Some(Intersection::Point(p)) = s1.intersection_with(&s2) {
            if SweepPoint::from(p) > at {
                debug!("scheduling crossing at {:?}", p);
                if p != s1.start() && p != s1.end() {
                    self.queue.add_intersecting_segment(first, p.into(), &self.storage)?;
                }
                if p != s2.start() && p != s2.end() {
                    self.queue.add_intersecting_segment(second, p.into(), &self.storage)?;
                }
            } else {
                trace!("ignoring already-swept crossing at {:?}", p);
            }
        }
        Ok(())
    }
}
