use geo::GeoFloat;
use slab::Slab;

use crate::{segments::Segment, Error};

/// The ordered set of non-vertical segments currently intersecting the
/// sweep line.
///
/// Keys index into the segment slab. The ordering of the keys is the
/// sweep order of their segments and is only valid at the current sweep
/// position: when segments cross, their order is corrected in place via
/// [`revert_order`] rather than by re-sorting. A comparator-backed tree
/// cannot express that repositioning, so the line is a position-indexed
/// vector with binary-search insertion.
///
/// Two overlapping segments are at the same level; nothing can be
/// assumed about their relative order.
///
/// [`revert_order`]: SweepLine::revert_order
#[derive(Debug)]
pub(crate) struct SweepLine<T: GeoFloat> {
    keys: Vec<usize>,
    current_x: T,
}

impl<T: GeoFloat> SweepLine<T> {
    pub(crate) fn new() -> Self {
        SweepLine {
            keys: Vec::new(),
            current_x: T::zero(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub(crate) fn set_current_x(&mut self, x: T) {
        self.current_x = x;
    }

    fn index_of(&self, key: usize) -> usize {
        self.keys
            .iter()
            .position(|&k| k == key)
            .expect("segment not in sweep line")
    }

    /// Insert `key` at its sweep-ordered position. The sweep position
    /// moves to the segment's start.
    pub(crate) fn add(&mut self, key: usize, storage: &Slab<Segment<T>>) -> Result<(), Error> {
        let seg = &storage[key];
        self.current_x = seg.start().x;
        let mut lo = 0;
        let mut hi = self.keys.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            match seg.order_at(&storage[self.keys[mid]], self.current_x)? {
                std::cmp::Ordering::Less => hi = mid,
                _ => lo = mid + 1,
            }
        }
        self.keys.insert(lo, key);
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: usize) {
        let i = self.index_of(key);
        self.keys.remove(i);
    }

    /// The key directly below `key` in the current order, if any.
    pub(crate) fn below(&self, key: usize) -> Option<usize> {
        let i = self.index_of(key);
        if i > 0 {
            Some(self.keys[i - 1])
        } else {
            None
        }
    }

    /// The key directly above `key` in the current order, if any.
    pub(crate) fn above(&self, key: usize) -> Option<usize> {
        self.keys.get(self.index_of(key) + 1).copied()
    }

    /// The segment group directly below `key`: the highest segment
    /// strictly below it, together with every further segment at that
    /// same level. Segments at the same level as `key` itself are
    /// skipped.
    pub(crate) fn below_segments(
        &self,
        key: usize,
        storage: &Slab<Segment<T>>,
    ) -> Result<Vec<usize>, Error> {
        let seg = storage[key];
        let mut res = Vec::new();
        let mut i = self.index_of(key);
        while i > 0 {
            let prev = self.keys[i - 1];
            i -= 1;
            if storage[prev].is_below_at(&seg, self.current_x)? {
                res.push(prev);
                break;
            }
        }
        if let Some(&anchor) = res.first() {
            let anchor = storage[anchor];
            while i > 0 {
                let prev = self.keys[i - 1];
                if storage[prev].is_below_at(&anchor, self.current_x)? {
                    break;
                }
                res.push(prev);
                i -= 1;
            }
        }
        Ok(res)
    }

    /// The segment group directly above `key`; mirror of
    /// [`below_segments`].
    ///
    /// [`below_segments`]: SweepLine::below_segments
    pub(crate) fn above_segments(
        &self,
        key: usize,
        storage: &Slab<Segment<T>>,
    ) -> Result<Vec<usize>, Error> {
        let seg = storage[key];
        let mut res = Vec::new();
        let mut i = self.index_of(key);
        while i + 1 < self.keys.len() {
            let succ = self.keys[i + 1];
            i += 1;
            if seg.is_below_at(&storage[succ], self.current_x)? {
                res.push(succ);
                break;
            }
        }
        if let Some(&anchor) = res.first() {
            let anchor = storage[anchor];
            while i + 1 < self.keys.len() {
                let succ = self.keys[i + 1];
                if anchor.is_below_at(&storage[succ], self.current_x)? {
                    break;
                }
                res.push(succ);
                i += 1;
            }
        }
        Ok(res)
    }

    /// All segments at the same level as `key` at the current sweep
    /// position, `key` included.
    pub(crate) fn same_level_as(
        &self,
        key: usize,
        storage: &Slab<Segment<T>>,
    ) -> Result<Vec<usize>, Error> {
        let seg = storage[key];
        let i = self.index_of(key);
        let mut res = vec![key];
        let mut j = i + 1;
        while j < self.keys.len() && !seg.is_below_at(&storage[self.keys[j]], self.current_x)? {
            res.push(self.keys[j]);
            j += 1;
        }
        let mut j = i;
        while j > 0 && !storage[self.keys[j - 1]].is_below_at(&seg, self.current_x)? {
            res.push(self.keys[j - 1]);
            j -= 1;
        }
        Ok(res)
    }

    /// All segments whose y-coordinate at `x` lies in
    /// `[y_inf, y_sup]`, in sweep order. The sweep position moves
    /// to `x`.
    pub(crate) fn between_y(
        &mut self,
        y_inf: T,
        y_sup: T,
        x: T,
        storage: &Slab<Segment<T>>,
    ) -> Result<Vec<usize>, Error> {
        self.current_x = x;
        let mut res = Vec::new();
        for &key in &self.keys {
            if let Some(y) = storage[key].y_at_x(x)? {
                if y_inf <= y && y <= y_sup {
                    res.push(key);
                }
            }
        }
        Ok(res)
    }

    /// Reverse the order of `group` in place at the crossing position
    /// `x`. The keys keep the positions the group occupied; only their
    /// assignment is reversed, so segments outside the group are
    /// untouched.
    pub(crate) fn revert_order(&mut self, x: T, group: &[usize]) {
        let indices: Vec<usize> = group.iter().map(|&key| self.index_of(key)).collect();
        self.current_x = x;
        let n = group.len();
        for (i, &pos) in indices.iter().enumerate() {
            self.keys[pos] = group[n - 1 - i];
        }
    }
}
