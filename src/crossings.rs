//! Compute all pairwise intersections of a set of segments.

use geo::GeoFloat;

use crate::{
    segments::{Intersection, Segment},
    sweep::Sweep,
    Error,
};

/// One pairwise intersection found by the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing<T: GeoFloat> {
    /// The first of the two intersecting segments.
    pub first: Segment<T>,

    /// The second of the two intersecting segments.
    pub second: Segment<T>,

    /// The geometry of the intersection: a point, or the shared
    /// sub-segment for a collinear overlap.
    pub geom: Intersection<T>,
}

/// Computes all pairwise intersections of `segments`.
///
/// Each intersecting pair is reported exactly once, in the order the
/// sweep discovers it. Degenerate configurations are supported:
/// vertical segments, segments sharing end-points, concurrent crossings
/// and collinear overlaps (reported as one [`Intersection::Overlap`]
/// per pair).
///
/// Uses the Bentley-Ottmann sweep and runs in O((n + k) log(n)) time
/// for k reported intersections; this beats the brute-force search
/// over all pairs when k is small compared to n^2.
pub fn intersections<T, I>(segments: I) -> Result<Vec<Crossing<T>>, Error>
where
    T: GeoFloat,
    I: IntoIterator<Item = Segment<T>>,
{
    Sweep::new(segments)?.run()
}
