use std::cmp::Ordering;
use std::convert::TryFrom;

use geo::{Coordinate, GeoFloat, Line};

use crate::{events::SweepPoint, Error};

/// Tolerance used to classify vertical segments and to collapse
/// near-coincident points in the collinear-overlap case.
pub(crate) fn epsilon<T: GeoFloat>() -> T {
    T::from(1.0e-3).expect("tolerance must be representable in the scalar type")
}

/// An immutable line segment with canonically ordered end-points.
///
/// The end-points are ordered lexicographically (by `x`, then by `y`)
/// at construction, so `start() <= end()` always holds. A segment
/// cannot be a point: construction fails with
/// [`Error::DegenerateSegment`] when both end-points coincide.
///
/// Whether the segment is vertical (`|x1 - x2|` below the tolerance) is
/// decided once at construction and cached; [`gradient`], the sweep
/// ordering and related queries fail with [`Error::VerticalSegment`] on
/// a vertical segment.
///
/// [`gradient`]: Segment::gradient
#[derive(Debug, Clone, Copy)]
pub struct Segment<T: GeoFloat> {
    start: Coordinate<T>,
    end: Coordinate<T>,
    vertical: bool,
}

/// The geometry of a pairwise intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intersection<T: GeoFloat> {
    /// The segments meet at a single point.
    Point(Coordinate<T>),
    /// The segments are collinear and share a sub-segment of positive
    /// length.
    Overlap(Segment<T>),
}

impl<T: GeoFloat> Segment<T> {
    /// Create a segment from two end-points, ordering them
    /// lexicographically.
    pub fn new(a: Coordinate<T>, b: Coordinate<T>) -> Result<Self, Error> {
        let pa = SweepPoint::from(a);
        let pb = SweepPoint::from(b);
        if pa == pb {
            return Err(Error::DegenerateSegment);
        }
        let (start, end) = if pa < pb { (a, b) } else { (b, a) };
        let vertical = (start.x - end.x).abs() < epsilon();
        Ok(Segment {
            start,
            end,
            vertical,
        })
    }

    /// The lexicographically smaller end-point.
    #[inline]
    pub fn start(&self) -> Coordinate<T> {
        self.start
    }

    /// The lexicographically larger end-point.
    #[inline]
    pub fn end(&self) -> Coordinate<T> {
        self.end
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    /// The gradient of the supporting line.
    pub fn gradient(&self) -> Result<T, Error> {
        if self.vertical {
            return Err(Error::VerticalSegment);
        }
        Ok((self.end.y - self.start.y) / (self.end.x - self.start.x))
    }

    /// The y-intercept of the supporting line.
    pub fn y_intercept(&self) -> Result<T, Error> {
        Ok(self.start.y - self.gradient()? * self.start.x)
    }

    /// The y-coordinate of the segment at `x`, or `None` when `x` lies
    /// outside the segment's x-range.
    pub fn y_at_x(&self, x: T) -> Result<Option<T>, Error> {
        if self.vertical {
            return Err(Error::VerticalSegment);
        }
        // Barycentric coordinate of x along the segment.
        let alpha = (x - self.end.x) / (self.start.x - self.end.x);
        if T::zero() <= alpha && alpha <= T::one() {
            Ok(Some(alpha * self.start.y + (T::one() - alpha) * self.end.y))
        } else {
            Ok(None)
        }
    }

    /// The y-coordinate of the supporting line at `x`, with no range
    /// check.
    fn line_y_at(&self, x: T) -> Result<T, Error> {
        if self.vertical {
            return Err(Error::VerticalSegment);
        }
        let alpha = (x - self.end.x) / (self.start.x - self.end.x);
        Ok(alpha * self.start.y + (T::one() - alpha) * self.end.y)
    }

    /// The orthogonal projection of `p` onto this segment, or `None`
    /// when the projection falls outside the segment.
    pub fn orthogonal_projection(&self, p: Coordinate<T>) -> Option<Coordinate<T>> {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let ratio = (dx * (p.x - self.start.x) + dy * (p.y - self.start.y)) / (dx * dx + dy * dy);
        if T::zero() <= ratio && ratio <= T::one() {
            Some(Coordinate {
                x: self.start.x + ratio * dx,
                y: self.start.y + ratio * dy,
            })
        } else {
            None
        }
    }

    /// Intersect with another segment.
    ///
    /// Returns `None` for disjoint segments, a [`Intersection::Point`]
    /// for a single-point intersection (including collinear segments
    /// touching at one point), and a [`Intersection::Overlap`] for
    /// collinear segments sharing a sub-segment of positive length.
    ///
    /// The parallel branch is taken on an exactly-zero determinant of
    /// the direction vectors; the collinear sub-case then collapses
    /// near-coincident overlap end-points with the tolerance.
    pub fn intersection_with(&self, other: &Self) -> Option<Intersection<T>> {
        let (x1, y1, x2, y2) = (self.start.x, self.start.y, self.end.x, self.end.y);
        let (x3, y3, x4, y4) = (other.start.x, other.start.y, other.end.x, other.end.y);

        let det = (y1 - y2) * (x3 - x4) - (x1 - x2) * (y3 - y4);
        if det == T::zero() {
            // Parallel lines: disjoint unless collinear.
            let collinear = if self.vertical || other.vertical {
                self.vertical && other.vertical && x1 == x3
            } else {
                self.y_intercept().ok()? == other.y_intercept().ok()?
            };
            if !collinear {
                return None;
            }
            // Mutually project the end-points to clip the overlap.
            let p1 = self
                .orthogonal_projection(other.start)
                .or_else(|| other.orthogonal_projection(self.start))?;
            let p2 = self
                .orthogonal_projection(other.end)
                .or_else(|| other.orthogonal_projection(self.end))?;
            let eps = epsilon();
            if (p1.x - p2.x).abs() < eps && (p1.y - p2.y).abs() < eps {
                Some(Intersection::Point(p1))
            } else {
                Segment::new(p1, p2).ok().map(Intersection::Overlap)
            }
        } else {
            // Barycentric coordinates of the crossing, alpha along
            // this segment and beta along the other.
            let alpha = ((y3 - y4) * (x2 - x4) - (x3 - x4) * (y2 - y4)) / det;
            let beta = ((y1 - y2) * (x2 - x4) - (x1 - x2) * (y2 - y4)) / det;
            if T::zero() <= alpha
                && alpha <= T::one()
                && T::zero() <= beta
                && beta <= T::one()
            {
                Some(Intersection::Point(Coordinate {
                    x: alpha * x1 + (T::one() - alpha) * x2,
                    y: alpha * y1 + (T::one() - alpha) * y2,
                }))
            } else {
                None
            }
        }
    }

    /// Total sweep order relative to the sweep position `x`.
    ///
    /// Segments compare by y-coordinate at `x` (on the supporting
    /// line), then by gradient, then by raw end-points. Fails on a
    /// vertical operand; verticals are ordered out-of-band by the
    /// sweep.
    pub fn order_at(&self, other: &Self, x: T) -> Result<Ordering, Error> {
        let ya = self.line_y_at(x)?;
        let yb = other.line_y_at(x)?;
        // End-points are asserted finite at construction, so the
        // partial comparisons cannot fail.
        Ok(ya
            .partial_cmp(&yb)
            .unwrap()
            .then(self.gradient()?.partial_cmp(&other.gradient()?).unwrap())
            .then_with(|| SweepPoint::from(self.start).cmp(&SweepPoint::from(other.start)))
            .then_with(|| SweepPoint::from(self.end).cmp(&SweepPoint::from(other.end))))
    }

    /// Whether this segment runs strictly below `other` at the sweep
    /// position `x`.
    ///
    /// Unlike [`order_at`] this ignores the end-point tie-break, so
    /// segments with equal y and gradient at `x` are at the same level
    /// in neither direction.
    ///
    /// [`order_at`]: Segment::order_at
    pub fn is_below_at(&self, other: &Self, x: T) -> Result<bool, Error> {
        let ya = self.line_y_at(x)?;
        let yb = other.line_y_at(x)?;
        Ok(ya
            .partial_cmp(&yb)
            .unwrap()
            .then(self.gradient()?.partial_cmp(&other.gradient()?).unwrap())
            == Ordering::Less)
    }
}

/// Equality is end-point-wise.
impl<T: GeoFloat> PartialEq for Segment<T> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

/// Convert from a [`Line`], rejecting degenerate lines.
impl<T: GeoFloat> TryFrom<Line<T>> for Segment<T> {
    type Error = Error;

    fn try_from(l: Line<T>) -> Result<Self, Error> {
        Segment::new(l.start, l.end)
    }
}

impl<T: GeoFloat> From<Segment<T>> for Line<T> {
    fn from(seg: Segment<T>) -> Self {
        Line::new(seg.start, seg.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment<f64> {
        Segment::new((x1, y1).into(), (x2, y2).into()).unwrap()
    }

    #[test]
    fn test_degenerate_construction() {
        assert_eq!(
            Segment::new((0., 0.).into(), (0., 0.).into()),
            Err(Error::DegenerateSegment)
        );
    }

    #[test]
    fn test_canonical_ordering() {
        let s = seg(0., 1., 0., 0.);
        assert_eq!((s.start().x, s.start().y, s.end().x, s.end().y), (0., 0., 0., 1.));
        let s = seg(1., 1., 0., 0.);
        assert_eq!((s.start().x, s.start().y, s.end().x, s.end().y), (0., 0., 1., 1.));
    }

    #[test]
    fn test_equality() {
        assert_eq!(seg(0., 1., 2., 3.), seg(2., 3., 0., 1.));
        assert_ne!(seg(0., 1., 2., 3.), seg(3., 2., 1., 0.));
    }

    #[test]
    fn test_vertical_classification() {
        assert!(seg(0., 0., 0., 1.).is_vertical());
        assert!(seg(0., 0., 0.0005, 1.).is_vertical());
        assert!(!seg(0., 0., 1., 1.).is_vertical());
    }

    #[test]
    fn test_gradient() {
        assert_eq!(seg(0., 0., 0., 1.).gradient(), Err(Error::VerticalSegment));
        assert_eq!(seg(0., 0., 1., 1.).gradient(), Ok(1.));
        assert_eq!(seg(0., 1., 1., 0.).gradient(), Ok(-1.));
    }

    #[test]
    fn test_y_intercept() {
        assert_eq!(seg(0., 0., 0., 1.).y_intercept(), Err(Error::VerticalSegment));
        assert_eq!(seg(1., 1., 2., 2.).y_intercept(), Ok(0.));
        assert_eq!(seg(0., 1., 1., 2.).y_intercept(), Ok(1.));
    }

    #[test]
    fn test_y_at_x() {
        let s = seg(0., 0., 1., 1.);
        assert_eq!(s.y_at_x(0.5), Ok(Some(0.5)));
        assert_eq!(s.y_at_x(2.), Ok(None));
        assert_eq!(seg(0., 0., 0., 1.).y_at_x(0.), Err(Error::VerticalSegment));
    }

    #[test]
    fn test_orthogonal_projection() {
        let v = seg(0., 0., 0., 1.);
        assert_eq!(v.orthogonal_projection((1., 0.5).into()), Some((0., 0.5).into()));
        assert_eq!(v.orthogonal_projection((1., 1.5).into()), None);
        let d = seg(0., 0., 1., 1.);
        assert_eq!(d.orthogonal_projection((0., 1.).into()), Some((0.5, 0.5).into()));
        assert_eq!(d.orthogonal_projection((0., 3.).into()), None);
    }

    #[test]
    fn test_intersection_parallel_distinct() {
        assert_eq!(seg(0., 0., 0., 1.).intersection_with(&seg(1., 0., 1., 1.)), None);
        assert_eq!(seg(0., 0., 1., 1.).intersection_with(&seg(0., 1., 1., 2.)), None);
    }

    #[test]
    fn test_intersection_collinear_vertical() {
        // Disjoint on the same line.
        assert_eq!(seg(0., 0., 0., 1.).intersection_with(&seg(0., 2., 0., 3.)), None);
        // Touching at one point.
        assert_eq!(
            seg(0., 0., 0., 1.).intersection_with(&seg(0., 1., 0., 2.)),
            Some(Intersection::Point((0., 1.).into()))
        );
        // Overlapping sub-segment.
        assert_eq!(
            seg(0., 0., 0., 2.).intersection_with(&seg(0., 1., 0., 3.)),
            Some(Intersection::Overlap(seg(0., 1., 0., 2.)))
        );
    }

    #[test]
    fn test_intersection_collinear_diagonal() {
        assert_eq!(seg(0., 0., 1., 1.).intersection_with(&seg(2., 2., 3., 3.)), None);
        assert_eq!(
            seg(0., 0., 1., 1.).intersection_with(&seg(1., 1., 2., 2.)),
            Some(Intersection::Point((1., 1.).into()))
        );
        assert_eq!(
            seg(0., 0., 2., 2.).intersection_with(&seg(1., 1., 3., 3.)),
            Some(Intersection::Overlap(seg(1., 1., 2., 2.)))
        );
    }

    #[test]
    fn test_intersection_crossing() {
        assert_eq!(
            seg(0., 0., 4., 4.).intersection_with(&seg(0., 4., 4., 0.)),
            Some(Intersection::Point((2., 2.).into()))
        );
        // Lines cross at (2, 2), outside the first segment.
        assert_eq!(seg(0., 0., 1., 1.).intersection_with(&seg(3., 1., 4., 0.)), None);
    }

    #[test]
    fn test_intersection_asymmetric_crossing() {
        // The crossing does not sit at the midpoint of either segment,
        // so mixing up the barycentric parameters shifts the point.
        assert_eq!(
            seg(0., 0., 6., 6.).intersection_with(&seg(0., 4., 4., 0.)),
            Some(Intersection::Point((2., 2.).into()))
        );
        assert_eq!(
            seg(0., 4., 4., 0.).intersection_with(&seg(0., 0., 6., 6.)),
            Some(Intersection::Point((2., 2.).into()))
        );
        // Crossing at one segment's end-point.
        assert_eq!(
            seg(1., 1., 2., 3.).intersection_with(&seg(0., -2., 2., 4.)),
            Some(Intersection::Point((1., 1.).into()))
        );
    }

    #[test]
    fn test_intersection_vertical_with_diagonal() {
        assert_eq!(
            seg(1., 0., 1., 2.).intersection_with(&seg(0., 0., 2., 2.)),
            Some(Intersection::Point((1., 1.).into()))
        );
    }

    #[test]
    fn test_intersection_symmetry() {
        let a = seg(0., 0., 4., 4.);
        let b = seg(0., 4., 4., 0.);
        assert_eq!(a.intersection_with(&b), b.intersection_with(&a));
        let c = seg(0., 0., 2., 2.);
        let d = seg(1., 1., 3., 3.);
        assert_eq!(c.intersection_with(&d), d.intersection_with(&c));
    }

    #[test]
    fn test_order_at_by_y() {
        let a = seg(0., 0., 2., 2.);
        let b = seg(1., 0., 2., 3.);
        // At x = 1: a is at y = 1, b at y = 0.
        assert_eq!(b.order_at(&a, 1.), Ok(Ordering::Less));
        assert_eq!(a.order_at(&b, 1.), Ok(Ordering::Greater));
    }

    #[test]
    fn test_order_at_by_gradient() {
        let a = seg(0., 0., 2., 2.);
        let b = seg(1., 1., 2., 3.);
        // Same y at x = 1; gradient breaks the tie.
        assert_eq!(a.order_at(&b, 1.), Ok(Ordering::Less));
        assert!(!a.is_below_at(&b, 0.5).unwrap());
        assert!(a.is_below_at(&b, 1.).unwrap());
    }

    #[test]
    fn test_order_at_by_endpoints() {
        let a = seg(0., 0., 2., 2.);
        let b = seg(1., 1., 3., 3.);
        // Same y and gradient everywhere; end-points break the tie.
        assert_eq!(a.order_at(&b, 1.), Ok(Ordering::Less));
        assert!(!a.is_below_at(&b, 1.).unwrap());
        assert!(!b.is_below_at(&a, 1.).unwrap());
    }

    #[test]
    fn test_order_at_vertical_fails() {
        let v = seg(0., 0., 0., 1.);
        let d = seg(0., 0., 1., 1.);
        assert_eq!(v.order_at(&d, 0.), Err(Error::VerticalSegment));
        assert_eq!(d.order_at(&v, 0.), Err(Error::VerticalSegment));
    }
}
