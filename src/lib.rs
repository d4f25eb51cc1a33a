//! Computes all pairwise intersections of a set of line segments in the
//! plane.
//!
//! This is an implementation of the [Bentley-Ottmann] sweep-line
//! algorithm. It reports every intersection of a collection of
//! [`Segment`]s exactly once, including the degenerate configurations:
//! vertical segments, shared end-points, and collinear overlaps (which
//! are reported as a sub-segment rather than a pair of points). This is
//! essentially a drop-in replacement for intersecting all pairs with
//! [`Segment::intersection_with`], but is typically more efficient.
//!
//! # Usage
//!
//! Construct [`Segment`]s and pass them to [`intersections`]:
//!
//! ```rust
//! use segment_crossings::{intersections, Segment};
//!
//! let input = vec![
//!     Segment::new((0., 0.).into(), (1., 1.).into()).unwrap(),
//!     Segment::new((0., 1.).into(), (1., 0.).into()).unwrap(),
//!     Segment::new((0., 0.5).into(), (1., 0.5).into()).unwrap(),
//! ];
//! // All pairs cross at (0.5, 0.5).
//! assert_eq!(intersections(input).unwrap().len(), 3);
//! ```
//!
//! The sweep is a strictly sequential, one-shot computation; crossings
//! discovered while sweeping are scheduled as future events rather than
//! resolved eagerly, which keeps the running time at
//! O((n + k) log(n)) for k reported intersections.
//!
//! [Bentley-Ottmann]: https://en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm

mod events;
pub use events::SweepPoint;

pub mod segments;
pub use segments::{Intersection, Segment};

mod sweep;
mod sweep_line;

pub mod crossings;
pub use crossings::{intersections, Crossing};

pub mod circle;
pub use circle::{Circle, LineIntersection};

/// Precondition violations reported by segment construction and the
/// sweep.
///
/// All of these abort the computation immediately; none are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The two end-points of a segment coincide.
    DegenerateSegment,
    /// A circle was given a negative radius.
    NegativeRadius,
    /// Gradient, intercept or sweep ordering was queried on a vertical
    /// segment.
    VerticalSegment,
    /// An inner-crossing event was scheduled at one of the segment's
    /// own end-points.
    EndpointNotInner,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Error::DegenerateSegment => write!(f, "segment end-points coincide"),
            Error::NegativeRadius => write!(f, "circle radius is negative"),
            Error::VerticalSegment => {
                write!(f, "operation is undefined for a vertical segment")
            }
            Error::EndpointNotInner => {
                write!(f, "event coordinate is an end-point of the segment")
            }
        }
    }
}

impl std::error::Error for Error {}
