//! Circle primitive with segment and line intersection queries.

use geo::{Coordinate, GeoFloat};
use smallvec::SmallVec;

use crate::{
    segments::{epsilon, Segment},
    Error,
};

/// A circle given by its center and radius.
///
/// Satisfies the equation `(x - xc)^2 + (y - yc)^2 = r^2`. A zero
/// radius is allowed; a negative one is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle<T: GeoFloat> {
    center: Coordinate<T>,
    radius: T,
}

/// Intersection of a circle with a full line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineIntersection<T: GeoFloat> {
    /// The line touches the circle at one point.
    Tangent(Coordinate<T>),
    /// The line cuts the circle at two points.
    Secant(Coordinate<T>, Coordinate<T>),
}

impl<T: GeoFloat> Circle<T> {
    pub fn new(center: Coordinate<T>, radius: T) -> Result<Self, Error> {
        if radius < T::zero() {
            return Err(Error::NegativeRadius);
        }
        Ok(Circle { center, radius })
    }

    #[inline]
    pub fn center(&self) -> Coordinate<T> {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> T {
        self.radius
    }

    /// The points where `seg` meets this circle, at most two.
    ///
    /// Solves for the barycentric coordinate along the segment, so
    /// only points within the segment's extent are returned. A
    /// discriminant within the tolerance of zero counts as a tangent
    /// point.
    pub fn intersection_with_segment(&self, seg: &Segment<T>) -> SmallVec<[Coordinate<T>; 2]> {
        let (x1, y1) = (seg.start().x, seg.start().y);
        let (x2, y2) = (seg.end().x, seg.end().y);
        let two = T::one() + T::one();
        let four = two + two;

        // The circle equation restricted to
        // (x, y) = alpha * p1 + (1 - alpha) * p2 is a quadratic
        // a * alpha^2 + b * alpha + c = 0.
        let a = (x1 - x2) * (x1 - x2) + (y1 - y2) * (y1 - y2);
        let b = two * ((x2 - self.center.x) * (x1 - x2) + (y2 - self.center.y) * (y1 - y2));
        let c = (x2 - self.center.x) * (x2 - self.center.x)
            + (y2 - self.center.y) * (y2 - self.center.y)
            - self.radius * self.radius;
        let delta = b * b - four * a * c;

        let eps: T = epsilon();
        let mut alphas: SmallVec<[T; 2]> = SmallVec::new();
        if delta > eps {
            let sqrt_delta = delta.sqrt();
            alphas.push((sqrt_delta - b) / (two * a));
            alphas.push((-sqrt_delta - b) / (two * a));
        } else if delta > -eps {
            alphas.push(-b / (two * a));
        }

        alphas
            .into_iter()
            .filter(|&alpha| T::zero() <= alpha && alpha <= T::one())
            .map(|alpha| Coordinate {
                x: alpha * x1 + (T::one() - alpha) * x2,
                y: alpha * y1 + (T::one() - alpha) * y2,
            })
            .collect()
    }

    /// The intersection of this circle with the supporting line of
    /// `seg`, ignoring the segment's extent.
    pub fn intersection_with_line(&self, seg: &Segment<T>) -> Option<LineIntersection<T>> {
        let two = T::one() + T::one();
        let four = two + two;
        let eps: T = epsilon();

        if seg.is_vertical() {
            let x0 = seg.start().x;
            let square = self.radius * self.radius - (x0 - self.center.x) * (x0 - self.center.x);
            if square < -eps {
                None
            } else if square > eps {
                let sqrt_square = square.sqrt();
                Some(LineIntersection::Secant(
                    Coordinate {
                        x: x0,
                        y: self.center.y - sqrt_square,
                    },
                    Coordinate {
                        x: x0,
                        y: self.center.y + sqrt_square,
                    },
                ))
            } else {
                Some(LineIntersection::Tangent(Coordinate {
                    x: x0,
                    y: self.center.y,
                }))
            }
        } else {
            let a = seg.gradient().ok()?;
            let b = seg.y_intercept().ok()?;
            let (xc, yc) = (self.center.x, self.center.y);

            // Substituting y = a * x + b into the circle equation
            // gives a quadratic in x.
            let qa = T::one() + a * a;
            let qb = two * (a * b - xc - a * yc);
            let qc = xc * xc + yc * yc + b * b - self.radius * self.radius - two * b * yc;
            let delta = qb * qb - four * qa * qc;
            if delta < -eps {
                None
            } else if delta > eps {
                let sqrt_delta = delta.sqrt();
                let x1 = (-sqrt_delta - qb) / (two * qa);
                let x2 = (sqrt_delta - qb) / (two * qa);
                Some(LineIntersection::Secant(
                    Coordinate { x: x1, y: a * x1 + b },
                    Coordinate { x: x2, y: a * x2 + b },
                ))
            } else {
                let x = -qb / (two * qa);
                Some(LineIntersection::Tangent(Coordinate { x, y: a * x + b }))
            }
        }
    }
}
