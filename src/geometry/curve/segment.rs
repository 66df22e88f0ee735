use crate::error::{GeometryError, Result};
use crate::math::rotation::rotate_about;
use crate::math::{Point3, Rotation, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// Number of control points in a cubic Bezier segment.
pub const CONTROL_POINT_COUNT: usize = 4;

/// Length value of a segment (or path) whose length is unknown or unusable.
pub const UNINITIALISED_LENGTH: f64 = -1.0;

/// Whether a measured length is usable: strictly above [`TOLERANCE`], so
/// rounding noise from a collapsed curve never counts as length.
#[must_use]
pub fn is_valid_length(length: f64) -> bool {
    length > TOLERANCE
}

/// Which derivative of the curve to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Derivative {
    /// The point on the curve itself.
    #[default]
    Position,
    /// The (unnormalised) tangent vector.
    First,
    /// The (unnormalised) curvature vector.
    Second,
}

/// A single cubic Bezier curve, the building block of a [`Path`](crate::geometry::Path).
///
/// `P(t) = (1-t)^3 P0 + 3t(1-t)^2 P1 + 3t^2(1-t) P2 + t^3 P3` for `t` in `[0, 1]`.
///
/// The arc length is cached by [`calculate_length`](Self::calculate_length) and
/// reset to [`UNINITIALISED_LENGTH`] whenever a control point changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    points: [Point3; CONTROL_POINT_COUNT],
    length: f64,
}

impl Default for Segment {
    fn default() -> Self {
        Self::from_points([Point3::origin(); CONTROL_POINT_COUNT])
    }
}

impl Segment {
    /// Creates a segment from its start point, two handles and end point.
    #[must_use]
    pub fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self::from_points([p0, p1, p2, p3])
    }

    /// Creates a segment from an ordered array of control points.
    #[must_use]
    pub fn from_points(points: [Point3; CONTROL_POINT_COUNT]) -> Self {
        Self {
            points,
            length: UNINITIALISED_LENGTH,
        }
    }

    /// Returns all four control points in order.
    #[must_use]
    pub fn points(&self) -> &[Point3; CONTROL_POINT_COUNT] {
        &self.points
    }

    /// Returns the control point at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::IndexOutOfRange`] if `index >= 4`.
    pub fn point(&self, index: usize) -> Result<&Point3> {
        self.points.get(index).ok_or_else(|| {
            GeometryError::IndexOutOfRange {
                index,
                len: CONTROL_POINT_COUNT,
            }
            .into()
        })
    }

    /// Replaces the control point at `index`, invalidating the cached length.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::IndexOutOfRange`] if `index >= 4`.
    pub fn set_point(&mut self, index: usize, point: Point3) -> Result<()> {
        let slot = self
            .points
            .get_mut(index)
            .ok_or(GeometryError::IndexOutOfRange {
                index,
                len: CONTROL_POINT_COUNT,
            })?;
        *slot = point;
        self.length = UNINITIALISED_LENGTH;
        Ok(())
    }

    /// Returns the most recently calculated arc length, or
    /// [`UNINITIALISED_LENGTH`] if it has not been calculated since the last edit.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the cached arc length only if it is usable (strictly positive).
    #[must_use]
    pub fn valid_length(&self) -> Option<f64> {
        is_valid_length(self.length).then_some(self.length)
    }

    /// Entry direction of the curve, `P1 - P0`.
    #[must_use]
    pub fn entry_direction(&self) -> Vector3 {
        self.points[1] - self.points[0]
    }

    /// Exit direction of the curve, `P3 - P2`.
    #[must_use]
    pub fn exit_direction(&self) -> Vector3 {
        self.points[3] - self.points[2]
    }

    /// Estimates the arc length by summing the chords between `samples`
    /// uniformly spaced parameters in `(0, 1]`, starting from `P0`.
    ///
    /// `samples == 0` marks the segment as uninitialised and returns
    /// [`UNINITIALISED_LENGTH`]. The result is also cached, see [`length`](Self::length).
    pub fn calculate_length(&mut self, samples: u32) -> f64 {
        if samples == 0 {
            self.length = UNINITIALISED_LENGTH;
            return self.length;
        }

        let step = 1.0 / f64::from(samples);
        let mut accumulator = 0.0;
        let mut previous = self.points[0];

        for i in 1..=samples {
            let current = self.position(f64::from(i) * step);
            accumulator += (current - previous).norm();
            previous = current;
        }

        // Collapsed control points leave only blending noise behind.
        self.length = if is_valid_length(accumulator) { accumulator } else { 0.0 };
        self.length
    }

    /// Evaluates the curve or one of its derivatives at `t`.
    ///
    /// `t` is clamped to `[0, 1]`; the returned vector is expressed as
    /// coordinates for every [`Derivative`], and is never normalised.
    #[must_use]
    pub fn curve_point(&self, t: f64, derivative: Derivative) -> Vector3 {
        let t = t.clamp(0.0, 1.0);
        match derivative {
            Derivative::Position => self.position(t).coords,
            Derivative::First => self.first_derivative(t),
            Derivative::Second => self.second_derivative(t),
        }
    }

    /// Moves every control point by `offset`.
    pub fn translate(&mut self, offset: &Vector3) {
        for point in &mut self.points {
            *point += *offset;
        }
        self.length = UNINITIALISED_LENGTH;
    }

    /// Translates the segment so that `P0` lands exactly on `target`.
    pub fn move_start_to(&mut self, target: &Point3) {
        let offset = *target - self.points[0];
        self.translate(&offset);
        // Pin the start point: `p + (q - p)` is not always bit-identical to `q`.
        self.points[0] = *target;
    }

    /// Rotates every control point around `pivot`.
    pub fn rotate_about(&mut self, pivot: &Point3, rotation: &Rotation) {
        for point in &mut self.points {
            *point = rotate_about(point, pivot, rotation);
        }
        self.length = UNINITIALISED_LENGTH;
    }

    fn position(&self, t: f64) -> Point3 {
        let [p0, p1, p2, p3] = &self.points;

        let inv = 1.0 - t;
        let inv_sq = inv * inv;
        let inv_cubed = inv_sq * inv;

        let t_sq = t * t;
        let t_cubed = t_sq * t;

        let first = p0.coords * inv_cubed;
        let second = p1.coords * (3.0 * t * inv_sq);
        let third = p2.coords * (3.0 * t_sq * inv);
        let last = p3.coords * t_cubed;

        Point3::from(first + second + third + last)
    }

    fn first_derivative(&self, t: f64) -> Vector3 {
        let [p0, p1, p2, p3] = &self.points;

        let inv = 1.0 - t;
        let inv_sq = inv * inv;
        let t_sq = t * t;

        let first = (p1 - p0) * (3.0 * inv_sq);
        let second = (p2 - p1) * (6.0 * t * inv);
        let last = (p3 - p2) * (3.0 * t_sq);

        first + second + last
    }

    fn second_derivative(&self, t: f64) -> Vector3 {
        let [p0, p1, p2, p3] = &self.points;

        let inv = 1.0 - t;

        let first = (p2.coords - p1.coords * 2.0 + p0.coords) * (6.0 * inv);
        let last = (p3.coords - p2.coords * 2.0 + p1.coords) * (6.0 * t);

        first + last
    }
}

impl Curve for Segment {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.position(self.domain().clamp(t)))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        let tangent = self.first_derivative(self.domain().clamp(t));
        tangent
            .try_normalize(TOLERANCE)
            .ok_or_else(|| GeometryError::ZeroVector.into())
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        (self.points[3] - self.points[0]).norm() < TOLERANCE
    }
}
