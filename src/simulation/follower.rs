use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::actor::Drivable;
use crate::error::{ConfigError, FollowError, Result};
use crate::geometry::{Derivative, Path, Segment};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Share of a segment's mean tangent magnitude used as the lower bound when
/// stepping along it.
const MIN_TANGENT_FRACTION: f64 = 0.1;

/// Tuning for [`PathFollower`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowerConfig {
    /// Seconds for one full lap of the path.
    pub time_to_complete: f64,
    /// Floor applied to the tangent magnitude so degenerate segments never
    /// divide by zero.
    pub min_tangent_magnitude: f64,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            time_to_complete: 20.0,
            min_tangent_magnitude: 1e-6,
        }
    }
}

impl FollowerConfig {
    /// Checks that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !self.time_to_complete.is_finite() || self.time_to_complete <= 0.0 {
            return Err(ConfigError::Invalid(
                "follower.time_to_complete must be positive".to_owned(),
            ));
        }
        if !self.min_tangent_magnitude.is_finite() || self.min_tangent_magnitude <= 0.0 {
            return Err(ConfigError::Invalid(
                "follower.min_tangent_magnitude must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Moves a [`Drivable`] along a [`Path`] at an approximately constant speed.
///
/// The curve parameter of a Bezier segment is not proportional to distance,
/// so each step scales the parameter increment by the inverse of the tangent
/// magnitude: `dt = speed / |P'(t)| * delta_time`. Once the parameter passes
/// `1.0` the follower moves on to the next segment (wrapping to the first) and
/// keeps the overshoot.
///
/// The follower stores only an index into the path; the path itself is
/// borrowed on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollower {
    segment_index: usize,
    parameter: f64,
    segment_time: f64,
    elapsed: f64,
    laps: usize,
    last_tangent: Vector3,
    speed: f64,
    path_length: f64,
    min_tangent_magnitude: f64,
}

impl PathFollower {
    /// Creates a follower positioned at the start of `path`.
    ///
    /// The target speed is derived from `config.time_to_complete` and the path
    /// length; on a path without a valid length it starts at zero until
    /// [`set_movement_speed`](Self::set_movement_speed) is called.
    ///
    /// # Errors
    ///
    /// Returns [`FollowError::EmptyPath`] if the path has no segments.
    pub fn new(path: &Path, config: &FollowerConfig) -> Result<Self> {
        if path.segment(0).is_none() {
            return Err(FollowError::EmptyPath.into());
        }

        let mut follower = Self {
            segment_index: 0,
            parameter: 0.0,
            segment_time: 0.0,
            elapsed: 0.0,
            laps: 0,
            last_tangent: Vector3::zeros(),
            speed: 0.0,
            path_length: path.length(),
            min_tangent_magnitude: config.min_tangent_magnitude.max(TOLERANCE),
        };
        follower.set_time_to_complete(config.time_to_complete);
        follower.reset(path);
        Ok(follower)
    }

    /// Restarts from parameter 0 of the first segment.
    pub fn reset(&mut self, path: &Path) {
        self.segment_index = 0;
        self.parameter = 0.0;
        self.segment_time = 0.0;
        self.elapsed = 0.0;
        self.laps = 0;
        self.last_tangent = path
            .curve_point(0, 0.0, Derivative::First)
            .unwrap_or_else(Vector3::zeros);
    }

    /// Sets the speed so that one lap takes `seconds`.
    ///
    /// Negative values are made absolute. Zero is ignored, as is any value
    /// while the path has no valid length.
    pub fn set_time_to_complete(&mut self, seconds: f64) {
        if seconds == 0.0 || !seconds.is_finite() {
            debug!(seconds, "ignoring time to complete");
            return;
        }
        if self.path_length <= 0.0 {
            warn!(seconds, "path has no valid length, time to complete ignored");
            return;
        }
        self.speed = self.path_length / seconds.abs();
    }

    /// Sets the speed in distance units per second.
    ///
    /// Negative values are made absolute; zero is ignored.
    pub fn set_movement_speed(&mut self, distance_per_second: f64) {
        if distance_per_second == 0.0 || !distance_per_second.is_finite() {
            debug!(distance_per_second, "ignoring movement speed");
            return;
        }
        self.speed = distance_per_second.abs();
    }

    /// Target speed in distance units per second.
    #[must_use]
    pub fn movement_speed(&self) -> f64 {
        self.speed
    }

    /// Seconds per lap at the current speed, if both speed and path length
    /// are known.
    #[must_use]
    pub fn time_to_complete(&self) -> Option<f64> {
        (self.speed > 0.0 && self.path_length > 0.0).then(|| self.path_length / self.speed)
    }

    /// Advances by `delta_time` seconds and drives `entity` to the new point.
    ///
    /// Non-positive or non-finite time steps are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FollowError::SegmentNotFound`] if `path` does not contain the
    /// segment this follower is on, e.g. when called with a different path.
    pub fn update<D: Drivable + ?Sized>(
        &mut self,
        path: &Path,
        delta_time: f64,
        entity: &mut D,
    ) -> Result<()> {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return Ok(());
        }

        let distance = self.speed * delta_time;
        let step = self.parameter_step(self.active_segment(path)?, distance);
        if !step.is_finite() {
            warn!(distance, "parameter step is not finite, frame skipped");
            return Ok(());
        }

        self.segment_time += delta_time;
        self.elapsed += delta_time;
        self.parameter += step;

        if self.parameter >= 1.0 {
            self.advance_segments(path)?;
        }

        let segment = self.active_segment(path)?;
        let position = segment.curve_point(self.parameter, Derivative::Position);
        let tangent = segment.curve_point(self.parameter, Derivative::First);

        entity.set_position(Point3::from(position));
        if let Some(direction) = tangent.try_normalize(TOLERANCE) {
            entity.set_direction(direction);
        }
        entity.advance_visual(distance);

        self.last_tangent = tangent;
        Ok(())
    }

    /// Pushes the current position (and heading, if defined) to `entity`
    /// without advancing.
    ///
    /// # Errors
    ///
    /// Returns [`FollowError::SegmentNotFound`] if `path` does not contain the
    /// current segment.
    pub fn place<D: Drivable + ?Sized>(&self, path: &Path, entity: &mut D) -> Result<()> {
        let segment = self.active_segment(path)?;
        entity.set_position(Point3::from(
            segment.curve_point(self.parameter, Derivative::Position),
        ));
        if let Some(direction) = self.last_tangent.try_normalize(TOLERANCE) {
            entity.set_direction(direction);
        }
        Ok(())
    }

    /// Parameter increment covering `distance` on `segment`.
    ///
    /// The tangent magnitude is taken at the midpoint of a first estimate and
    /// floored at a fraction of the segment's mean speed, so handles that
    /// collapse onto an end point cannot blow the step up.
    fn parameter_step(&self, segment: &Segment, distance: f64) -> f64 {
        let floor = segment
            .valid_length()
            .map_or(self.min_tangent_magnitude, |length| {
                (length * MIN_TANGENT_FRACTION).max(self.min_tangent_magnitude)
            });
        let magnitude_at = |t: f64| segment.curve_point(t, Derivative::First).norm().max(floor);

        let estimate = distance / magnitude_at(self.parameter);
        distance / magnitude_at(self.parameter + estimate * 0.5)
    }

    /// Rolls the parameter back into `[0, 1)`, moving one segment forward per
    /// whole unit removed.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn advance_segments(&mut self, path: &Path) -> Result<()> {
        let count = path.segment_count();
        if count == 0 {
            return Err(FollowError::SegmentNotFound(self.segment_index).into());
        }

        let completed = self.active_segment(path)?;
        info!(
            path = path.length(),
            segment = completed.length(),
            completed = self.segment_time,
            "segment finished"
        );

        let hops = self.parameter.floor();
        self.parameter -= hops;

        // Wrap in f64 so huge hop counts never overflow the index.
        let segments = count as f64;
        let target = self.segment_index as f64 + hops;
        let laps = (target / segments).floor();
        let index = (target - laps * segments).clamp(0.0, segments - 1.0);

        self.laps = self.laps.saturating_add(laps as usize);
        self.segment_index = index as usize;
        self.segment_time = 0.0;
        Ok(())
    }

    fn active_segment<'p>(&self, path: &'p Path) -> Result<&'p Segment> {
        path.segment(self.segment_index)
            .ok_or_else(|| FollowError::SegmentNotFound(self.segment_index).into())
    }

    /// Index of the segment being followed.
    #[must_use]
    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    /// Curve parameter within the current segment, in `[0, 1)`.
    #[must_use]
    pub fn parameter(&self) -> f64 {
        self.parameter
    }

    /// Seconds spent on the current segment.
    #[must_use]
    pub fn segment_time(&self) -> f64 {
        self.segment_time
    }

    /// Seconds since the last reset.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of times the follower wrapped from the last segment to the first.
    #[must_use]
    pub fn laps(&self) -> usize {
        self.laps
    }

    /// Unnormalised tangent at the last evaluated point.
    #[must_use]
    pub fn last_tangent(&self) -> &Vector3 {
        &self.last_tangent
    }
}
