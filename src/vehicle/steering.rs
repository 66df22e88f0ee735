use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::roughly_equals;

/// Limits for a part that yaws towards a steering input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Largest yaw magnitude in radians, reached at full lock.
    pub angle_limit: f64,
    /// Yaws closer than this to zero read as straight ahead.
    pub tolerance: f64,
    /// Rotation speed in degrees per second.
    pub turn_speed: f64,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            angle_limit: 20.0_f64.to_radians(),
            tolerance: 0.0125,
            turn_speed: 80.0,
        }
    }
}

impl SteeringConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.angle_limit > 0.0 && self.angle_limit < std::f64::consts::FRAC_PI_2) {
            return Err(ConfigError::Invalid(
                "steering.angle_limit must lie in (0, pi/2)".to_owned(),
            ));
        }
        if !(self.tolerance >= 0.0 && self.tolerance < self.angle_limit) {
            return Err(ConfigError::Invalid(
                "steering.tolerance must be non-negative and below angle_limit".to_owned(),
            ));
        }
        if !(self.turn_speed.is_finite() && self.turn_speed > 0.0) {
            return Err(ConfigError::Invalid(
                "steering.turn_speed must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Yaw state of a steerable part.
///
/// A turn input in `[-1, 1]` maps to a desired yaw of
/// `-(angle_limit * input)`; each update rotates towards it at `turn_speed`
/// without overshooting.
#[derive(Debug, Clone, PartialEq)]
pub struct Steering {
    config: SteeringConfig,
    yaw: f64,
    target_turn: f64,
}

impl Steering {
    #[must_use]
    pub fn new(config: SteeringConfig) -> Self {
        Self {
            config,
            yaw: 0.0,
            target_turn: 0.0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SteeringConfig {
        &self.config
    }

    /// Sets the turn input, clamped to `[-1, 1]`.
    pub fn set_target_turn(&mut self, turn: f64) {
        self.target_turn = if turn.is_nan() { 0.0 } else { turn.clamp(-1.0, 1.0) };
    }

    #[must_use]
    pub fn target_turn(&self) -> f64 {
        self.target_turn
    }

    /// Yaw the part is rotating towards.
    #[must_use]
    pub fn desired_yaw(&self) -> f64 {
        -(self.config.angle_limit * self.target_turn)
    }

    /// Raw yaw in radians.
    #[must_use]
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    /// Yaw in radians, snapped to zero inside the tolerance band.
    #[must_use]
    pub fn current_yaw(&self) -> f64 {
        if roughly_equals(self.yaw, 0.0, self.config.tolerance) {
            0.0
        } else {
            self.yaw
        }
    }

    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.target_turn = 0.0;
    }

    /// Rotates towards the desired yaw for `delta_time` seconds.
    pub fn update(&mut self, delta_time: f64) {
        let desired = self.desired_yaw();
        if roughly_equals(self.yaw, desired, self.config.tolerance) || delta_time <= 0.0 {
            return;
        }

        let step = (self.config.turn_speed.to_radians() * delta_time).min((desired - self.yaw).abs());
        if self.yaw > desired {
            self.yaw -= step;
        } else {
            self.yaw += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn defaults_match_vehicle_tuning() {
        let config = SteeringConfig::default();
        assert_abs_diff_eq!(config.angle_limit, 0.349_065_85, epsilon = 1e-8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn right_turn_yaws_negative() {
        let mut steering = Steering::new(SteeringConfig::default());
        steering.set_target_turn(1.0);
        assert_abs_diff_eq!(steering.desired_yaw(), -SteeringConfig::default().angle_limit);

        steering.update(0.1);
        assert_abs_diff_eq!(steering.yaw(), -8.0_f64.to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn never_overshoots_target() {
        let mut steering = Steering::new(SteeringConfig::default());
        steering.set_target_turn(-0.5);
        let desired = steering.desired_yaw();
        for _ in 0..100 {
            steering.update(1.0 / 60.0);
            assert!(steering.yaw() >= desired);
        }
        assert!((steering.yaw() - desired).abs() <= steering.config().tolerance);
    }

    #[test]
    fn returns_to_centre() {
        let mut steering = Steering::new(SteeringConfig::default());
        steering.set_target_turn(1.0);
        steering.update(1.0);
        steering.set_target_turn(0.0);
        steering.update(1.0);
        assert_abs_diff_eq!(steering.current_yaw(), 0.0);
    }

    #[test]
    fn small_yaw_reads_as_straight() {
        let mut steering = Steering::new(SteeringConfig::default());
        steering.set_target_turn(0.05);
        steering.update(0.005);
        assert!(steering.yaw() < 0.0);
        assert_abs_diff_eq!(steering.current_yaw(), 0.0);
    }

    #[test]
    fn input_is_clamped() {
        let mut steering = Steering::new(SteeringConfig::default());
        steering.set_target_turn(4.0);
        assert_abs_diff_eq!(steering.target_turn(), 1.0);
        steering.set_target_turn(f64::NAN);
        assert_abs_diff_eq!(steering.target_turn(), 0.0);
    }

    #[test]
    fn rejects_bad_limits() {
        let config = SteeringConfig {
            angle_limit: 2.0,
            ..SteeringConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
