use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actor::{Actor, Drivable, Pose};
use crate::error::ConfigError;
use crate::math::rotation::{facing, yaw_rotation};
use crate::math::{point_from_array, roughly_equals, Point3, Vector3, TOLERANCE};

use super::handle_bar::HandleBar;
use super::luggage_rack::LuggageRack;
use super::steering::SteeringConfig;
use super::wheel::{Wheel, WheelSide};

/// Wheel mount points in body units. Indices 0 and 1 are the steered pair.
const WHEEL_MOUNTS: [[f64; 3]; 4] = [
    [0.012, 0.005, 0.018],
    [-0.012, 0.005, 0.018],
    [0.012, 0.005, -0.018],
    [-0.012, 0.005, -0.018],
];

/// Speed-rate changes smaller than this are not worth an update.
const RATE_TOLERANCE: f64 = 0.001;

/// Physical tuning of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgerConfig {
    /// Distance between axles; shorter turns sharper.
    pub wheel_base: f64,
    /// Speed gained per second when accelerating.
    pub acceleration: f64,
    /// Speed lost per second when braking against the direction of travel.
    pub brake_power: f64,
    /// Speed at a rate of `1.0`.
    pub max_speed: f64,
    pub wheel_diameter: f64,
    pub spawn_position: [f64; 3],
    pub steering: SteeringConfig,
}

impl Default for BadgerConfig {
    fn default() -> Self {
        Self {
            wheel_base: 8.0,
            acceleration: 15.0,
            brake_power: 50.0,
            max_speed: 80.0,
            wheel_diameter: 7.0,
            spawn_position: [0.0, 4.0, 0.0],
            steering: SteeringConfig::default(),
        }
    }
}

impl BadgerConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("wheel_base", self.wheel_base),
            ("acceleration", self.acceleration),
            ("brake_power", self.brake_power),
            ("max_speed", self.max_speed),
            ("wheel_diameter", self.wheel_diameter),
        ];
        if let Some((name, _)) = positive
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        {
            return Err(ConfigError::Invalid(format!("badger.{name} must be positive")));
        }
        if !self.spawn_position.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid(
                "badger.spawn_position must be finite".to_owned(),
            ));
        }
        self.steering.validate()
    }
}

/// The Badger vehicle: a body with a steered handle bar, four wheels and a
/// luggage rack.
///
/// Driven either manually, through [`set_speed_rate`](Self::set_speed_rate) and
/// [`set_turn_rate`](Self::set_turn_rate) followed by
/// [`update_simulation`](Actor::update_simulation), or by a path follower
/// through [`Drivable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Badger {
    config: BadgerConfig,
    pose: Pose,
    max_speed: f64,
    current_speed: f64,
    target_speed_rate: f64,
    handle_bar: HandleBar,
    luggage_rack: LuggageRack,
    wheels: [Wheel; 4],
}

impl Badger {
    #[must_use]
    pub fn new(config: BadgerConfig) -> Self {
        let wheels = std::array::from_fn(|index| {
            Wheel::new(
                point_from_array(WHEEL_MOUNTS[index]),
                WheelSide::from_index(index),
                config.wheel_diameter,
                config.steering,
            )
        });
        Self {
            config,
            pose: Pose::at(point_from_array(config.spawn_position)),
            max_speed: config.max_speed,
            current_speed: 0.0,
            target_speed_rate: 0.0,
            handle_bar: HandleBar::new(config.steering),
            luggage_rack: LuggageRack::default(),
            wheels,
        }
    }

    /// Throttle in `[-1, 1]`; negative reverses.
    pub fn set_speed_rate(&mut self, rate: f64) {
        self.target_speed_rate = if rate.is_nan() { 0.0 } else { rate.clamp(-1.0, 1.0) };
    }

    /// Steering in `[-1, 1]`; positive turns right. Applies to the handle bar
    /// and the front wheels.
    pub fn set_turn_rate(&mut self, rate: f64) {
        self.handle_bar.set_target_turn(rate);
        for wheel in &mut self.wheels[..2] {
            wheel.set_target_turn(rate);
        }
    }

    /// Sets the top speed, clamping the current speed to it.
    pub fn set_max_speed(&mut self, max_speed: f64) {
        if !max_speed.is_finite() {
            return;
        }
        self.max_speed = max_speed.abs();
        self.current_speed = self.current_speed.clamp(-self.max_speed, self.max_speed);
    }

    /// Spins every wheel for `distance` travelled.
    pub fn revolve_wheels(&mut self, distance: f64) {
        for wheel in &mut self.wheels {
            wheel.revolve(distance);
        }
    }

    #[must_use]
    pub fn config(&self) -> &BadgerConfig {
        &self.config
    }

    #[must_use]
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Signed speed along the forward axis.
    #[must_use]
    pub fn current_speed(&self) -> f64 {
        self.current_speed
    }

    #[must_use]
    pub fn target_speed_rate(&self) -> f64 {
        self.target_speed_rate
    }

    #[must_use]
    pub fn handle_bar(&self) -> &HandleBar {
        &self.handle_bar
    }

    #[must_use]
    pub fn luggage_rack(&self) -> &LuggageRack {
        &self.luggage_rack
    }

    #[must_use]
    pub fn wheels(&self) -> &[Wheel; 4] {
        &self.wheels
    }

    /// Moves the current speed towards `target_speed_rate * max_speed`.
    ///
    /// Against the direction of travel the vehicle brakes at `brake_power`
    /// until it stops, then spends what is left of the frame accelerating the
    /// other way.
    fn update_speed(&mut self, delta_time: f64) {
        if self.max_speed <= 0.0 {
            return;
        }
        let current_rate = self.current_speed / self.max_speed;
        if roughly_equals(current_rate, self.target_speed_rate, RATE_TOLERANCE) {
            return;
        }

        let target_speed = self.target_speed_rate * self.max_speed;
        let direction = if target_speed > self.current_speed { 1.0 } else { -1.0 };
        let reversing = (self.current_speed > 0.0 && target_speed < 0.0)
            || (self.current_speed < 0.0 && target_speed > 0.0);

        let change = if reversing {
            let speed = self.current_speed.abs();
            let time_to_stop = speed / self.config.brake_power;
            if time_to_stop < delta_time {
                speed + self.config.acceleration * (delta_time - time_to_stop)
            } else {
                self.config.brake_power * delta_time
            }
        } else {
            self.config.acceleration * delta_time
        };

        let next = self.current_speed + change * direction;
        self.current_speed = if direction > 0.0 {
            next.min(target_speed)
        } else {
            next.max(target_speed)
        }
        .clamp(-self.max_speed, self.max_speed);
    }

    fn move_forward(&mut self, distance: f64) {
        if distance.abs() <= TOLERANCE {
            return;
        }
        self.pose.position += self.pose.forward() * distance;
        self.revolve_wheels(distance);
    }

    /// Yaws the body for `distance` travelled with the current handle bar
    /// angle.
    fn turn(&mut self, distance: f64) {
        let angle = distance * self.handle_bar.current_yaw().sin() / self.config.wheel_base;
        if angle.abs() <= TOLERANCE {
            return;
        }
        self.pose.orientation *= yaw_rotation(angle);
    }
}

impl Actor for Badger {
    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn reset(&mut self) {
        self.pose = Pose::at(point_from_array(self.config.spawn_position));
        self.max_speed = self.config.max_speed;
        self.current_speed = 0.0;
        self.target_speed_rate = 0.0;
        self.handle_bar.reset();
        for wheel in &mut self.wheels {
            wheel.reset();
        }
    }

    fn update_simulation(&mut self, delta_time: f64) {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return;
        }
        self.update_speed(delta_time);

        let distance = self.current_speed * delta_time;
        self.move_forward(distance);
        self.turn(distance);

        self.handle_bar.update_simulation(delta_time);
        for wheel in &mut self.wheels {
            wheel.update_simulation(delta_time);
        }
    }
}

impl Drivable for Badger {
    fn set_position(&mut self, position: Point3) {
        self.pose.position = position;
    }

    fn set_direction(&mut self, direction: Vector3) {
        match facing(&direction) {
            Some(orientation) => self.pose.orientation = orientation,
            None => debug!("ignoring zero-length heading"),
        }
    }

    fn advance_visual(&mut self, distance: f64) {
        self.revolve_wheels(distance);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    fn badger() -> Badger {
        Badger::new(BadgerConfig::default())
    }

    #[test]
    fn spawns_at_rest() {
        let b = badger();
        assert_eq!(b.pose().position, Point3::new(0.0, 4.0, 0.0));
        assert_abs_diff_eq!(b.current_speed(), 0.0);
        assert_abs_diff_eq!(b.max_speed(), 80.0);
        assert_eq!(b.wheels()[0].side(), WheelSide::Left);
        assert_eq!(b.wheels()[3].side(), WheelSide::Right);
    }

    #[test]
    fn accelerates_without_overshooting() {
        let mut b = badger();
        b.set_speed_rate(0.1);

        b.update_simulation(0.2);
        assert_abs_diff_eq!(b.current_speed(), 3.0, epsilon = 1e-12);

        for _ in 0..120 {
            b.update_simulation(FRAME);
        }
        assert_abs_diff_eq!(b.current_speed(), 8.0, epsilon = 1e-12);
        assert!(b.pose().position.z > 0.0);
    }

    #[test]
    fn brakes_before_reversing() {
        let mut b = badger();
        b.set_speed_rate(1.0);
        for _ in 0..60 {
            b.update_simulation(FRAME);
        }
        assert_abs_diff_eq!(b.current_speed(), 15.0, epsilon = 1e-9);

        b.set_speed_rate(-1.0);
        b.update_simulation(0.1);
        assert_abs_diff_eq!(b.current_speed(), 10.0, epsilon = 1e-9);

        // Stops after another 0.2s, leaving 0.3s of reverse acceleration.
        b.update_simulation(0.5);
        assert_abs_diff_eq!(b.current_speed(), -4.5, epsilon = 1e-9);
    }

    #[test]
    fn coasting_input_is_held() {
        let mut b = badger();
        b.set_speed_rate(0.5);
        for _ in 0..600 {
            b.update_simulation(FRAME);
        }
        assert_abs_diff_eq!(b.current_speed(), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn steering_turns_the_body() {
        let mut b = badger();
        b.set_speed_rate(0.5);
        b.set_turn_rate(1.0);
        for _ in 0..60 {
            b.update_simulation(FRAME);
        }

        // Right turns head towards -X.
        let heading = b.pose().forward();
        assert!(heading.x < -0.1, "heading {heading:?}");
        assert_abs_diff_eq!(heading.y, 0.0, epsilon = 1e-9);
        assert!(b.handle_bar().current_yaw() < 0.0);
        assert!(b.wheels()[0].steering().yaw() < 0.0);
        assert_abs_diff_eq!(b.wheels()[2].steering().yaw(), 0.0);
    }

    #[test]
    fn max_speed_clamps_current_speed() {
        let mut b = badger();
        b.set_speed_rate(1.0);
        for _ in 0..300 {
            b.update_simulation(FRAME);
        }
        b.set_max_speed(20.0);
        assert_abs_diff_eq!(b.current_speed(), 20.0);
    }

    #[test]
    fn drivable_faces_heading() {
        let mut b = badger();
        b.set_position(Point3::new(1.0, 2.0, 3.0));
        b.set_direction(Vector3::x());
        assert_abs_diff_eq!(b.pose().forward(), Vector3::x(), epsilon = 1e-12);

        b.set_direction(Vector3::zeros());
        assert_abs_diff_eq!(b.pose().forward(), Vector3::x(), epsilon = 1e-12);

        b.advance_visual(7.0 * std::f64::consts::PI / 2.0);
        assert_abs_diff_eq!(b.wheels()[0].spin(), std::f64::consts::PI, epsilon = 1e-12);
    }

    #[test]
    fn reset_restores_spawn_state() {
        let mut b = badger();
        b.set_speed_rate(1.0);
        b.set_turn_rate(-1.0);
        b.set_max_speed(100.0);
        for _ in 0..60 {
            b.update_simulation(FRAME);
        }

        b.reset();
        assert_eq!(b.pose().position, Point3::new(0.0, 4.0, 0.0));
        assert_abs_diff_eq!(b.current_speed(), 0.0);
        assert_abs_diff_eq!(b.max_speed(), 80.0);
        assert_abs_diff_eq!(b.handle_bar().current_yaw(), 0.0);
    }

    #[test]
    fn config_validation() {
        assert!(BadgerConfig::default().validate().is_ok());
        let bad = BadgerConfig {
            brake_power: 0.0,
            ..BadgerConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
