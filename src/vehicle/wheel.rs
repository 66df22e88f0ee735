use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::actor::{Actor, Pose};
use crate::math::rotation::yaw_rotation;
use crate::math::{Point3, Rotation, Vector3};

use super::steering::{Steering, SteeringConfig};

/// Side of the vehicle a wheel is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelSide {
    Left,
    Right,
}

impl WheelSide {
    /// Even mount indices are on the left.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// Sign applied to spin so both sides roll forward together.
    #[must_use]
    pub fn revolve_modifier(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }

    /// Roll applied when mounting so the tyre faces outward.
    #[must_use]
    pub fn mount_orientation(self) -> Rotation {
        let angle = match self {
            Self::Left => -FRAC_PI_2,
            Self::Right => FRAC_PI_2,
        };
        Rotation::from_axis_angle(&Vector3::z_axis(), angle)
    }
}

/// A wheel: spins with distance travelled and, when steered, yaws with the
/// handle bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Wheel {
    pose: Pose,
    mount: Point3,
    side: WheelSide,
    diameter: f64,
    spin: f64,
    steering: Steering,
}

impl Wheel {
    #[must_use]
    pub fn new(mount: Point3, side: WheelSide, diameter: f64, steering: SteeringConfig) -> Self {
        let mut wheel = Self {
            pose: Pose::at(mount),
            mount,
            side,
            diameter,
            spin: 0.0,
            steering: Steering::new(steering),
        };
        wheel.refresh_pose();
        wheel
    }

    /// Spins the wheel for `distance` travelled along the ground.
    pub fn revolve(&mut self, distance: f64) {
        if self.diameter <= 0.0 {
            return;
        }
        let angle = TAU * distance / (self.diameter * PI) * self.side.revolve_modifier();
        self.spin = (self.spin + angle).rem_euclid(TAU);
        self.refresh_pose();
    }

    /// Steering input in `[-1, 1]`.
    pub fn set_target_turn(&mut self, turn: f64) {
        self.steering.set_target_turn(turn);
    }

    #[must_use]
    pub fn side(&self) -> WheelSide {
        self.side
    }

    /// Accumulated spin angle in `[0, 2pi)`.
    #[must_use]
    pub fn spin(&self) -> f64 {
        self.spin
    }

    #[must_use]
    pub fn steering(&self) -> &Steering {
        &self.steering
    }

    fn refresh_pose(&mut self) {
        // Steer in the parent frame, then roll about the mounted axle.
        self.pose.position = self.mount;
        self.pose.orientation = yaw_rotation(self.steering.yaw())
            * self.side.mount_orientation()
            * Rotation::from_axis_angle(&Vector3::y_axis(), self.spin);
    }
}

impl Actor for Wheel {
    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn reset(&mut self) {
        self.steering.reset();
        self.spin = 0.0;
        self.refresh_pose();
    }

    fn update_simulation(&mut self, delta_time: f64) {
        self.steering.update(delta_time);
        self.refresh_pose();
    }
}
