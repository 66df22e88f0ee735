use crate::actor::{Actor, Pose};
use crate::math::rotation::yaw_rotation;
use crate::math::{Point3, Rotation, Vector3};

use super::steering::{Steering, SteeringConfig};

/// Mount point on the body, in body units.
const MOUNT: [f64; 3] = [0.0, 0.0182, 0.01];

/// Backward rake of the steering column, in degrees.
const RAKE_DEGREES: f64 = -37.784;

/// The steered handle bar. Its yaw decides how sharply the body turns.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleBar {
    pose: Pose,
    rake: Rotation,
    steering: Steering,
}

impl HandleBar {
    #[must_use]
    pub fn new(steering: SteeringConfig) -> Self {
        let rake = Rotation::from_axis_angle(&Vector3::x_axis(), RAKE_DEGREES.to_radians());
        let mut bar = Self {
            pose: Pose::at(Point3::from(MOUNT)),
            rake,
            steering: Steering::new(steering),
        };
        bar.refresh_pose();
        bar
    }

    pub fn set_target_turn(&mut self, turn: f64) {
        self.steering.set_target_turn(turn);
    }

    /// Steering yaw, zero inside the tolerance band.
    #[must_use]
    pub fn current_yaw(&self) -> f64 {
        self.steering.current_yaw()
    }

    #[must_use]
    pub fn steering(&self) -> &Steering {
        &self.steering
    }

    fn refresh_pose(&mut self) {
        // Yaw about the raked column axis.
        self.pose.orientation = self.rake * yaw_rotation(self.steering.yaw());
    }
}

impl Actor for HandleBar {
    fn pose(&self) -> &Pose {
        &self.pose
    }

    fn reset(&mut self) {
        self.steering.reset();
        self.refresh_pose();
    }

    fn update_simulation(&mut self, delta_time: f64) {
        self.steering.update(delta_time);
        self.refresh_pose();
    }
}
