use crate::math::{Point3, Rotation, Vector3};

/// Position, orientation and scale of an in-scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point3,
    pub orientation: Rotation,
    pub scale: Vector3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            orientation: Rotation::identity(),
            scale: Vector3::repeat(1.0),
        }
    }
}

impl Pose {
    /// Creates an unrotated, unit-scaled pose at `position`.
    #[must_use]
    pub fn at(position: Point3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Returns the pose with its orientation replaced.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Rotation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Returns the pose with its scale replaced.
    #[must_use]
    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    /// The local `+Z` axis in parent space.
    #[must_use]
    pub fn forward(&self) -> Vector3 {
        self.orientation * Vector3::z()
    }
}

/// An object living in the simulated scene.
///
/// Implemented by the vehicle body, its wheels and handle bar, and static
/// props such as the luggage rack and path waypoints.
pub trait Actor {
    /// Current pose, relative to the parent object.
    fn pose(&self) -> &Pose;

    /// Restores the initial state.
    fn reset(&mut self) {}

    /// Advances physics by `delta_time` seconds.
    fn update_simulation(&mut self, _delta_time: f64) {}
}

/// Something a [`PathFollower`](crate::simulation::PathFollower) can drive.
pub trait Drivable {
    /// Places the entity at `position`.
    fn set_position(&mut self, position: Point3);

    /// Turns the entity so that its forward axis points along `direction`
    /// (unit length).
    fn set_direction(&mut self, direction: Vector3);

    /// Notifies the entity that it travelled `distance` this frame, for
    /// cosmetic effects such as wheel spin.
    fn advance_visual(&mut self, _distance: f64) {}
}
