use crate::actor::{Actor, Pose};
use crate::math::{Point3, Vector3};

/// A static marker placed on one control point of a loaded path.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    name: String,
    pose: Pose,
}

impl Waypoint {
    /// Creates a marker named `name` at `position`.
    #[must_use]
    pub fn new(name: String, position: Point3, scale: Vector3) -> Self {
        Self {
            name,
            pose: Pose::at(position).with_scale(scale),
        }
    }

    /// Unique marker name, `"{path}-Waypoint-{segment}-{point}"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(super) fn set_scale(&mut self, scale: Vector3) {
        self.pose.scale = scale;
    }
}

impl Actor for Waypoint {
    fn pose(&self) -> &Pose {
        &self.pose
    }
}
