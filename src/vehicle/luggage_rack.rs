use crate::actor::{Actor, Pose};
use crate::math::Point3;

/// Static rack on the rear of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct LuggageRack {
    pose: Pose,
}

impl Default for LuggageRack {
    fn default() -> Self {
        Self {
            pose: Pose::at(Point3::new(0.0, 0.018, -0.024)),
        }
    }
}

impl Actor for LuggageRack {
    fn pose(&self) -> &Pose {
        &self.pose
    }
}
