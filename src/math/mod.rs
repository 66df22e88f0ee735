pub mod rotation;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Orientation type (unit quaternion).
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Checks whether two values lie within `margin` of each other.
#[must_use]
pub fn roughly_equals(lhs: f64, rhs: f64, margin: f64) -> bool {
    (lhs - rhs).abs() <= margin
}

/// Converts a plain coordinate triple into a [`Point3`].
#[must_use]
pub fn point_from_array(coords: [f64; 3]) -> Point3 {
    Point3::new(coords[0], coords[1], coords[2])
}
