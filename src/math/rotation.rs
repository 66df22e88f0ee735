use std::f64::consts::{PI, TAU};

use super::{Point3, Rotation, Vector3, TOLERANCE};

/// Returns the yaw of `direction` around `+Y` (the vertical axis), measured
/// from `+Z` (forward) towards `+X`.
///
/// Returns `None` when the direction has no horizontal component.
#[must_use]
pub fn yaw_of(direction: &Vector3) -> Option<f64> {
    if direction.x.hypot(direction.z) < TOLERANCE {
        return None;
    }
    Some(direction.x.atan2(direction.z))
}

/// Signed yaw angle that turns `from` onto `to` when both are projected onto
/// the horizontal plane. The result lies in `(-pi, pi]`.
#[must_use]
pub fn yaw_between(from: &Vector3, to: &Vector3) -> Option<f64> {
    let angle = yaw_of(to)? - yaw_of(from)?;
    Some(wrap_angle(angle))
}

/// Wraps an angle in radians into `(-pi, pi]`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Rotation by `angle` radians around the vertical axis.
#[must_use]
pub fn yaw_rotation(angle: f64) -> Rotation {
    Rotation::from_axis_angle(&Vector3::y_axis(), angle)
}

/// Rotates `point` around `pivot`.
#[must_use]
pub fn rotate_about(point: &Point3, pivot: &Point3, rotation: &Rotation) -> Point3 {
    pivot + rotation * (point - pivot)
}

/// Orientation whose local `+Z` axis points along `direction`, keeping `+Y` up
/// where possible.
///
/// Returns `None` for a zero-length direction.
#[must_use]
pub fn facing(direction: &Vector3) -> Option<Rotation> {
    let dir = direction.try_normalize(TOLERANCE)?;
    if dir.cross(&Vector3::y()).norm() < TOLERANCE {
        // Straight up or down: no horizontal heading to preserve.
        return Rotation::rotation_between(&Vector3::z(), &dir);
    }
    Some(Rotation::face_towards(&dir, &Vector3::y()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn yaw_of_axes() {
        assert_abs_diff_eq!(yaw_of(&Vector3::z()).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(yaw_of(&Vector3::x()).unwrap(), FRAC_PI_2, epsilon = 1e-12);
        assert!(yaw_of(&Vector3::y()).is_none());
    }

    #[test]
    fn yaw_between_z_and_x() {
        let angle = yaw_between(&Vector3::z(), &Vector3::x()).unwrap();
        assert_abs_diff_eq!(angle, FRAC_PI_2, epsilon = 1e-12);

        // Rotating +Z by that angle lands on +X.
        let rotated = yaw_rotation(angle) * Vector3::z();
        assert_abs_diff_eq!(rotated, Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn yaw_between_takes_short_way_round() {
        let from = Vector3::new(0.01, 0.0, -1.0);
        let to = Vector3::new(-0.01, 0.0, -1.0);
        let angle = yaw_between(&from, &to).unwrap();
        assert!(angle.abs() < 0.1, "angle={angle}");
    }

    #[test]
    fn wrap_angle_range() {
        assert_abs_diff_eq!(wrap_angle(3.0 * PI), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(-FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(TAU + 0.25), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn rotate_about_pivot() {
        let pivot = Point3::new(1.0, 0.0, 1.0);
        let point = Point3::new(1.0, 5.0, 2.0);
        let rotated = rotate_about(&point, &pivot, &yaw_rotation(FRAC_PI_2));
        assert_abs_diff_eq!(rotated, Point3::new(2.0, 5.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn facing_maps_forward_to_direction() {
        let dir = Vector3::new(3.0, 0.0, -4.0);
        let rotation = facing(&dir).unwrap();
        assert_abs_diff_eq!(rotation * Vector3::z(), dir / 5.0, epsilon = 1e-12);
    }

    #[test]
    fn facing_vertical_direction() {
        let rotation = facing(&Vector3::new(0.0, -2.0, 0.0)).unwrap();
        assert_abs_diff_eq!(rotation * Vector3::z(), -Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn facing_zero_is_none() {
        assert!(facing(&Vector3::zeros()).is_none());
    }
}
