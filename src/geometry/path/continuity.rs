use tracing::debug;

use crate::geometry::curve::Segment;
use crate::math::rotation::{yaw_between, yaw_rotation};

/// Stitches every segment onto the end of its predecessor, in order.
///
/// Each segment is first yawed about its own start point so that its entry
/// direction lines up with the predecessor's exit direction (horizontal
/// components only), then translated so that its start point coincides with
/// the predecessor's end point. Tangent magnitudes are left untouched.
pub(super) fn stitch(segments: &mut [Segment]) {
    for index in 1..segments.len() {
        let (stitched, rest) = segments.split_at_mut(index);
        stitch_pair(&stitched[index - 1], &mut rest[0], index);
    }
}

fn stitch_pair(previous: &Segment, current: &mut Segment, index: usize) {
    let pivot = current.points()[0];

    match yaw_between(&current.entry_direction(), &previous.exit_direction()) {
        Some(angle) => {
            debug!(segment = index, angle, "yawing segment onto previous exit");
            current.rotate_about(&pivot, &yaw_rotation(angle));
        }
        None => {
            debug!(segment = index, "no horizontal direction to align, translating only");
        }
    }

    current.move_start_to(&previous.points()[3]);
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::{Point3, Vector3};

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn aligns_start_and_direction() {
        // A ends at (1,0,0) heading +X; B starts at (5,0,0) heading +Z.
        let a = Segment::new(p(-2.0, 0.0, 0.0), p(-1.0, 0.0, 0.0), p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0));
        let b = Segment::new(p(5.0, 0.0, 0.0), p(5.0, 0.0, 1.0), p(6.0, 0.0, 2.0), p(7.0, 0.0, 2.0));
        let mut segments = vec![a.clone(), b];

        stitch(&mut segments);

        assert_eq!(segments[0], a);
        assert_eq!(segments[1].points()[0], segments[0].points()[3]);

        let exit = segments[0].exit_direction().normalize();
        let entry = segments[1].entry_direction().normalize();
        assert!(exit.cross(&entry).norm() < 1e-12);
        assert!(exit.dot(&entry) > 0.0);
    }

    #[test]
    fn preserves_segment_shape() {
        let a = Segment::new(p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0), p(0.0, 0.0, 2.0), p(0.0, 0.0, 3.0));
        let b = Segment::new(p(10.0, 1.0, 10.0), p(11.0, 1.0, 10.0), p(12.0, 2.0, 11.0), p(13.0, 2.0, 13.0));
        let chord_before = (b.points()[3] - b.points()[0]).norm();
        let height_before = b.points()[3].y - b.points()[0].y;
        let mut segments = vec![a, b];

        stitch(&mut segments);

        let stitched = &segments[1];
        assert_abs_diff_eq!((stitched.points()[3] - stitched.points()[0]).norm(), chord_before, epsilon = 1e-9);
        // Yaw-only rotation keeps heights relative to the start point.
        assert_abs_diff_eq!(stitched.points()[3].y - stitched.points()[0].y, height_before, epsilon = 1e-12);
    }

    #[test]
    fn stitches_against_already_stitched_predecessor() {
        let straight = |x: f64| {
            Segment::new(p(x, 0.0, 0.0), p(x, 0.0, 1.0), p(x, 0.0, 2.0), p(x, 0.0, 3.0))
        };
        let mut segments = vec![straight(0.0), straight(50.0), straight(-20.0)];

        stitch(&mut segments);

        assert_abs_diff_eq!(segments[1].points()[0], p(0.0, 0.0, 3.0), epsilon = 1e-12);
        assert_abs_diff_eq!(segments[2].points()[0], p(0.0, 0.0, 6.0), epsilon = 1e-12);
        assert_abs_diff_eq!(segments[2].points()[3], p(0.0, 0.0, 9.0), epsilon = 1e-12);
    }

    #[test]
    fn vertical_entry_is_translated_only() {
        let a = Segment::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(3.0, 0.0, 0.0));
        let b = Segment::new(p(0.0, 5.0, 0.0), p(0.0, 6.0, 0.0), p(0.0, 7.0, 0.0), p(1.0, 8.0, 0.0));
        let mut segments = vec![a, b];

        stitch(&mut segments);

        assert_abs_diff_eq!(segments[1].entry_direction(), Vector3::y(), epsilon = 1e-12);
        assert_abs_diff_eq!(segments[1].points()[3], p(4.0, 3.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn single_segment_is_untouched() {
        let a = Segment::new(p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0), p(3.0, 0.0, 0.0));
        let mut segments = vec![a.clone()];
        stitch(&mut segments);
        assert_eq!(segments[0], a);
    }
}
