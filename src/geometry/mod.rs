pub mod curve;
pub mod path;

pub use curve::{Curve, CurveDomain, Derivative, Segment};
pub use path::{Path, PathDescription, SegmentDescription, Waypoint};
