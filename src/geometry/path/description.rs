use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, Result};
use crate::geometry::curve::{Segment, CONTROL_POINT_COUNT};
use crate::math::point_from_array;

use super::{Path, DEFAULT_SAMPLES_PER_SEGMENT};

/// Control points of one segment, as written in a path file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDescription {
    pub points: Vec<[f64; 3]>,
}

/// A named path: sampling density, continuity flag and ordered segments.
///
/// ```yaml
/// name: Loop
/// samples_per_segment: 100
/// force_continuity: true
/// segments:
///   - points:
///       - [0.0, 0.0, 0.0]
///       - [10.0, 0.0, 0.0]
///       - [20.0, 0.0, 10.0]
///       - [30.0, 0.0, 10.0]
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathDescription {
    pub name: String,
    /// Arc-length samples per segment; `0` selects [`DEFAULT_SAMPLES_PER_SEGMENT`].
    pub samples_per_segment: u32,
    pub force_continuity: bool,
    pub segments: Vec<SegmentDescription>,
}

impl PathDescription {
    /// Parses a description from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] if the YAML is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| LoadError::Parse(e).into())
    }

    /// Reads and parses a description from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, or
    /// [`LoadError::Parse`] if its contents are malformed.
    pub fn from_yaml_file<P: AsRef<FsPath>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Serialises the description to a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] if serialisation fails.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| LoadError::Parse(e).into())
    }

    /// Describes an existing path, including its current (possibly stitched)
    /// control points.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self {
            name: path.name().to_owned(),
            samples_per_segment: path.samples_per_segment(),
            force_continuity: false,
            segments: path
                .segments()
                .iter()
                .map(|segment| SegmentDescription {
                    points: segment.points().iter().map(|p| [p.x, p.y, p.z]).collect(),
                })
                .collect(),
        }
    }

    /// The sampling density to use, substituting the default for `0`.
    #[must_use]
    pub fn effective_samples(&self) -> u32 {
        if self.samples_per_segment == 0 {
            DEFAULT_SAMPLES_PER_SEGMENT
        } else {
            self.samples_per_segment
        }
    }

    /// Builds the segments in file order.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::PointCount`] for the first segment that does not
    /// have exactly four points.
    pub fn to_segments(&self) -> Result<Vec<Segment>> {
        self.segments
            .iter()
            .enumerate()
            .map(|(index, segment)| {
                let points: [[f64; 3]; CONTROL_POINT_COUNT] =
                    segment.points.as_slice().try_into().map_err(|_| LoadError::PointCount {
                        segment: index,
                        found: segment.points.len(),
                    })?;
                Ok(Segment::from_points(points.map(point_from_array)))
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::BadgerError;
    use crate::math::Point3;

    const TWO_SEGMENTS: &str = r"
name: Test
samples_per_segment: 50
force_continuity: true
segments:
  - points:
      - [0.0, 0.0, 0.0]
      - [1.0, 0.0, 0.0]
      - [2.0, 0.0, 0.0]
      - [3.0, 0.0, 0.0]
  - points:
      - [3.0, 0.0, 0.0]
      - [4.0, 0.0, 1.0]
      - [5.0, 0.0, 2.0]
      - [6.0, 0.0, 3.0]
";

    #[test]
    fn parses_full_description() {
        let d = PathDescription::from_yaml_str(TWO_SEGMENTS).unwrap();
        assert_eq!(d.name, "Test");
        assert_eq!(d.effective_samples(), 50);
        assert!(d.force_continuity);
        assert_eq!(d.segments.len(), 2);

        let segments = d.to_segments().unwrap();
        assert_eq!(segments[1].points()[2], Point3::new(5.0, 0.0, 2.0));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let d = PathDescription::from_yaml_str("name: Empty").unwrap();
        assert_eq!(d.effective_samples(), DEFAULT_SAMPLES_PER_SEGMENT);
        assert!(!d.force_continuity);
        assert!(d.to_segments().unwrap().is_empty());
    }

    #[test]
    fn wrong_point_count_is_reported() {
        let yaml = r"
segments:
  - points: [[0, 0, 0], [1, 0, 0], [2, 0, 0], [3, 0, 0]]
  - points: [[0, 0, 0], [1, 0, 0], [2, 0, 0]]
";
        let d = PathDescription::from_yaml_str(yaml).unwrap();
        let err = d.to_segments().unwrap_err();
        assert!(matches!(
            err,
            BadgerError::Load(LoadError::PointCount { segment: 1, found: 3 })
        ));
    }

    #[test]
    fn malformed_point_is_a_parse_error() {
        let yaml = "segments:\n  - points: [[0, 0]]\n";
        let err = PathDescription::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, BadgerError::Load(LoadError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PathDescription::from_yaml_file("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, BadgerError::Load(LoadError::Io { .. })));
    }

    #[test]
    fn yaml_string_parses_back() {
        let d = PathDescription::from_yaml_str(TWO_SEGMENTS).unwrap();
        let yaml = d.to_yaml_string().unwrap();
        assert_eq!(PathDescription::from_yaml_str(&yaml).unwrap(), d);
    }
}
