mod continuity;
mod description;
mod waypoint;

pub use description::{PathDescription, SegmentDescription};
pub use waypoint::Waypoint;

use std::path::Path as FsPath;

use tracing::{debug, info, warn};

use crate::error::{LoadError, Result};
use crate::geometry::curve::{is_valid_length, Derivative, Segment, UNINITIALISED_LENGTH};
use crate::math::Vector3;

/// Arc-length samples per segment used when a description leaves it unset.
pub const DEFAULT_SAMPLES_PER_SEGMENT: u32 = 100;

/// An ordered chain of cubic Bezier [`Segment`]s.
///
/// Segments are traversed in load order and distance queries wrap around, so
/// a path behaves as a loop. The path owns its segments; followers refer to
/// them by index.
#[derive(Debug, Clone)]
pub struct Path {
    name: String,
    segments: Vec<Segment>,
    samples_per_segment: u32,
    length: f64,
    waypoints: Vec<Waypoint>,
    waypoint_scale: Vector3,
}

impl Default for Path {
    fn default() -> Self {
        Self {
            name: String::new(),
            segments: Vec::new(),
            samples_per_segment: DEFAULT_SAMPLES_PER_SEGMENT,
            length: UNINITIALISED_LENGTH,
            waypoints: Vec::new(),
            waypoint_scale: Vector3::repeat(1.0),
        }
    }
}

impl Path {
    /// Creates an empty, unusable path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a path directly from segments and calculates its length.
    ///
    /// Unlike [`load`](Self::load) this never fails: a path whose length is
    /// invalid is returned as is and reports `false` from [`is_usable`](Self::is_usable).
    #[must_use]
    pub fn from_segments(name: impl Into<String>, segments: Vec<Segment>, samples_per_segment: u32) -> Self {
        let mut path = Self {
            name: name.into(),
            segments,
            ..Self::default()
        };
        path.calculate_length(samples_per_segment);
        path.rebuild_waypoints();
        path
    }

    /// Builds a path from a description.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn from_description(description: &PathDescription) -> Result<Self> {
        let mut path = Self::new();
        path.load(description)?;
        Ok(path)
    }

    /// Reads a YAML path file and builds a path from it.
    ///
    /// # Errors
    ///
    /// See [`load_yaml_file`](Self::load_yaml_file).
    pub fn from_yaml_file<P: AsRef<FsPath>>(file: P) -> Result<Self> {
        let mut path = Self::new();
        path.load_yaml_file(file)?;
        Ok(path)
    }

    /// Replaces the contents of this path with the given description.
    ///
    /// Segments are built in order, optionally stitched for continuity, and
    /// measured. The load is all-or-nothing: on failure the path is left empty.
    /// A description with no segments loads successfully into an empty,
    /// unusable path.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::PointCount`] if a segment does not have exactly
    /// four points, or [`LoadError::InvalidLength`] if the segments have no
    /// valid length after sampling.
    pub fn load(&mut self, description: &PathDescription) -> Result<()> {
        self.clear();
        if let Err(e) = self.try_load(description) {
            warn!(path = %description.name, error = %e, "failed to load path");
            self.clear();
            return Err(e);
        }
        Ok(())
    }

    /// Reads a YAML path file and loads it, see [`load`](Self::load).
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] or [`LoadError::Parse`] if the file cannot be
    /// read or parsed, plus everything [`load`](Self::load) can return. The
    /// path is left empty on failure.
    pub fn load_yaml_file<P: AsRef<FsPath>>(&mut self, file: P) -> Result<()> {
        match PathDescription::from_yaml_file(file.as_ref()) {
            Ok(description) => self.load(&description),
            Err(e) => {
                warn!(file = %file.as_ref().display(), error = %e, "failed to read path file");
                self.clear();
                Err(e)
            }
        }
    }

    fn try_load(&mut self, description: &PathDescription) -> Result<()> {
        let samples = description.effective_samples();
        self.segments = description.to_segments()?;
        self.name.clone_from(&description.name);

        if description.force_continuity {
            continuity::stitch(&mut self.segments);
        }

        let length = self.calculate_length(samples);
        if !self.segments.is_empty() && !is_valid_length(length) {
            return Err(LoadError::InvalidLength { length }.into());
        }

        self.rebuild_waypoints();
        info!(
            path = %self.name,
            segments = self.segments.len(),
            length = self.length,
            "loaded path"
        );
        Ok(())
    }

    /// Measures every segment with `samples_per_segment` samples and sums the
    /// results.
    ///
    /// Stops at the first segment without a valid length and returns
    /// [`UNINITIALISED_LENGTH`]; a path without segments also returns it.
    pub fn calculate_length(&mut self, samples_per_segment: u32) -> f64 {
        self.samples_per_segment = samples_per_segment;

        let mut accumulator = if self.segments.is_empty() {
            UNINITIALISED_LENGTH
        } else {
            0.0
        };

        for (index, segment) in self.segments.iter_mut().enumerate() {
            let segment_length = segment.calculate_length(samples_per_segment);
            if !is_valid_length(segment_length) {
                debug!(segment = index, segment_length, "segment has no valid length");
                accumulator = UNINITIALISED_LENGTH;
                break;
            }
            accumulator += segment_length;
        }

        self.length = accumulator;
        self.length
    }

    /// Stitches each segment onto the end of its predecessor so the path has
    /// no positional gaps and no heading jumps, then re-measures it.
    ///
    /// Runs in segment order; every stitch sees the already-stitched
    /// predecessor.
    pub fn enforce_continuity(&mut self) {
        continuity::stitch(&mut self.segments);
        self.calculate_length(self.samples_per_segment);
        self.rebuild_waypoints();
    }

    /// Returns the segment at `index`, or `None` if out of range.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Index of the segment containing the given distance along the path.
    ///
    /// The distance wraps modulo the path length. If floating-point slack
    /// leaves the distance outside every segment interval, the first segment
    /// is returned. Returns `None` only for an unusable path.
    #[must_use]
    pub fn segment_index_by_distance(&self, distance: f64) -> Option<usize> {
        if !self.is_usable() {
            return None;
        }

        let working = distance.rem_euclid(self.length);
        let mut previous = 0.0;

        for (index, segment) in self.segments.iter().enumerate() {
            let current = previous + segment.length();
            if working >= previous && working < current {
                return Some(index);
            }
            previous = current;
        }

        Some(0)
    }

    /// The segment containing the given distance, see
    /// [`segment_index_by_distance`](Self::segment_index_by_distance).
    #[must_use]
    pub fn segment_by_distance(&self, distance: f64) -> Option<&Segment> {
        self.segment_index_by_distance(distance)
            .and_then(|index| self.segment(index))
    }

    /// Evaluates segment `index` at `t`, or `None` if the index is out of range.
    #[must_use]
    pub fn curve_point(&self, index: usize, t: f64, derivative: Derivative) -> Option<Vector3> {
        self.segment(index)
            .map(|segment| segment.curve_point(t, derivative))
    }

    /// Name given by the description.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All segments in traversal order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Total arc length, or [`UNINITIALISED_LENGTH`].
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Samples per segment used by the last length calculation.
    #[must_use]
    pub fn samples_per_segment(&self) -> u32 {
        self.samples_per_segment
    }

    /// Whether the path has segments and a valid total length.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.segments.is_empty() && is_valid_length(self.length)
    }

    /// Markers on every control point, in segment order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    #[must_use]
    pub fn waypoint_scale(&self) -> &Vector3 {
        &self.waypoint_scale
    }

    /// Sets the scale of current and future waypoint markers.
    pub fn set_waypoint_scale(&mut self, scale: Vector3) {
        self.waypoint_scale = scale;
        for waypoint in &mut self.waypoints {
            waypoint.set_scale(scale);
        }
    }

    fn rebuild_waypoints(&mut self) {
        self.waypoints = self
            .segments
            .iter()
            .enumerate()
            .flat_map(|(segment_index, segment)| {
                segment.points().iter().enumerate().map(move |(point_index, point)| {
                    (segment_index, point_index, *point)
                })
            })
            .map(|(segment_index, point_index, point)| {
                Waypoint::new(
                    format!("{}-Waypoint-{segment_index}-{point_index}", self.name),
                    point,
                    self.waypoint_scale,
                )
            })
            .collect();
    }

    fn clear(&mut self) {
        self.name.clear();
        self.segments.clear();
        self.waypoints.clear();
        self.length = UNINITIALISED_LENGTH;
    }
}
