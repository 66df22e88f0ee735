use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the Badger path simulation.
#[derive(Debug, Error)]
pub enum BadgerError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Follow(#[from] FollowError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to curve evaluation and control point access.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("control point index {index} is out of range [0, {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised while loading a path description.
///
/// Any of these leaves the target [`Path`](crate::geometry::Path) empty.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read path file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed path description: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("segment {segment} has {found} points, every segment needs exactly 4")]
    PointCount { segment: usize, found: usize },

    #[error("path has no valid length after sampling (got {length})")]
    InvalidLength { length: f64 },
}

/// Errors raised by the path follower.
#[derive(Debug, Error)]
pub enum FollowError {
    #[error("path has no segments to follow")]
    EmptyPath,

    #[error("path has no usable length")]
    UnusablePath,

    #[error("segment {0} not found in path")]
    SegmentNotFound(usize),
}

/// Errors related to simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Convenience type alias for results using [`BadgerError`].
pub type Result<T> = std::result::Result<T, BadgerError>;
