use std::path::Path as FsPath;

use tracing::info;

use crate::actor::{Actor, Drivable};
use crate::config::SimulationConfig;
use crate::error::{FollowError, Result};
use crate::geometry::Path;
use crate::vehicle::Badger;

use super::{PathFollower, Simulator};

/// Top speed while on rails; the body's own limit does not apply.
const FOLLOW_MAX_SPEED: f64 = 100.0;

/// Drives a [`Badger`] around a loaded [`Path`].
#[derive(Debug, Clone)]
pub struct PathSimulator {
    path: Path,
    follower: PathFollower,
    badger: Badger,
}

impl PathSimulator {
    /// Takes ownership of `path` and places a new vehicle at its start.
    ///
    /// # Errors
    ///
    /// Returns [`FollowError::EmptyPath`] for a path with no segments and
    /// [`FollowError::UnusablePath`] for one without a positive length.
    pub fn new(path: Path, config: &SimulationConfig) -> Result<Self> {
        if path.segment_count() == 0 {
            return Err(FollowError::EmptyPath.into());
        }
        if !path.is_usable() {
            return Err(FollowError::UnusablePath.into());
        }

        let follower = PathFollower::new(&path, &config.follower)?;
        let mut simulator = Self {
            path,
            follower,
            badger: Badger::new(config.badger),
        };
        simulator.reset();

        info!(
            path = simulator.path.name(),
            segments = simulator.path.segment_count(),
            length = simulator.path.length(),
            "path simulator ready"
        );
        Ok(simulator)
    }

    /// Loads a path description from `file` and wraps it.
    ///
    /// # Errors
    ///
    /// Any load error from [`Path::from_yaml_file`], then as [`new`](Self::new).
    pub fn from_yaml_file<P: AsRef<FsPath>>(file: P, config: &SimulationConfig) -> Result<Self> {
        Self::new(Path::from_yaml_file(file)?, config)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn follower(&self) -> &PathFollower {
        &self.follower
    }

    /// Mutable access for speed changes.
    pub fn follower_mut(&mut self) -> &mut PathFollower {
        &mut self.follower
    }

    #[must_use]
    pub fn badger(&self) -> &Badger {
        &self.badger
    }
}

impl Simulator for PathSimulator {
    fn reset(&mut self) {
        self.follower.reset(&self.path);
        self.badger.reset();
        if let Some(start) = self.path.segment(0) {
            self.badger.set_position(start.points()[0]);
        }
        self.badger.set_max_speed(FOLLOW_MAX_SPEED);
    }

    /// # Errors
    ///
    /// Propagates [`PathFollower::update`] errors.
    fn update(&mut self, delta_time: f64) -> Result<()> {
        self.follower.update(&self.path, delta_time, &mut self.badger)
    }
}
