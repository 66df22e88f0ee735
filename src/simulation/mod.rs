mod drive_simulator;
mod follower;
mod path_simulator;

pub use drive_simulator::{DriveInput, DriveSimulator};
pub use follower::{FollowerConfig, PathFollower};
pub use path_simulator::PathSimulator;

use crate::error::Result;

/// Something advanced once per frame.
pub trait Simulator {
    /// Returns to the initial state.
    fn reset(&mut self);

    /// Advances by `delta_time` seconds.
    ///
    /// # Errors
    ///
    /// Implementation specific; see each simulator.
    fn update(&mut self, delta_time: f64) -> Result<()>;
}

/// An ordered list of simulators updated together.
#[derive(Default)]
pub struct Simulation {
    simulators: Vec<Box<dyn Simulator>>,
}

impl Simulation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<S: Simulator + 'static>(&mut self, simulator: S) {
        self.simulators.push(Box::new(simulator));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.simulators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.simulators.is_empty()
    }

    pub fn reset(&mut self) {
        for simulator in &mut self.simulators {
            simulator.reset();
        }
    }

    /// Updates every simulator in insertion order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first simulator error.
    pub fn update(&mut self, delta_time: f64) -> Result<()> {
        self.simulators
            .iter_mut()
            .try_for_each(|simulator| simulator.update(delta_time))
    }
}
