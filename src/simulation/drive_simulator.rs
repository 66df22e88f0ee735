use tracing::trace;

use crate::actor::Actor;
use crate::error::Result;
use crate::vehicle::{Badger, BadgerConfig};

use super::Simulator;

/// Held direction keys for manual driving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl DriveInput {
    /// `1.0` forward, `-1.0` backward, `0.0` for neither or both.
    #[must_use]
    pub fn speed_rate(&self) -> f64 {
        axis(self.forward, self.backward)
    }

    /// `1.0` right, `-1.0` left, `0.0` for neither or both.
    #[must_use]
    pub fn turn_rate(&self) -> f64 {
        axis(self.right, self.left)
    }
}

fn axis(positive: bool, negative: bool) -> f64 {
    f64::from(u8::from(positive)) - f64::from(u8::from(negative))
}

/// Drives a [`Badger`] from [`DriveInput`].
#[derive(Debug, Clone)]
pub struct DriveSimulator {
    badger: Badger,
    input: DriveInput,
    speed_rate: f64,
    turn_rate: f64,
}

impl DriveSimulator {
    #[must_use]
    pub fn new(config: BadgerConfig) -> Self {
        Self {
            badger: Badger::new(config),
            input: DriveInput::default(),
            speed_rate: 0.0,
            turn_rate: 0.0,
        }
    }

    /// Replaces the held keys; takes effect on the next update.
    pub fn set_input(&mut self, input: DriveInput) {
        self.input = input;
    }

    #[must_use]
    pub fn input(&self) -> DriveInput {
        self.input
    }

    #[must_use]
    pub fn badger(&self) -> &Badger {
        &self.badger
    }

    /// Forwards the rates to the vehicle only when they change.
    fn apply_input(&mut self) {
        let speed_rate = self.input.speed_rate();
        if speed_rate.to_bits() != self.speed_rate.to_bits() {
            trace!(speed_rate, "speed input changed");
            self.speed_rate = speed_rate;
            self.badger.set_speed_rate(speed_rate);
        }

        let turn_rate = self.input.turn_rate();
        if turn_rate.to_bits() != self.turn_rate.to_bits() {
            trace!(turn_rate, "turn input changed");
            self.turn_rate = turn_rate;
            self.badger.set_turn_rate(turn_rate);
        }
    }
}

impl Simulator for DriveSimulator {
    fn reset(&mut self) {
        self.badger.reset();
        self.input = DriveInput::default();
        self.speed_rate = 0.0;
        self.turn_rate = 0.0;
    }

    fn update(&mut self, delta_time: f64) -> Result<()> {
        self.apply_input();
        self.badger.update_simulation(delta_time);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn opposing_keys_cancel() {
        let input = DriveInput {
            forward: true,
            backward: true,
            left: true,
            right: false,
        };
        assert_abs_diff_eq!(input.speed_rate(), 0.0);
        assert_abs_diff_eq!(input.turn_rate(), -1.0);
    }

    #[test]
    fn forward_key_accelerates() {
        let mut sim = DriveSimulator::new(BadgerConfig::default());
        let start = sim.badger().pose().position;
        sim.set_input(DriveInput {
            forward: true,
            ..DriveInput::default()
        });

        for _ in 0..60 {
            sim.update(1.0 / 60.0).unwrap();
        }
        assert_abs_diff_eq!(sim.badger().current_speed(), 15.0, epsilon = 1e-9);
        assert!(sim.badger().pose().position.z > start.z);
    }

    #[test]
    fn released_keys_coast_down() {
        let mut sim = DriveSimulator::new(BadgerConfig::default());
        sim.set_input(DriveInput {
            forward: true,
            right: true,
            ..DriveInput::default()
        });
        sim.update(1.0).unwrap();
        assert!(sim.badger().handle_bar().current_yaw() < 0.0);

        sim.set_input(DriveInput::default());
        sim.update(0.5).unwrap();
        assert_abs_diff_eq!(sim.badger().target_speed_rate(), 0.0);
        assert_abs_diff_eq!(sim.badger().current_speed(), 7.5, epsilon = 1e-9);
    }

    #[test]
    fn reset_clears_input() {
        let mut sim = DriveSimulator::new(BadgerConfig::default());
        sim.set_input(DriveInput {
            backward: true,
            ..DriveInput::default()
        });
        sim.update(1.0).unwrap();
        assert!(sim.badger().current_speed() < 0.0);

        sim.reset();
        assert_eq!(sim.input(), DriveInput::default());
        assert_abs_diff_eq!(sim.badger().current_speed(), 0.0);
    }
}
