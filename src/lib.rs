pub mod actor;
pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod simulation;
pub mod vehicle;

pub use error::{BadgerError, Result};
