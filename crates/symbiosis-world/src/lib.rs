//! World simulation engine.
//!
//! This module implements the bounded 2D grid where ants, snakes, frogs and
//! spiders move, feed, breed and incubate eggs, and the tick scheduler that
//! drives them.

pub mod grid;
pub mod nest;
pub mod animal;
pub mod egg;
pub mod movement;
pub mod feeding;
pub mod reproduction;
pub mod simulation;
pub mod collector;

pub use grid::Grid;
pub use nest::Nest;
pub use animal::Animal;
pub use egg::{Egg, EggState};
pub use simulation::{EventCounters, Simulation};
pub use collector::{DataCollector, PopulationRecorder};
