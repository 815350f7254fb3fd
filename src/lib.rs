//! Building thermal simulation on a pull-based computation graph.
//!
//! The heavy lifting lives in `envgraph-core` (the tick-indexed port/gate
//! engine) and `envgraph-components` (thermal physics modules). This crate
//! adds the domain model of a house, hourly weather ingestion and the
//! simulator that assembles and drives the whole graph.

pub mod errors;
pub mod house;
pub mod simulator;
pub mod weather;

pub use errors::SimError;
pub use house::{House, Room, Wall, WallSurface};
pub use simulator::{Probes, Simulation, Simulator};
pub use weather::Weather;
