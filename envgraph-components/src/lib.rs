//! Thermal-physics building blocks for the envgraph engine.
//!
//! Two layers: [`functions`] holds the pure scalar physics (conduction,
//! convection, radiation, solar geometry), [`modules`] wraps them into
//! wired graph modules with input slots and forward-reference outputs.

pub mod functions;
pub mod modules;
