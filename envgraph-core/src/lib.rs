//! Pull-based, tick-indexed computation graph.
//!
//! The engine evaluates a graph of [`Port`]s on demand: a `get(tick)` call
//! recursively pulls whatever upstream values it needs, and every derived
//! port memoizes its most recent tick so fan-out never causes recomputation.
//! [`Gate`]s hold a previous/current pair and are the only stateful nodes;
//! reading a gate always observes the previous tick's settled value, which is
//! what allows mutually dependent modules (a room and its wall, say) to form
//! cycles without infinite recursion.
//!
//! Wiring happens in two phases. Modules are constructed with
//! forward-reference output ports so siblings can refer to each other before
//! either has been built, then a single `build` pass wires the internals and
//! binds the outputs. After building, [`BuildContext::validate`] walks the
//! dependency graph and rejects any reference cycle that is not broken by a
//! gate; only then may the tick loop run.

pub mod context;
pub mod errors;
pub mod forward;
pub mod gate;
pub mod graph;
pub mod module;
pub mod port;

/// A discrete simulation step index. Tick 0 is the first step.
pub type Tick = usize;

pub use context::BuildContext;
pub use errors::{EngineError, EngineResult};
pub use forward::ForwardPort;
pub use gate::Gate;
pub use graph::{EdgeKind, NodeId};
pub use module::{Container, Module};
pub use port::{Port, PortRef};
