//! Modules and containers.
//!
//! A module is a struct holding its input port slots and forward-reference
//! outputs; `build` wires the internal sub-graph exactly once, `advance`
//! commits the module's gates for one tick. Containers broadcast both calls
//! to their children in registration order. Registration order does not by
//! itself determine correctness — sibling outputs are forward ports bound at
//! build time — it only has to be stable.

use crate::context::BuildContext;
use crate::errors::{EngineError, EngineResult};
use crate::Tick;

/// A unit that wires a sub-graph of ports during a one-time build phase.
///
/// Lifecycle: construct with configuration, fill input slots, `build` once,
/// then `advance` once per simulated tick with non-decreasing ticks.
pub trait Module {
    /// Label for diagnostics and error messages.
    fn label(&self) -> &str;

    /// Wire the internal sub-graph and bind the forward output ports.
    /// Called exactly once, after all input slots are filled.
    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()>;

    /// Commit one tick of state. Stateless modules need not override this.
    fn advance(&mut self, _tick: Tick) -> EngineResult<()> {
        Ok(())
    }
}

/// An ordered aggregate of modules.
///
/// `build` and `advance` forward to the children in registration order.
/// Building twice is a defined error, never a silent re-wire.
pub struct Container {
    label: String,
    children: Vec<Box<dyn Module>>,
    built: bool,
}

impl Container {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            children: Vec::new(),
            built: false,
        }
    }

    pub fn push(&mut self, module: impl Module + 'static) {
        self.children.push(Box::new(module));
    }

    pub fn push_boxed(&mut self, module: Box<dyn Module>) {
        self.children.push(module);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Module for Container {
    fn label(&self) -> &str {
        &self.label
    }

    fn build(&mut self, ctx: &BuildContext) -> EngineResult<()> {
        if self.built {
            return Err(EngineError::AlreadyBuilt {
                module: self.label.clone(),
            });
        }
        for child in &mut self.children {
            tracing::debug!(container = %self.label, module = child.label(), "build");
            child.build(ctx)?;
        }
        self.built = true;
        Ok(())
    }

    fn advance(&mut self, tick: Tick) -> EngineResult<()> {
        for child in &mut self.children {
            child.advance(tick)?;
        }
        Ok(())
    }
}
