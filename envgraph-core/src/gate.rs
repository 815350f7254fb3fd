//! Gates: the stateful nodes that turn a combinational pull graph into a
//! discrete-time dynamical system.
//!
//! A gate holds a previous/current pair. Reads always return `previous` — the
//! state as of the end of the prior tick — so anything pulling from a gate
//! during tick `t` sees settled state, never a partially updated value.
//! `advance(t)` commits the swap and folds the input port into `current`,
//! exactly once per tick.

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::EngineResult;
use crate::graph::NodeId;
use crate::port::{Port, PortRef};
use crate::Tick;

/// How an advance folds the input value into the gate's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateFold {
    /// `current = input` (a one-tick delay line).
    Latch,
    /// `current += input` (an integrator, e.g. accumulated heat in joules).
    Accumulate,
}

#[derive(Debug, Default)]
struct GateState {
    previous: f64,
    current: f64,
    last_advanced: Option<Tick>,
}

/// A stateful port. Both `previous` and `current` start at an explicit 0.0
/// until seeded or advanced.
pub struct Gate {
    inner: Rc<GateInner>,
}

impl Clone for Gate {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct GateInner {
    label: String,
    node: NodeId,
    input: PortRef<f64>,
    fold: GateFold,
    state: RefCell<GateState>,
}

impl Gate {
    pub(crate) fn new(label: &str, node: NodeId, input: PortRef<f64>, fold: GateFold) -> Self {
        Self {
            inner: Rc::new(GateInner {
                label: label.to_string(),
                node,
                input,
                fold,
                state: RefCell::new(GateState::default()),
            }),
        }
    }

    /// Initialize the gate's state before the first advance.
    ///
    /// For an accumulate gate this sets both `previous` and `current` (the
    /// integrated quantity starts at `value`). For a latch gate only
    /// `previous` is set: the value is what readers observe until the first
    /// advance, after which the input stream takes over.
    pub fn seed(&self, value: f64) {
        let mut state = self.inner.state.borrow_mut();
        state.previous = value;
        if self.inner.fold == GateFold::Accumulate {
            state.current = value;
        }
    }

    /// Commit one tick: swap `previous <- current`, then fold the input.
    ///
    /// Idempotent per tick — a second call with the same (or an earlier)
    /// tick is a no-op, so arbitrary fan-in of advance calls is safe.
    /// Pulling the input may recurse arbitrarily deep into the upstream
    /// graph; any read of this gate during that pull sees the freshly
    /// committed `previous`.
    pub fn advance(&self, tick: Tick) -> EngineResult<()> {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.last_advanced.is_some_and(|last| tick <= last) {
                return Ok(());
            }
            state.previous = state.current;
        }

        // The borrow is released across the pull: the input chain may read
        // this gate's port.
        let value = self.inner.input.get(tick)?;
        debug_assert!(
            !value.is_nan(),
            "gate '{}' received NaN at tick {tick}",
            self.inner.label
        );

        let mut state = self.inner.state.borrow_mut();
        state.current = match self.inner.fold {
            GateFold::Latch => value,
            GateFold::Accumulate => state.current + value,
        };
        state.last_advanced = Some(tick);
        tracing::trace!(
            gate = %self.inner.label,
            tick,
            current = state.current,
            "advanced"
        );
        Ok(())
    }

    /// A readable handle; reads return the previous tick's committed value.
    pub fn port(&self) -> PortRef<f64> {
        PortRef(Rc::clone(&self.inner) as Rc<dyn Port<f64>>)
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }
}

impl Port<f64> for GateInner {
    fn get(&self, _tick: Tick) -> EngineResult<f64> {
        Ok(self.state.borrow().previous)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn node(&self) -> NodeId {
        self.node
    }
}
