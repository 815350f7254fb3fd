//! Ports: typed, read-only, tick-indexed value sources.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::errors::{EngineError, EngineResult};
use crate::graph::NodeId;
use crate::Tick;

/// A typed, read-only value source for a given tick.
///
/// `get` is pure with respect to the graph's state as of the requested tick:
/// repeated reads within one tick are observationally identical to a single
/// evaluation.
pub trait Port<T> {
    fn get(&self, tick: Tick) -> EngineResult<T>;

    /// Human-readable label for diagnostics.
    fn label(&self) -> &str;

    /// The port's node in the build-time dependency graph.
    fn node(&self) -> NodeId;
}

/// Shared handle to a port.
///
/// The engine is single-threaded by design, so handles are `Rc`-based.
/// Holding a `PortRef` never implies ownership of the upstream graph; modules
/// borrow their inputs and exclusively own only the ports they create.
pub struct PortRef<T>(pub(crate) Rc<dyn Port<T>>);

impl<T> Clone for PortRef<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PortRef<T> {
    pub fn get(&self, tick: Tick) -> EngineResult<T> {
        self.0.get(tick)
    }

    pub fn label(&self) -> &str {
        self.0.label()
    }

    pub fn node(&self) -> NodeId {
        self.0.node()
    }
}

impl<T> fmt::Debug for PortRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PortRef({})", self.label())
    }
}

/// A derived port with a single-slot `(tick, value)` cache.
///
/// The cache guarantees the compute function runs at most once per distinct
/// tick regardless of fan-out.
pub(crate) struct DerivedPort<T, F> {
    label: String,
    node: NodeId,
    compute: F,
    cache: RefCell<Option<(Tick, T)>>,
}

impl<T, F> DerivedPort<T, F> {
    pub(crate) fn new(label: &str, node: NodeId, compute: F) -> Self {
        Self {
            label: label.to_string(),
            node,
            compute,
            cache: RefCell::new(None),
        }
    }
}

impl<T, F> Port<T> for DerivedPort<T, F>
where
    T: Clone,
    F: Fn(Tick) -> EngineResult<T>,
{
    fn get(&self, tick: Tick) -> EngineResult<T> {
        if let Some((cached_tick, value)) = &*self.cache.borrow() {
            if *cached_tick == tick {
                return Ok(value.clone());
            }
        }
        let value = (self.compute)(tick)?;
        *self.cache.borrow_mut() = Some((tick, value.clone()));
        Ok(value)
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn node(&self) -> NodeId {
        self.node
    }
}

/// A port backed by a fixed array of per-tick values.
///
/// Reading past the end of the series is a recoverable
/// [`EngineError::TickOutOfRange`], not a panic.
pub(crate) struct SeriesPort {
    label: String,
    node: NodeId,
    data: Vec<f64>,
}

impl SeriesPort {
    pub(crate) fn new(label: &str, node: NodeId, data: Vec<f64>) -> Self {
        Self {
            label: label.to_string(),
            node,
            data,
        }
    }
}

impl Port<f64> for SeriesPort {
    fn get(&self, tick: Tick) -> EngineResult<f64> {
        self.data
            .get(tick)
            .copied()
            .ok_or_else(|| EngineError::TickOutOfRange {
                port: self.label.clone(),
                tick,
                len: self.data.len(),
            })
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn node(&self) -> NodeId {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use crate::context::BuildContext;
    use crate::errors::EngineError;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn constant_port_returns_value_for_any_tick() {
        let ctx = BuildContext::new();
        let p = ctx.constant("c", 21.5);
        assert_eq!(p.get(0).unwrap(), 21.5);
        assert_eq!(p.get(100).unwrap(), 21.5);
    }

    #[test]
    fn derived_port_computes_once_per_tick() {
        let ctx = BuildContext::new();
        let calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&calls);
        let p = ctx.from_fn("counted", move |t| {
            counter.set(counter.get() + 1);
            Ok(t as f64)
        });

        for _ in 0..5 {
            assert_eq!(p.get(3).unwrap(), 3.0);
        }
        assert_eq!(calls.get(), 1);

        assert_eq!(p.get(4).unwrap(), 4.0);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn series_port_rejects_out_of_range_tick() {
        let ctx = BuildContext::new();
        let p = ctx.series("data", vec![1.0, 2.0, 3.0]);
        assert_eq!(p.get(2).unwrap(), 3.0);
        let err = p.get(3).unwrap_err();
        assert!(matches!(
            err,
            EngineError::TickOutOfRange { tick: 3, len: 3, .. }
        ));
    }
}
