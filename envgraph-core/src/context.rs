//! The build context: explicit dependency injection for wiring.
//!
//! Every port and gate is created through a [`BuildContext`], which owns the
//! build-time dependency graph. There is no process-wide factory; the context
//! is passed into every module's `build` call and cheaply cloned (it is a
//! shared handle).

use std::cell::RefCell;
use std::rc::Rc;

use crate::errors::EngineResult;
use crate::forward::ForwardPort;
use crate::gate::{Gate, GateFold};
use crate::graph::{DepGraph, EdgeKind, NodeId};
use crate::port::{DerivedPort, PortRef, SeriesPort};
use crate::Tick;

/// Shared wiring context. Clones refer to the same dependency graph.
#[derive(Clone, Default)]
pub struct BuildContext {
    graph: Rc<RefCell<DepGraph>>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_node(&self, label: &str) -> NodeId {
        self.graph.borrow_mut().add_node(label, false)
    }

    fn add_edges(&self, from: NodeId, inputs: &[NodeId], kind: EdgeKind) {
        let mut graph = self.graph.borrow_mut();
        for &input in inputs {
            graph.add_edge(from, input, kind);
        }
    }

    pub(crate) fn register_binding(&self, forward: NodeId, target: NodeId) {
        let mut graph = self.graph.borrow_mut();
        graph.add_edge(forward, target, EdgeKind::Combinational);
        graph.mark_bound(forward);
    }

    /// A port that returns the same value at every tick.
    pub fn constant<T>(&self, label: &str, value: T) -> PortRef<T>
    where
        T: Clone + 'static,
    {
        self.from_fn(label, move |_| Ok(value.clone()))
    }

    /// A leaf port computed from the tick alone (memoized per tick).
    pub fn from_fn<T, F>(&self, label: &str, compute: F) -> PortRef<T>
    where
        T: Clone + 'static,
        F: Fn(Tick) -> EngineResult<T> + 'static,
    {
        let node = self.add_node(label);
        PortRef(Rc::new(DerivedPort::new(label, node, compute)))
    }

    /// A port backed by a per-tick array; reads past the end are range errors.
    pub fn series(&self, label: &str, data: Vec<f64>) -> PortRef<f64> {
        let node = self.add_node(label);
        PortRef(Rc::new(SeriesPort::new(label, node, data)))
    }

    /// A memoizing port computed from upstream ports.
    ///
    /// `inputs` must name every upstream port the compute closure reads; the
    /// registered edges are what the cycle validator walks.
    pub fn derived<T, F>(&self, label: &str, inputs: &[NodeId], compute: F) -> PortRef<T>
    where
        T: Clone + 'static,
        F: Fn(Tick) -> EngineResult<T> + 'static,
    {
        let node = self.add_node(label);
        self.add_edges(node, inputs, EdgeKind::Combinational);
        PortRef(Rc::new(DerivedPort::new(label, node, compute)))
    }

    /// A forward-reference port, to be bound exactly once during build.
    pub fn forward<T: 'static>(&self, label: &str) -> ForwardPort<T> {
        let node = self.graph.borrow_mut().add_node(label, true);
        ForwardPort::new(label, node, self.clone())
    }

    /// A one-tick delay gate: each advance latches the input value.
    pub fn latch_gate(&self, label: &str, input: &PortRef<f64>) -> Gate {
        self.gate(label, input, GateFold::Latch)
    }

    /// An integrating gate: each advance adds the input value to the state.
    pub fn accumulate_gate(&self, label: &str, input: &PortRef<f64>) -> Gate {
        self.gate(label, input, GateFold::Accumulate)
    }

    fn gate(&self, label: &str, input: &PortRef<f64>, fold: GateFold) -> Gate {
        let node = self.add_node(label);
        // The gate consumes its input one tick later: a delayed edge, which
        // is what legalizes feedback loops through this node.
        self.add_edges(node, &[input.node()], EdgeKind::Delayed);
        Gate::new(label, node, input.clone(), fold)
    }

    // --- pure combinators -------------------------------------------------

    pub fn add(&self, label: &str, a: &PortRef<f64>, b: &PortRef<f64>) -> PortRef<f64> {
        let (a2, b2) = (a.clone(), b.clone());
        self.derived(label, &[a.node(), b.node()], move |t| {
            Ok(a2.get(t)? + b2.get(t)?)
        })
    }

    pub fn subtract(&self, label: &str, a: &PortRef<f64>, b: &PortRef<f64>) -> PortRef<f64> {
        let (a2, b2) = (a.clone(), b.clone());
        self.derived(label, &[a.node(), b.node()], move |t| {
            Ok(a2.get(t)? - b2.get(t)?)
        })
    }

    pub fn multiply(&self, label: &str, a: &PortRef<f64>, b: &PortRef<f64>) -> PortRef<f64> {
        let (a2, b2) = (a.clone(), b.clone());
        self.derived(label, &[a.node(), b.node()], move |t| {
            let (a, b) = (a2.get(t)?, b2.get(t)?);
            debug_assert!(!a.is_nan() && !b.is_nan());
            Ok(a * b)
        })
    }

    /// Multiply a port by a constant factor.
    pub fn scale(&self, label: &str, factor: f64, input: &PortRef<f64>) -> PortRef<f64> {
        let input2 = input.clone();
        self.derived(label, &[input.node()], move |t| Ok(factor * input2.get(t)?))
    }

    /// Sign inversion.
    pub fn invert(&self, label: &str, input: &PortRef<f64>) -> PortRef<f64> {
        let input2 = input.clone();
        self.derived(label, &[input.node()], move |t| {
            let v = input2.get(t)?;
            debug_assert!(!v.is_nan());
            Ok(-v)
        })
    }

    /// Concatenate-sum over any number of inputs; an empty set sums to zero.
    pub fn sum(&self, label: &str, inputs: &[PortRef<f64>]) -> PortRef<f64> {
        let nodes: Vec<NodeId> = inputs.iter().map(|p| p.node()).collect();
        let inputs: Vec<PortRef<f64>> = inputs.to_vec();
        self.derived(label, &nodes, move |t| {
            let mut total = 0.0;
            for input in &inputs {
                total += input.get(t)?;
                debug_assert!(!total.is_nan());
            }
            Ok(total)
        })
    }

    // --- whole-graph operations --------------------------------------------

    /// Run the cycle validator over everything wired through this context.
    ///
    /// Must be called after the whole module tree has been built and before
    /// the first advance.
    pub fn validate(&self) -> EngineResult<()> {
        self.graph.borrow().validate()
    }

    /// Render the dependency graph in graphviz dot format.
    pub fn to_dot(&self) -> String {
        self.graph.borrow().to_dot()
    }

    /// Diagnostic label of a graph node.
    pub fn node_label(&self, node: NodeId) -> String {
        self.graph.borrow().label(node).to_string()
    }
}
