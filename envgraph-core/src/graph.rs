//! The build-time dependency graph and its cycle validator.
//!
//! Every port allocates a node here when it is created and registers an edge
//! per upstream reference. Edges are tagged: references resolved within the
//! same tick are [`EdgeKind::Combinational`], a gate's reference to its input
//! is [`EdgeKind::Delayed`] because the value is only folded in on the next
//! advance. Validation rejects any cycle made purely of combinational edges —
//! evaluating such a loop would recurse forever — while cycles crossing a
//! delayed edge are legal and are what make feedback topologies work.

use crate::errors::{EngineError, EngineResult};
use petgraph::algo::tarjan_scc;
use petgraph::dot::Dot;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeFiltered;
use petgraph::visit::EdgeRef;

/// Handle to a port's node in the dependency graph.
pub type NodeId = NodeIndex;

/// How a reference between two ports behaves within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Resolved by recursive `get` within the same tick.
    Combinational,
    /// Crosses a gate: the referenced value is consumed one tick later.
    Delayed,
}

#[derive(Debug)]
struct NodeInfo {
    label: String,
    /// Forward-reference ports must be bound before the tick loop runs.
    forward: bool,
    bound: bool,
}

/// Arena of port nodes plus the tagged adjacency between them.
#[derive(Debug, Default)]
pub(crate) struct DepGraph {
    graph: Graph<NodeInfo, EdgeKind>,
}

impl DepGraph {
    pub(crate) fn add_node(&mut self, label: &str, forward: bool) -> NodeId {
        self.graph.add_node(NodeInfo {
            label: label.to_string(),
            forward,
            bound: false,
        })
    }

    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId, kind: EdgeKind) {
        self.graph.add_edge(from, to, kind);
    }

    pub(crate) fn mark_bound(&mut self, node: NodeId) {
        self.graph[node].bound = true;
    }

    pub(crate) fn label(&self, node: NodeId) -> &str {
        &self.graph[node].label
    }

    /// Check the fully built graph.
    ///
    /// Fails if any forward-reference port was never bound, or if a cycle
    /// exists that does not cross a delayed edge. Runs once, after all
    /// `build` calls complete and before the first `advance`; a single
    /// module's own slots are not enough, cycles can span many modules.
    pub(crate) fn validate(&self) -> EngineResult<()> {
        let unbound: Vec<&str> = self
            .graph
            .node_indices()
            .filter(|&n| self.graph[n].forward && !self.graph[n].bound)
            .map(|n| self.graph[n].label.as_str())
            .collect();
        if !unbound.is_empty() {
            return Err(EngineError::UnboundAfterBuild {
                ports: unbound.join(", "),
            });
        }

        let combinational =
            EdgeFiltered::from_fn(&self.graph, |e| *e.weight() == EdgeKind::Combinational);

        // A combinational self-loop is a cycle tarjan reports as a trivial SCC.
        for edge in self.graph.edge_references() {
            if edge.source() == edge.target() && *edge.weight() == EdgeKind::Combinational {
                return Err(EngineError::CombinationalCycle {
                    ports: self.graph[edge.source()].label.clone(),
                });
            }
        }

        for scc in tarjan_scc(&combinational) {
            if scc.len() > 1 {
                let ports: Vec<&str> = scc
                    .iter()
                    .map(|&n| self.graph[n].label.as_str())
                    .collect();
                return Err(EngineError::CombinationalCycle {
                    ports: ports.join(" -> "),
                });
            }
        }

        Ok(())
    }

    /// Render the dependency graph in graphviz dot format.
    pub(crate) fn to_dot(&self) -> String {
        let display = self
            .graph
            .map(|_, n| n.label.clone(), |_, e| format!("{:?}", e));
        format!("{:?}", Dot::new(&display))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_acyclic() {
        let mut g = DepGraph::default();
        let a = g.add_node("a", false);
        let b = g.add_node("b", false);
        g.add_edge(a, b, EdgeKind::Combinational);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn rejects_combinational_cycle() {
        let mut g = DepGraph::default();
        let a = g.add_node("a", false);
        let b = g.add_node("b", false);
        g.add_edge(a, b, EdgeKind::Combinational);
        g.add_edge(b, a, EdgeKind::Combinational);
        let err = g.validate().unwrap_err();
        assert!(matches!(err, EngineError::CombinationalCycle { .. }));
    }

    #[test]
    fn rejects_self_loop() {
        let mut g = DepGraph::default();
        let a = g.add_node("a", false);
        g.add_edge(a, a, EdgeKind::Combinational);
        assert!(g.validate().is_err());
    }

    #[test]
    fn accepts_cycle_through_delayed_edge() {
        let mut g = DepGraph::default();
        let a = g.add_node("a", false);
        let b = g.add_node("b", false);
        g.add_edge(a, b, EdgeKind::Combinational);
        g.add_edge(b, a, EdgeKind::Delayed);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn reports_unbound_forward_ports() {
        let mut g = DepGraph::default();
        g.add_node("room.temp_out", true);
        let err = g.validate().unwrap_err();
        assert!(matches!(err, EngineError::UnboundAfterBuild { .. }));
        assert!(err.to_string().contains("room.temp_out"));
    }
}
