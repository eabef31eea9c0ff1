//! Renderer-agnostic diagram description
//!
//! Nodes are numbered `s0`, `s1`, ... in state label order. Every
//! (source, destination) pair yields at most one edge whose label is the
//! sorted, comma-joined list of symbols driving it, epsilon first. Missing
//! transitions of a partial DFA produce neither edges nor a sink node.

use crate::automaton::{Automaton, Dfa, Nfa};
use crate::core::{Input, State};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, span, Level};

/// One state in a diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
    pub is_start: bool,
    pub is_accepting: bool,
}

/// One merged edge in a diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramEdge {
    /// Source node id
    pub from: String,
    /// Destination node id
    pub to: String,
    /// Symbols joined by `,`
    pub label: String,
    pub symbols: Vec<String>,
}

/// Node/edge description of an automaton
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagramDescription {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl DiagramDescription {
    fn build<'a>(
        states: &'a BTreeSet<State>,
        start: &State,
        accepting: &BTreeSet<State>,
        transitions: impl Iterator<Item = (&'a State, Input, &'a State)>,
    ) -> Self {
        let diagram_span = span!(Level::DEBUG, "describe", states = states.len());
        let _enter = diagram_span.enter();

        let ids: BTreeMap<&State, String> = states
            .iter()
            .enumerate()
            .map(|(i, state)| (state, format!("s{}", i)))
            .collect();

        let nodes = states
            .iter()
            .zip(ids.values())
            .map(|(state, id)| DiagramNode {
                id: id.clone(),
                label: state.label().to_string(),
                is_start: state == start,
                is_accepting: accepting.contains(state),
            })
            .collect();

        let mut merged: BTreeMap<(&State, &State), BTreeSet<Input>> = BTreeMap::new();
        for (src, input, dst) in transitions {
            merged.entry((src, dst)).or_default().insert(input);
        }

        let edges: Vec<DiagramEdge> = merged
            .into_iter()
            .filter_map(|((src, dst), inputs)| {
                let from = ids.get(src)?.clone();
                let to = ids.get(dst)?.clone();
                let symbols: Vec<String> = inputs.iter().map(Input::to_string).collect();
                Some(DiagramEdge {
                    from,
                    to,
                    label: symbols.join(","),
                    symbols,
                })
            })
            .collect();

        debug!(nodes = states.len(), edges = edges.len(), "Built diagram description");
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_by_label(&self, label: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.label == label)
    }

    pub fn start_node(&self) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.is_start)
    }

    /// Edge between two states, looked up by state label
    pub fn edge_between(&self, from_label: &str, to_label: &str) -> Option<&DiagramEdge> {
        let from = self.node_by_label(from_label)?;
        let to = self.node_by_label(to_label)?;
        self.edges.iter().find(|e| e.from == from.id && e.to == to.id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Anything that can be described as a diagram
pub trait ToDiagram {
    fn to_diagram(&self) -> DiagramDescription;
}

impl ToDiagram for Nfa {
    fn to_diagram(&self) -> DiagramDescription {
        DiagramDescription::build(
            self.states(),
            self.start(),
            self.accepting(),
            self.transitions()
                .map(|(src, input, dst)| (src, input.clone(), dst)),
        )
    }
}

impl ToDiagram for Dfa {
    fn to_diagram(&self) -> DiagramDescription {
        DiagramDescription::build(
            self.states(),
            self.start(),
            self.accepting(),
            self.transitions()
                .map(|(src, symbol, dst)| (src, Input::Symbol(symbol.clone()), dst)),
        )
    }
}

impl ToDiagram for Automaton {
    fn to_diagram(&self) -> DiagramDescription {
        match self {
            Automaton::Nfa(nfa) => nfa.to_diagram(),
            Automaton::Dfa(dfa) => dfa.to_diagram(),
        }
    }
}

impl From<&Nfa> for DiagramDescription {
    fn from(nfa: &Nfa) -> Self {
        nfa.to_diagram()
    }
}

impl From<&Dfa> for DiagramDescription {
    fn from(dfa: &Dfa) -> Self {
        dfa.to_diagram()
    }
}

impl From<&Automaton> for DiagramDescription {
    fn from(automaton: &Automaton) -> Self {
        automaton.to_diagram()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{subset_construction, Completion};
    use crate::table::TransitionTable;

    #[test]
    fn test_symbols_merge_into_one_edge() {
        let table = TransitionTable::new()
            .with_alphabet(["b", "a"])
            .with_start("p")
            .with_accepting(["q"])
            .with_transition("p", "b", "q")
            .with_transition("p", "a", "q")
            .with_transition("p", "eps", "q")
            .with_transition("q", "a", "q");
        let nfa = Nfa::from_table(&table).unwrap();
        let diagram = nfa.to_diagram();

        assert_eq!(diagram.node_count(), 2);
        assert_eq!(diagram.edge_count(), 2);
        let edge = diagram.edge_between("p", "q").unwrap();
        assert_eq!(edge.label, "ε,a,b");
        assert_eq!(edge.symbols, vec!["ε", "a", "b"]);
        assert_eq!(diagram.edge_between("q", "q").unwrap().label, "a");
    }

    #[test]
    fn test_nodes_in_label_order() {
        let table = TransitionTable::new()
            .with_alphabet(["x"])
            .with_start("zeta")
            .with_accepting(["alpha"])
            .with_transition("zeta", "x", "alpha")
            .with_transition("alpha", "x", "zeta");
        let dfa = Dfa::from_table(&table, Completion::Complete).unwrap();
        let diagram = DiagramDescription::from(&dfa);

        let labels: Vec<_> = diagram.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["alpha", "zeta"]);
        assert_eq!(diagram.nodes[0].id, "s0");
        assert!(diagram.nodes[0].is_accepting);
        assert_eq!(diagram.start_node().map(|n| n.id.as_str()), Some("s1"));
        assert_eq!(diagram.edges[0].from, "s0");
    }

    #[test]
    fn test_partial_dfa_has_no_sink() {
        let table = TransitionTable::new()
            .with_alphabet(["0", "1"])
            .with_start("q0")
            .with_accepting(["q2"])
            .with_transition("q0", "ε", "q1")
            .with_transition("q1", "0", "q2");
        let dfa = subset_construction(&Nfa::from_table(&table).unwrap()).dfa;
        let diagram = dfa.to_diagram();

        assert_eq!(diagram.node_count(), 2);
        assert_eq!(diagram.edge_count(), 1);
        let start = diagram.start_node().unwrap();
        assert_eq!(start.label, "{q0,q1}");
        assert!(diagram.node_by_label("{q2}").unwrap().is_accepting);
    }

    #[test]
    fn test_description_is_deterministic() {
        let table = TransitionTable::new()
            .with_alphabet(["a", "b"])
            .with_start("0")
            .with_accepting(["1"])
            .with_transition("0", "a", "1")
            .with_transition("0", "b", "1")
            .with_transition("1", "a", "0");
        let nfa = Nfa::from_table(&table).unwrap();
        assert_eq!(nfa.to_diagram(), nfa.clone().to_diagram());
        assert_eq!(
            Automaton::Nfa(nfa.clone()).to_diagram(),
            DiagramDescription::from(&nfa)
        );
    }
}
