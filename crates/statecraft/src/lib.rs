//! Statecraft - a finite automata engine
//!
//! Builds NFAs and DFAs from transition tables, converts NFAs to DFAs by
//! subset construction, minimizes DFAs by Moore partition refinement and
//! describes any of them as a diagram.
//!
//! # Quick Start
//!
//! ```rust
//! use statecraft::{parse_nfa, to_dot};
//! use statecraft::automaton::subset_construction;
//!
//! let nfa = parse_nfa("alphabet: 0, 1\nstart: q0\naccept: q2\nq0 --ε--> q1\nq1 --0--> q2").unwrap();
//! let dfa = subset_construction(&nfa).dfa;
//! assert_eq!(dfa.start().label(), "{q0,q1}");
//!
//! let dot = to_dot(&dfa).unwrap();
//! assert!(dot.contains("doublecircle"));
//! ```
//!
//! # Minimization
//!
//! ```rust
//! use statecraft::prelude::*;
//!
//! let table = TransitionTable::new()
//!     .with_alphabet(["a"])
//!     .with_start("x")
//!     .with_accepting(["x", "y"])
//!     .with_transition("x", "a", "y")
//!     .with_transition("y", "a", "x");
//! let dfa = Dfa::from_table(&table, Completion::Complete).unwrap();
//!
//! let result = minimize(&dfa);
//! assert_eq!(result.dfa.states().len(), 1);
//! assert_eq!(result.splits(), 0);
//! ```

pub mod automaton;
pub mod core;
pub mod diagram;
pub mod table;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::automaton::{
        minimize, minimize_automaton, subset_construction, to_regex, Automaton, Completion, Dfa,
        Minimization, Nfa, Run, SubsetConstruction,
    };
    pub use crate::core::{AutomatonError, Input, Parser, Renderer, State, Symbol};
    pub use crate::diagram::{
        DiagramConfig, DiagramDescription, DotRenderer, JsonRenderer, MermaidRenderer, ToDiagram,
    };
    pub use crate::table::{TableParser, TransitionTable};
}

/// Parse the table text format
///
/// # Example
/// ```rust
/// let table = statecraft::parse_table("alphabet: a\nstart: p\np --a--> p").unwrap();
/// assert_eq!(table.rows().len(), 1);
/// ```
pub fn parse_table(input: &str) -> Result<table::TransitionTable> {
    use crate::core::Parser as _;

    let mut table = table::TransitionTable::new();
    table::TableParser::new().parse(input, &mut table)?;
    Ok(table)
}

/// Parse the table text format straight into an NFA
pub fn parse_nfa(input: &str) -> Result<automaton::Nfa> {
    automaton::Nfa::from_table(&parse_table(input)?)
}

/// Parse the table text format straight into a DFA
pub fn parse_dfa(input: &str, completion: automaton::Completion) -> Result<automaton::Dfa> {
    automaton::Dfa::from_table(&parse_table(input)?, completion)
}

/// Render any automaton as Graphviz DOT with the default configuration
pub fn to_dot<A: diagram::ToDiagram>(automaton: &A) -> anyhow::Result<String> {
    diagram::DotRenderer::new().render(&automaton.to_diagram())
}
