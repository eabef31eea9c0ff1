//! Automaton model and the algorithms that transform it
//!
//! - [`Nfa`]: epsilon-NFA with set-valued transitions
//! - [`Dfa`]: deterministic, possibly partial
//! - [`subset_construction`]: NFA to DFA
//! - [`minimize`]: Moore partition refinement
//! - language analysis and [`to_regex`]

mod analysis;
mod dfa;
mod minimize;
mod nfa;
mod regex;
mod subset;

pub use dfa::*;
pub use minimize::*;
pub use nfa::*;
pub use regex::to_regex;
pub use subset::*;

use crate::core::{State, Symbol};
use std::collections::BTreeSet;

/// Which flavor of automaton a value holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomatonKind {
    Nfa,
    Dfa,
}

impl std::fmt::Display for AutomatonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomatonKind::Nfa => write!(f, "NFA"),
            AutomatonKind::Dfa => write!(f, "DFA"),
        }
    }
}

/// Either an NFA or a DFA
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Automaton {
    Nfa(Nfa),
    Dfa(Dfa),
}

impl Automaton {
    pub fn kind(&self) -> AutomatonKind {
        match self {
            Automaton::Nfa(_) => AutomatonKind::Nfa,
            Automaton::Dfa(_) => AutomatonKind::Dfa,
        }
    }

    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        match self {
            Automaton::Nfa(nfa) => nfa.alphabet(),
            Automaton::Dfa(dfa) => dfa.alphabet(),
        }
    }

    pub fn states(&self) -> &BTreeSet<State> {
        match self {
            Automaton::Nfa(nfa) => nfa.states(),
            Automaton::Dfa(dfa) => dfa.states(),
        }
    }

    pub fn start(&self) -> &State {
        match self {
            Automaton::Nfa(nfa) => nfa.start(),
            Automaton::Dfa(dfa) => dfa.start(),
        }
    }

    pub fn accepting(&self) -> &BTreeSet<State> {
        match self {
            Automaton::Nfa(nfa) => nfa.accepting(),
            Automaton::Dfa(dfa) => dfa.accepting(),
        }
    }

    pub fn state_count(&self) -> usize {
        self.states().len()
    }

    pub fn accepts(&self, word: &[Symbol]) -> bool {
        match self {
            Automaton::Nfa(nfa) => nfa.accepts(word),
            Automaton::Dfa(dfa) => dfa.accepts(word),
        }
    }

    /// Deterministic view: the DFA itself, or subset construction of the NFA
    pub fn to_dfa(&self) -> Dfa {
        match self {
            Automaton::Nfa(nfa) => subset_construction(nfa).dfa,
            Automaton::Dfa(dfa) => dfa.clone(),
        }
    }
}

impl From<Nfa> for Automaton {
    fn from(nfa: Nfa) -> Self {
        Automaton::Nfa(nfa)
    }
}

impl From<Dfa> for Automaton {
    fn from(dfa: Dfa) -> Self {
        Automaton::Dfa(dfa)
    }
}
