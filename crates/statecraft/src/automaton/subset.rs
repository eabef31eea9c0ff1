//! NFA to DFA conversion by subset construction
//!
//! Each DFA state is the epsilon-closed set of NFA states reachable on some
//! word. Sets are keyed by their ordered member set, so rediscovering a set
//! always yields the same composite state.

use super::{Dfa, Nfa};
use crate::core::{State, Symbol};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, span, trace, Level};

/// One (composite, symbol) expansion performed during construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubsetStep {
    pub from: State,
    pub symbol: Symbol,
    /// None when the symbol leads nowhere (implicit dead state)
    pub to: Option<State>,
    /// True when `to` was seen here for the first time
    pub discovered: bool,
}

/// Result of subset construction: the DFA plus how it was found
#[derive(Debug, Clone)]
pub struct SubsetConstruction {
    pub dfa: Dfa,
    /// Composite states in discovery order, start first
    pub discovered: Vec<State>,
    pub steps: Vec<SubsetStep>,
}

/// Convert an NFA to an equivalent partial DFA
pub fn subset_construction(nfa: &Nfa) -> SubsetConstruction {
    let subset_span = span!(
        Level::INFO,
        "subset_construction",
        nfa_states = nfa.states().len(),
        symbols = nfa.alphabet().len()
    );
    let _enter = subset_span.enter();

    let start_set = nfa.epsilon_closure(&BTreeSet::from([nfa.start().clone()]));
    let start = State::composite(start_set.iter().cloned());

    let mut known: BTreeMap<BTreeSet<State>, State> = BTreeMap::new();
    known.insert(start_set.clone(), start.clone());
    let mut queue = VecDeque::from([(start_set, start.clone())]);

    let mut discovered = vec![start.clone()];
    let mut steps = Vec::new();
    let mut transitions = BTreeMap::new();

    while let Some((members, from)) = queue.pop_front() {
        for symbol in nfa.alphabet() {
            let target = nfa.step(&members, symbol);
            if target.is_empty() {
                trace!(from = %from, symbol = %symbol, "No target");
                steps.push(SubsetStep {
                    from: from.clone(),
                    symbol: symbol.clone(),
                    to: None,
                    discovered: false,
                });
                continue;
            }

            let (to, is_new) = match known.get(&target) {
                Some(existing) => (existing.clone(), false),
                None => {
                    let state = State::composite(target.iter().cloned());
                    known.insert(target.clone(), state.clone());
                    discovered.push(state.clone());
                    queue.push_back((target, state.clone()));
                    (state, true)
                }
            };
            trace!(from = %from, symbol = %symbol, to = %to, new = is_new, "Expanded");

            transitions.insert((from.clone(), symbol.clone()), to.clone());
            steps.push(SubsetStep {
                from: from.clone(),
                symbol: symbol.clone(),
                to: Some(to),
                discovered: is_new,
            });
        }
    }

    let accepting: BTreeSet<State> = known
        .iter()
        .filter(|(members, _)| members.iter().any(|s| nfa.is_accepting(s)))
        .map(|(_, state)| state.clone())
        .collect();
    let states: BTreeSet<State> = known.into_values().collect();

    debug!(
        dfa_states = states.len(),
        transitions = transitions.len(),
        "Subset construction finished"
    );

    SubsetConstruction {
        dfa: Dfa::from_parts(nfa.alphabet().clone(), states, start, accepting, transitions),
        discovered,
        steps,
    }
}
