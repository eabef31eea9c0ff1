//! Epsilon nondeterministic finite automaton (ε-NFA)

use super::Dfa;
use crate::core::{Input, Result, State, Symbol};
use crate::table::TransitionTable;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, span, Level};

/// An epsilon nondeterministic finite automaton
///
/// Immutable once built: every transformation returns a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    alphabet: BTreeSet<Symbol>,
    states: BTreeSet<State>,
    start: State,
    accepting: BTreeSet<State>,
    /// (source, symbol-or-epsilon) -> destinations; absent keys mean no move
    transitions: BTreeMap<(State, Input), BTreeSet<State>>,
}

impl Nfa {
    /// Build an NFA from a transition table
    ///
    /// Fails with `MalformedAutomaton` when the start state, an accepting
    /// state, or a row refers to something that was not declared.
    pub fn from_table(table: &TransitionTable) -> Result<Self> {
        let build_span = span!(Level::INFO, "build_nfa", rows = table.rows().len());
        let _enter = build_span.enter();

        let (states, start) = table.validate()?;

        let mut transitions: BTreeMap<(State, Input), BTreeSet<State>> = BTreeMap::new();
        for row in table.rows() {
            transitions
                .entry((row.source.clone(), row.input.clone()))
                .or_default()
                .insert(row.target.clone());
        }

        debug!(
            states = states.len(),
            symbols = table.alphabet().len(),
            "Built NFA"
        );

        Ok(Self {
            alphabet: table.alphabet().clone(),
            states,
            start,
            accepting: table.accepting().clone(),
            transitions,
        })
    }

    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    pub fn start(&self) -> &State {
        &self.start
    }

    pub fn accepting(&self) -> &BTreeSet<State> {
        &self.accepting
    }

    pub fn is_accepting(&self, state: &State) -> bool {
        self.accepting.contains(state)
    }

    /// Destinations of `state` on `input` (empty when there is no move)
    pub fn targets(&self, state: &State, input: &Input) -> impl Iterator<Item = &State> + '_ {
        self.transitions
            .get(&(state.clone(), input.clone()))
            .into_iter()
            .flatten()
    }

    /// Every transition as (source, input, destination), sorted
    pub fn transitions(&self) -> impl Iterator<Item = (&State, &Input, &State)> + '_ {
        self.transitions
            .iter()
            .flat_map(|((src, input), dsts)| dsts.iter().map(move |dst| (src, input, dst)))
    }

    /// Number of (source, input, destination) triples
    pub fn transition_count(&self) -> usize {
        self.transitions.values().map(BTreeSet::len).sum()
    }

    /// Smallest superset of `states` closed under epsilon moves
    pub fn epsilon_closure(&self, states: &BTreeSet<State>) -> BTreeSet<State> {
        let mut closure = states.clone();
        let mut worklist: Vec<State> = states.iter().cloned().collect();

        while let Some(state) = worklist.pop() {
            if let Some(destinations) = self.transitions.get(&(state, Input::Epsilon)) {
                for dest in destinations {
                    if closure.insert(dest.clone()) {
                        worklist.push(dest.clone());
                    }
                }
            }
        }

        closure
    }

    /// States reached from `states` on `symbol`, epsilon-closed
    pub fn step(&self, states: &BTreeSet<State>, symbol: &Symbol) -> BTreeSet<State> {
        let input = Input::Symbol(symbol.clone());
        let mut reached = BTreeSet::new();
        for state in states {
            if let Some(destinations) = self.transitions.get(&(state.clone(), input.clone())) {
                reached.extend(destinations.iter().cloned());
            }
        }
        self.epsilon_closure(&reached)
    }

    /// Simulate the NFA on a word by tracking the set of live states
    pub fn accepts(&self, word: &[Symbol]) -> bool {
        let mut current = self.epsilon_closure(&BTreeSet::from([self.start.clone()]));
        for symbol in word {
            current = self.step(&current, symbol);
            if current.is_empty() {
                return false;
            }
        }
        current.iter().any(|state| self.is_accepting(state))
    }

    /// True when there are no epsilon moves and at most one target per (state, symbol)
    pub fn is_deterministic(&self) -> bool {
        self.transitions
            .iter()
            .all(|((_, input), dsts)| !input.is_epsilon() && dsts.len() <= 1)
    }

    /// True when no accepting state is reachable from the start
    pub fn is_empty(&self) -> bool {
        let mut seen = self.epsilon_closure(&BTreeSet::from([self.start.clone()]));
        let mut worklist: Vec<State> = seen.iter().cloned().collect();

        while let Some(state) = worklist.pop() {
            if self.is_accepting(&state) {
                return false;
            }
            for ((src, _), dsts) in self.transitions.range((state.clone(), Input::Epsilon)..) {
                if *src != state {
                    break;
                }
                for dst in dsts {
                    if seen.insert(dst.clone()) {
                        worklist.push(dst.clone());
                    }
                }
            }
        }

        true
    }
}

impl From<&Dfa> for Nfa {
    fn from(dfa: &Dfa) -> Self {
        let transitions = dfa
            .transitions()
            .map(|(src, symbol, dst)| {
                (
                    (src.clone(), Input::Symbol(symbol.clone())),
                    BTreeSet::from([dst.clone()]),
                )
            })
            .collect();

        Self {
            alphabet: dfa.alphabet().clone(),
            states: dfa.states().clone(),
            start: dfa.start().clone(),
            accepting: dfa.accepting().clone(),
            transitions,
        }
    }
}
