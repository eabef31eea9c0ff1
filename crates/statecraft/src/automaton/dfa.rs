//! Deterministic finite automaton (DFA)
//!
//! A DFA here may be *partial*: a (state, symbol) pair without an entry
//! stands for an implicit, non-accepting dead state that is never part of
//! the visible state set. Simulation treats such a move as immediate,
//! unrecoverable rejection.

use super::Nfa;
use crate::core::{AutomatonError, Input, Result, State, Symbol};
use crate::table::TransitionTable;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, span, Level};

/// Label used for the materialized sink state of [`Dfa::complete`]
pub const SINK_LABEL: &str = "∅";

/// How missing (state, symbol) pairs are treated when building a DFA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Completion {
    /// Every (state, symbol) pair must have exactly one destination
    #[default]
    Complete,
    /// Missing pairs lead to the implicit dead state
    Partial,
}

/// Outcome of running a DFA on a word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run {
    /// The word ended in an accepting state
    Accepted(State),
    /// The word ended in a non-accepting state
    Rejected(State),
    /// No transition for the symbol at `position`; the run fell into the dead state
    Dead {
        position: usize,
        state: State,
        symbol: Symbol,
    },
}

impl Run {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Run::Accepted(_))
    }
}

/// A deterministic finite automaton
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    alphabet: BTreeSet<Symbol>,
    states: BTreeSet<State>,
    start: State,
    accepting: BTreeSet<State>,
    transitions: BTreeMap<(State, Symbol), State>,
}

impl Dfa {
    /// Build a DFA from a transition table
    ///
    /// Fails with `MalformedAutomaton` for structural problems and with
    /// `NonDeterministicTable` for epsilon rows, pairs with several
    /// destinations, and (unless `Completion::Partial`) pairs with none.
    pub fn from_table(table: &TransitionTable, completion: Completion) -> Result<Self> {
        let build_span = span!(
            Level::INFO,
            "build_dfa",
            rows = table.rows().len(),
            partial = completion == Completion::Partial
        );
        let _enter = build_span.enter();

        let (states, start) = table.validate()?;

        let mut transitions: BTreeMap<(State, Symbol), State> = BTreeMap::new();
        for row in table.rows() {
            let symbol = match &row.input {
                Input::Epsilon => {
                    return Err(AutomatonError::non_deterministic_table(
                        row.source.label(),
                        crate::core::EPSILON_LABEL,
                        "epsilon transitions are not allowed in a DFA",
                    ))
                }
                Input::Symbol(symbol) => symbol.clone(),
            };
            if let Some(existing) = transitions.get(&(row.source.clone(), symbol.clone())) {
                if *existing != row.target {
                    return Err(AutomatonError::non_deterministic_table(
                        row.source.label(),
                        symbol.as_str(),
                        format!("maps to both '{}' and '{}'", existing, row.target),
                    ));
                }
            }
            transitions.insert((row.source.clone(), symbol), row.target.clone());
        }

        if completion == Completion::Complete {
            for state in &states {
                for symbol in table.alphabet() {
                    if !transitions.contains_key(&(state.clone(), symbol.clone())) {
                        return Err(AutomatonError::non_deterministic_table(
                            state.label(),
                            symbol.as_str(),
                            "no destination (use partial mode to allow missing transitions)",
                        ));
                    }
                }
            }
        }

        debug!(
            states = states.len(),
            transitions = transitions.len(),
            "Built DFA"
        );

        Ok(Self {
            alphabet: table.alphabet().clone(),
            states,
            start,
            accepting: table.accepting().clone(),
            transitions,
        })
    }

    /// Reinterpret an NFA whose relation is already deterministic
    ///
    /// Missing moves become implicit dead transitions. Fails with
    /// `NotDeterministic` on an epsilon move or a pair with several targets.
    pub fn try_from_nfa(nfa: &Nfa) -> Result<Self> {
        let mut transitions = BTreeMap::new();
        for (source, input, target) in nfa.transitions() {
            let symbol = input.symbol().ok_or_else(|| {
                AutomatonError::not_deterministic(format!(
                    "epsilon transition {} --ε--> {}",
                    source, target
                ))
            })?;
            let key = (source.clone(), symbol.clone());
            if transitions.insert(key, target.clone()).is_some() {
                return Err(AutomatonError::not_deterministic(format!(
                    "state '{}' has several destinations on '{}'",
                    source, symbol
                )));
            }
        }

        Ok(Self::from_parts(
            nfa.alphabet().clone(),
            nfa.states().clone(),
            nfa.start().clone(),
            nfa.accepting().clone(),
            transitions,
        ))
    }

    /// Assemble a DFA from parts produced by an algorithm in this crate
    pub(crate) fn from_parts(
        alphabet: BTreeSet<Symbol>,
        states: BTreeSet<State>,
        start: State,
        accepting: BTreeSet<State>,
        transitions: BTreeMap<(State, Symbol), State>,
    ) -> Self {
        Self {
            alphabet,
            states,
            start,
            accepting,
            transitions,
        }
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

    /// Destination of `state` on `symbol`; None means the implicit dead state
    pub fn transition(&self, state: &State, symbol: &Symbol) -> Option<&State> {
        self.transitions.get(&(state.clone(), symbol.clone()))
    }

    /// Every transition as (source, symbol, destination), sorted
    pub fn transitions(&self) -> impl Iterator<Item = (&State, &Symbol, &State)> + '_ {
        self.transitions
            .iter()
            .map(|((src, symbol), dst)| (src, symbol, dst))
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Run the DFA on a word, reporting how it ended
    pub fn run(&self, word: &[Symbol]) -> Run {
        let mut current = &self.start;
        for (position, symbol) in word.iter().enumerate() {
            match self.transition(current, symbol) {
                Some(next) => current = next,
                None => {
                    return Run::Dead {
                        position,
                        state: current.clone(),
                        symbol: symbol.clone(),
                    }
                }
            }
        }

        if self.is_accepting(current) {
            Run::Accepted(current.clone())
        } else {
            Run::Rejected(current.clone())
        }
    }

    /// True iff the word is accepted; both kinds of rejection give false
    pub fn accepts(&self, word: &[Symbol]) -> bool {
        self.run(word).is_accepted()
    }

    /// True when every (state, symbol) pair has a destination
    pub fn is_complete(&self) -> bool {
        self.transitions.len() == self.states.len() * self.alphabet.len()
    }

    /// Materialize the implicit dead state as a visible sink
    ///
    /// Returns a clone when the DFA is already complete.
    pub fn complete(&self) -> Dfa {
        if self.is_complete() {
            return self.clone();
        }

        let mut label = SINK_LABEL.to_string();
        while self.states.iter().any(|s| s.label() == label) {
            label.push('\'');
        }
        let sink = State::atomic(label);

        let mut states = self.states.clone();
        states.insert(sink.clone());
        let mut transitions = self.transitions.clone();
        for state in &states {
            for symbol in &self.alphabet {
                transitions
                    .entry((state.clone(), symbol.clone()))
                    .or_insert_with(|| sink.clone());
            }
        }

        debug!(sink = %sink, "Materialized sink state");
        Self::from_parts(
            self.alphabet.clone(),
            states,
            self.start.clone(),
            self.accepting.clone(),
            transitions,
        )
    }

    /// States reachable from the start state
    pub fn reachable_states(&self) -> BTreeSet<State> {
        let mut reachable = BTreeSet::from([self.start.clone()]);
        let mut queue = VecDeque::from([self.start.clone()]);

        while let Some(state) = queue.pop_front() {
            for symbol in &self.alphabet {
                if let Some(next) = self.transition(&state, symbol) {
                    if reachable.insert(next.clone()) {
                        queue.push_back(next.clone());
                    }
                }
            }
        }

        reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbols_of;

    /// Accepts binary strings ending in 1
    fn ends_in_one() -> TransitionTable {
        TransitionTable::new()
            .with_alphabet(["0", "1"])
            .with_start("a")
            .with_accepting(["b"])
            .with_transition("a", "0", "a")
            .with_transition("a", "1", "b")
            .with_transition("b", "0", "a")
            .with_transition("b", "1", "b")
    }

    #[test]
    fn test_complete_dfa() {
        let dfa = Dfa::from_table(&ends_in_one(), Completion::Complete).unwrap();
        assert!(dfa.is_complete());
        assert!(dfa.accepts(&symbols_of("0101")));
        assert!(!dfa.accepts(&symbols_of("10")));
        assert!(!dfa.accepts(&symbols_of("")));
    }

    #[test]
    fn test_duplicate_destination_rejected() {
        let table = ends_in_one().with_transition("a", "0", "b");
        let err = Dfa::from_table(&table, Completion::Partial).unwrap_err();
        match err {
            AutomatonError::NonDeterministicTable { state, symbol, .. } => {
                assert_eq!(state, "a");
                assert_eq!(symbol, "0");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_repeated_identical_row_is_fine() {
        let table = ends_in_one().with_transition("a", "0", "a");
        assert!(Dfa::from_table(&table, Completion::Complete).is_ok());
    }

    #[test]
    fn test_epsilon_row_rejected() {
        let table = ends_in_one().with_transition("a", "ε", "b");
        let err = Dfa::from_table(&table, Completion::Partial).unwrap_err();
        assert!(matches!(err, AutomatonError::NonDeterministicTable { .. }));
    }

    #[test]
    fn test_missing_transition_requires_partial_mode() {
        let table = TransitionTable::new()
            .with_alphabet(["0", "1"])
            .with_start("a")
            .with_accepting(["b"])
            .with_transition("a", "1", "b");

        let err = Dfa::from_table(&table, Completion::Complete).unwrap_err();
        assert!(err.to_string().contains("no destination"));

        let dfa = Dfa::from_table(&table, Completion::Partial).unwrap();
        assert!(!dfa.is_complete());
        assert_eq!(dfa.states().len(), 2);
        assert!(dfa.accepts(&symbols_of("1")));
    }

    #[test]
    fn test_run_distinguishes_dead_from_rejected() {
        let table = TransitionTable::new()
            .with_alphabet(["0", "1"])
            .with_start("a")
            .with_accepting(["b"])
            .with_transition("a", "0", "a")
            .with_transition("a", "1", "b");
        let dfa = Dfa::from_table(&table, Completion::Partial).unwrap();

        assert_eq!(dfa.run(&symbols_of("01")), Run::Accepted(State::atomic("b")));
        assert_eq!(dfa.run(&symbols_of("00")), Run::Rejected(State::atomic("a")));
        assert_eq!(
            dfa.run(&symbols_of("011")),
            Run::Dead {
                position: 2,
                state: State::atomic("b"),
                symbol: Symbol::from("1"),
            }
        );
        assert!(!dfa.accepts(&symbols_of("011")));
    }

    #[test]
    fn test_complete_materializes_sink() {
        let table = TransitionTable::new()
            .with_alphabet(["x"])
            .with_start("p")
            .with_accepting(["p"]);
        let partial = Dfa::from_table(&table, Completion::Partial).unwrap();
        let complete = partial.complete();

        assert!(complete.is_complete());
        assert_eq!(complete.states().len(), 2);
        let sink = State::atomic(SINK_LABEL);
        assert_eq!(complete.transition(&State::atomic("p"), &Symbol::from("x")), Some(&sink));
        assert_eq!(complete.transition(&sink, &Symbol::from("x")), Some(&sink));
        assert!(!complete.is_accepting(&sink));
        // source value untouched
        assert_eq!(partial.states().len(), 1);
    }

    #[test]
    fn test_sink_label_avoids_collisions() {
        let table = TransitionTable::new()
            .with_alphabet(["x"])
            .with_start(SINK_LABEL);
        let dfa = Dfa::from_table(&table, Completion::Partial).unwrap().complete();
        assert!(dfa.states().contains(&State::atomic("∅'")));
    }

    #[test]
    fn test_try_from_nfa() {
        let nfa = Nfa::from_table(&ends_in_one()).unwrap();
        let dfa = Dfa::try_from_nfa(&nfa).unwrap();
        assert!(dfa.accepts(&symbols_of("11")));

        let nondeterministic = Nfa::from_table(&ends_in_one().with_transition("a", "1", "a")).unwrap();
        let err = Dfa::try_from_nfa(&nondeterministic).unwrap_err();
        assert!(matches!(err, AutomatonError::NotDeterministic { .. }));
    }

    #[test]
    fn test_reachable_states() {
        let table = ends_in_one().with_states(["a", "b", "island"]);
        let dfa = Dfa::from_table(&table, Completion::Partial).unwrap();
        let reachable = dfa.reachable_states();
        assert_eq!(reachable.len(), 2);
        assert!(!reachable.contains(&State::atomic("island")));
    }
}
