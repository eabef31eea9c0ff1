//! Transition tables: the engine's input shape
//!
//! A table is a list of `(source, input, destination)` rows plus the
//! declared alphabet, the (optionally declared) state set, a start state
//! and the accepting states. Tables are plain data; validation happens
//! when an [`Nfa`](crate::automaton::Nfa) or [`Dfa`](crate::automaton::Dfa)
//! is built from one.
//!
//! Tables also have a line-oriented text form:
//!
//! ```text
//! alphabet: 0, 1
//! start: q0
//! accept: q2
//! q0 --ε--> q1
//! q1 --0--> q2
//! ```

mod parser;

pub use parser::{Statement, TableParser};

use crate::automaton::{Dfa, Nfa};
use crate::core::{AutomatonError, Input, Result, State, Symbol};
use std::collections::BTreeSet;
use std::fmt;

/// One row of a transition table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRow {
    pub source: State,
    pub input: Input,
    pub target: State,
}

impl TransitionRow {
    pub fn new(source: impl Into<State>, input: impl Into<Input>, target: impl Into<State>) -> Self {
        Self {
            source: source.into(),
            input: input.into(),
            target: target.into(),
        }
    }
}

/// Transition table with alphabet, states and start/accept designations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    alphabet: BTreeSet<Symbol>,
    states: Option<BTreeSet<State>>,
    start: Option<State>,
    accepting: BTreeSet<State>,
    rows: Vec<TransitionRow>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the alphabet
    pub fn with_alphabet<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        self.alphabet.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Declare the state set explicitly
    ///
    /// Without a declaration the state set is every state the table mentions.
    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        for state in states {
            self.declare_state(state);
        }
        self
    }

    pub fn with_start(mut self, state: impl Into<State>) -> Self {
        self.start = Some(state.into());
        self
    }

    pub fn with_accepting<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<State>,
    {
        self.accepting.extend(states.into_iter().map(Into::into));
        self
    }

    /// Add a row; `input` may be any epsilon spelling
    pub fn with_transition(
        mut self,
        source: impl Into<State>,
        input: impl Into<Input>,
        target: impl Into<State>,
    ) -> Self {
        self.add_row(TransitionRow::new(source, input, target));
        self
    }

    pub fn add_symbol(&mut self, symbol: impl Into<Symbol>) {
        self.alphabet.insert(symbol.into());
    }

    pub fn declare_state(&mut self, state: impl Into<State>) {
        self.states
            .get_or_insert_with(BTreeSet::new)
            .insert(state.into());
    }

    pub fn set_start(&mut self, state: impl Into<State>) {
        self.start = Some(state.into());
    }

    pub fn add_accepting(&mut self, state: impl Into<State>) {
        self.accepting.insert(state.into());
    }

    pub fn add_row(&mut self, row: TransitionRow) {
        self.rows.push(row);
    }

    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// Explicitly declared states, if any
    pub fn declared_states(&self) -> Option<&BTreeSet<State>> {
        self.states.as_ref()
    }

    pub fn start(&self) -> Option<&State> {
        self.start.as_ref()
    }

    pub fn accepting(&self) -> &BTreeSet<State> {
        &self.accepting
    }

    pub fn rows(&self) -> &[TransitionRow] {
        &self.rows
    }

    /// The state set: declared, or inferred from everything the table names
    pub fn state_set(&self) -> BTreeSet<State> {
        if let Some(declared) = &self.states {
            return declared.clone();
        }
        let mut states: BTreeSet<State> = self.accepting.iter().cloned().collect();
        states.extend(self.start.iter().cloned());
        for row in &self.rows {
            states.insert(row.source.clone());
            states.insert(row.target.clone());
        }
        states
    }

    /// Check structural consistency and return the state set and start state
    pub(crate) fn validate(&self) -> Result<(BTreeSet<State>, State)> {
        let states = self.state_set();

        if let Some(symbol) = self
            .alphabet
            .iter()
            .find(|symbol| Input::parse(symbol.as_str()).is_epsilon())
        {
            return Err(AutomatonError::malformed(format!(
                "alphabet contains the epsilon symbol '{}'",
                symbol
            )));
        }

        let start = self
            .start
            .clone()
            .ok_or_else(|| AutomatonError::malformed("no start state given"))?;
        if !states.contains(&start) {
            return Err(AutomatonError::malformed(format!(
                "start state '{}' is not a declared state",
                start
            )));
        }

        if let Some(state) = self.accepting.iter().find(|s| !states.contains(*s)) {
            return Err(AutomatonError::malformed(format!(
                "accepting state '{}' is not a declared state",
                state
            )));
        }

        for row in &self.rows {
            for state in [&row.source, &row.target] {
                if !states.contains(state) {
                    return Err(AutomatonError::malformed(format!(
                        "transition {} --{}--> {} references undeclared state '{}'",
                        row.source, row.input, row.target, state
                    )));
                }
            }
            if let Input::Symbol(symbol) = &row.input {
                if !self.alphabet.contains(symbol) {
                    return Err(AutomatonError::malformed(format!(
                        "transition {} --{}--> {} uses symbol '{}' outside the alphabet",
                        row.source, row.input, row.target, symbol
                    )));
                }
            }
        }

        Ok((states, start))
    }
}

impl From<&Nfa> for TransitionTable {
    fn from(nfa: &Nfa) -> Self {
        let mut table = TransitionTable::new()
            .with_alphabet(nfa.alphabet().iter().cloned())
            .with_states(nfa.states().iter().cloned())
            .with_start(nfa.start().clone())
            .with_accepting(nfa.accepting().iter().cloned());
        for (source, input, target) in nfa.transitions() {
            table.add_row(TransitionRow::new(source.clone(), input.clone(), target.clone()));
        }
        table
    }
}

impl From<&Dfa> for TransitionTable {
    fn from(dfa: &Dfa) -> Self {
        let mut table = TransitionTable::new()
            .with_alphabet(dfa.alphabet().iter().cloned())
            .with_states(dfa.states().iter().cloned())
            .with_start(dfa.start().clone())
            .with_accepting(dfa.accepting().iter().cloned());
        for (source, symbol, target) in dfa.transitions() {
            table.add_row(TransitionRow::new(
                source.clone(),
                Input::Symbol(symbol.clone()),
                target.clone(),
            ));
        }
        table
    }
}

/// Quote a token unless it is a plain identifier
fn token(text: &str) -> String {
    let plain = !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '\'' | '.'));
    if plain {
        text.to_string()
    } else {
        format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

fn token_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.map(token).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "alphabet: {}",
            token_list(self.alphabet.iter().map(Symbol::as_str))
        )?;
        if let Some(states) = &self.states {
            writeln!(f, "states: {}", token_list(states.iter().map(State::label)))?;
        }
        if let Some(start) = &self.start {
            writeln!(f, "start: {}", token(start.label()))?;
        }
        writeln!(
            f,
            "accept: {}",
            token_list(self.accepting.iter().map(State::label))
        )?;
        for row in &self.rows {
            let input = match &row.input {
                Input::Epsilon => crate::core::EPSILON_LABEL.to_string(),
                Input::Symbol(symbol) => token(symbol.as_str()),
            };
            writeln!(
                f,
                "{} --{}--> {}",
                token(row.source.label()),
                input,
                token(row.target.label())
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransitionTable {
        TransitionTable::new()
            .with_alphabet(["0", "1"])
            .with_start("q0")
            .with_accepting(["q2"])
            .with_transition("q0", "ε", "q1")
            .with_transition("q1", "0", "q2")
    }

    #[test]
    fn test_state_set_is_inferred() {
        let table = sample();
        assert!(table.declared_states().is_none());
        let labels: Vec<_> = table.state_set().into_iter().map(|s| s.to_string()).collect();
        assert_eq!(labels, vec!["q0", "q1", "q2"]);
    }

    #[test]
    fn test_validate_accepts_sample() {
        let (states, start) = sample().validate().unwrap();
        assert_eq!(states.len(), 3);
        assert_eq!(start, State::atomic("q0"));
    }

    #[test]
    fn test_validate_missing_start() {
        let table = TransitionTable::new().with_alphabet(["a"]);
        let err = table.validate().unwrap_err();
        assert!(matches!(err, AutomatonError::MalformedAutomaton { .. }));
    }

    #[test]
    fn test_validate_undeclared_start() {
        let table = sample().with_states(["q1", "q2"]);
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("start state 'q0'"));
    }

    #[test]
    fn test_validate_undeclared_accepting() {
        let table = TransitionTable::new()
            .with_states(["p"])
            .with_start("p")
            .with_accepting(["r"]);
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("accepting state 'r'"));
    }

    #[test]
    fn test_validate_symbol_outside_alphabet() {
        let table = sample().with_transition("q2", "7", "q2");
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("symbol '7'"));
    }

    #[test]
    fn test_validate_undeclared_row_state() {
        let table = sample()
            .with_states(["q0", "q1", "q2"])
            .with_transition("q1", "1", "q9");
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("undeclared state 'q9'"));
    }

    #[test]
    fn test_validate_epsilon_in_alphabet() {
        let table = sample().with_alphabet(["eps"]);
        let err = table.validate().unwrap_err();
        assert!(err.to_string().contains("epsilon"));
    }

    #[test]
    fn test_display_quotes_composite_labels() {
        let table = TransitionTable::new()
            .with_alphabet(["a"])
            .with_start(State::composite([State::atomic("p"), State::atomic("q")]))
            .with_accepting(Vec::<State>::new());
        let text = table.to_string();
        assert!(text.contains("start: \"{p,q}\""));
        assert!(text.contains("alphabet: a"));
    }

    #[test]
    fn test_display_escapes_quotes_and_backslashes() {
        let start = State::composite([State::atomic("a,b"), State::atomic("x\\y")]);
        let table = TransitionTable::new()
            .with_alphabet(["a"])
            .with_start(start.clone())
            .with_accepting(["x\\y"])
            .with_transition(start.clone(), "a", "x\\y");
        let text = table.to_string();
        assert!(text.contains(r#"start: "{\"a,b\",\"x\\\\y\"}""#));

        let reparsed = crate::parse_table(&text).unwrap();
        assert_eq!(reparsed.start().map(State::label), Some(start.label()));
        assert_eq!(reparsed.rows()[0].target.label(), "x\\y");
    }
}
