//! Core type definitions for automaton processing
//!
//! This module contains the value types shared by every stage of the
//! engine: states (atomic or composite), input symbols and the
//! symbol-or-epsilon input used by NFA transitions.

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

/// Spellings accepted for the empty input
pub const EPSILON_ALIASES: &[&str] = &["ε", "eps", "epsilon"];

/// Canonical display form of the empty input
pub const EPSILON_LABEL: &str = "ε";

/// Characters that force a member label to be quoted inside a composite label
const MEMBER_DELIMITERS: &[char] = &[',', '"', '\\'];

/// Member label as written inside a composite label
///
/// Labels that are empty or contain a delimiter are quoted, with `\` and
/// `"` backslash-escaped, so distinct member sets never share a label.
fn member_label(label: &str) -> Cow<'_, str> {
    if !label.is_empty() && !label.contains(MEMBER_DELIMITERS) {
        return Cow::Borrowed(label);
    }
    let mut quoted = String::with_capacity(label.len() + 2);
    quoted.push('"');
    for c in label.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// An automaton state
///
/// Atomic states carry a single authored label. Composite states are sets
/// of states produced by subset construction; two composite states are
/// equal iff their member sets are equal. States order by their display
/// label first, which is what gives minimization its lexicographic
/// tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct State {
    // Field order matters for the derived Ord: label, then flavor.
    label: String,
    kind: StateKind,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum StateKind {
    Atomic,
    Composite(BTreeSet<State>),
}

impl State {
    /// Create an atomic state
    pub fn atomic(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: StateKind::Atomic,
        }
    }

    /// Create a composite state from its members
    ///
    /// The label is the member labels in sorted order, comma-joined and
    /// wrapped in braces: `{q0,q1}`. A member label that is empty or holds
    /// a comma, quote or backslash is quoted: `{"a,b",b}`.
    pub fn composite(members: impl IntoIterator<Item = State>) -> Self {
        let members: BTreeSet<State> = members.into_iter().collect();
        let joined = members
            .iter()
            .map(|m| member_label(&m.label))
            .collect::<Vec<_>>()
            .join(",");
        Self {
            label: format!("{{{}}}", joined),
            kind: StateKind::Composite(members),
        }
    }

    /// Canonical display label
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, StateKind::Composite(_))
    }

    /// Member states of a composite state (None for atomic states)
    pub fn members(&self) -> Option<&BTreeSet<State>> {
        match &self.kind {
            StateKind::Atomic => None,
            StateKind::Composite(members) => Some(members),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl From<&str> for State {
    fn from(label: &str) -> Self {
        State::atomic(label)
    }
}

impl From<String> for State {
    fn from(label: String) -> Self {
        State::atomic(label)
    }
}

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}

/// An input symbol (never the empty input)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(symbol: &str) -> Self {
        Symbol::new(symbol)
    }
}

impl From<char> for Symbol {
    fn from(symbol: char) -> Self {
        Symbol::new(symbol.to_string())
    }
}

/// Input consumed by a transition: a symbol or the empty input
///
/// Epsilon orders before every symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Input {
    Epsilon,
    Symbol(Symbol),
}

impl Input {
    /// Interpret a table token, recognizing the epsilon spellings
    pub fn parse(token: &str) -> Self {
        if is_epsilon(token) {
            Input::Epsilon
        } else {
            Input::Symbol(Symbol::new(token))
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Input::Epsilon)
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Input::Epsilon => None,
            Input::Symbol(symbol) => Some(symbol),
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Epsilon => f.write_str(EPSILON_LABEL),
            Input::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

impl From<Symbol> for Input {
    fn from(symbol: Symbol) -> Self {
        Input::Symbol(symbol)
    }
}

impl From<&str> for Input {
    fn from(token: &str) -> Self {
        Input::parse(token)
    }
}

/// Returns true if the token is one of the epsilon spellings
pub fn is_epsilon(token: &str) -> bool {
    EPSILON_ALIASES.contains(&token)
}

/// Split a word into single-character symbols
///
/// Convenience for alphabets whose symbols are all one character long.
pub fn symbols_of(word: &str) -> Vec<Symbol> {
    word.chars().map(Symbol::from).collect()
}
