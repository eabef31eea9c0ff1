//! DFA to regular expression by state elimination
//!
//! The DFA is widened into a generalized NFA with a fresh start and a
//! fresh final node whose edges carry expressions. Useful states are then
//! removed one at a time in label order, rerouting every in/out edge pair
//! through the removed state's self-loop.

use super::Dfa;
use crate::core::{State, Symbol, EPSILON_LABEL};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, span, trace, Level};

/// Regular expression over DFA symbols, kept in simplified form
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Re {
    /// Matches nothing
    Empty,
    Epsilon,
    Symbol(Symbol),
    Concat(Vec<Re>),
    Union(BTreeSet<Re>),
    Star(Box<Re>),
}

impl Re {
    fn union(a: Re, b: Re) -> Re {
        match (a, b) {
            (Re::Empty, x) | (x, Re::Empty) => x,
            (a, b) if a == b => a,
            (a, b) => {
                let mut items = BTreeSet::new();
                for re in [a, b] {
                    match re {
                        Re::Union(inner) => items.extend(inner),
                        other => {
                            items.insert(other);
                        }
                    }
                }
                Re::Union(items)
            }
        }
    }

    fn concat(a: Re, b: Re) -> Re {
        match (a, b) {
            (Re::Empty, _) | (_, Re::Empty) => Re::Empty,
            (Re::Epsilon, x) | (x, Re::Epsilon) => x,
            (a, b) => {
                let mut items = Vec::new();
                for re in [a, b] {
                    match re {
                        Re::Concat(inner) => items.extend(inner),
                        other => items.push(other),
                    }
                }
                Re::Concat(items)
            }
        }
    }

    fn star(re: Re) -> Re {
        match re {
            Re::Empty | Re::Epsilon => Re::Epsilon,
            Re::Star(_) => re,
            // (ε|r)* = r*
            Re::Union(mut items) => {
                if items.remove(&Re::Epsilon) {
                    Re::star(items.into_iter().fold(Re::Empty, Re::union))
                } else {
                    Re::Star(Box::new(Re::Union(items)))
                }
            }
            other => Re::Star(Box::new(other)),
        }
    }

    /// 0: union, 1: concatenation, 2: star operand
    fn write_prec(&self, f: &mut fmt::Formatter<'_>, prec: u8) -> fmt::Result {
        match self {
            Re::Empty => f.write_str("∅"),
            Re::Epsilon => f.write_str(EPSILON_LABEL),
            Re::Symbol(symbol) => write!(f, "{}", symbol),
            Re::Concat(items) => {
                if prec > 1 {
                    f.write_str("(")?;
                }
                for item in items {
                    item.write_prec(f, 2)?;
                }
                if prec > 1 {
                    f.write_str(")")?;
                }
                Ok(())
            }
            Re::Union(items) => {
                if prec > 0 {
                    f.write_str("(")?;
                }
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    item.write_prec(f, 1)?;
                }
                if prec > 0 {
                    f.write_str(")")?;
                }
                Ok(())
            }
            Re::Star(inner) => {
                inner.write_prec(f, 2)?;
                f.write_str("*")
            }
        }
    }
}

impl fmt::Display for Re {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_prec(f, 0)
    }
}

/// Generalized NFA: expression-labeled edges between numbered nodes
struct Gnfa {
    edges: BTreeMap<(usize, usize), Re>,
}

impl Gnfa {
    fn add(&mut self, from: usize, to: usize, re: Re) {
        let slot = self.edges.entry((from, to)).or_insert(Re::Empty);
        *slot = Re::union(std::mem::replace(slot, Re::Empty), re);
    }

    fn take_matching(&mut self, pred: impl Fn(usize, usize) -> bool) -> Vec<((usize, usize), Re)> {
        let keys: Vec<(usize, usize)> = self
            .edges
            .keys()
            .filter(|(from, to)| pred(*from, *to))
            .copied()
            .collect();
        keys.into_iter()
            .filter_map(|key| self.edges.remove(&key).map(|re| (key, re)))
            .collect()
    }

    /// Remove `node`, rerouting every path that went through it
    fn eliminate(&mut self, node: usize) {
        let self_loop = Re::star(self.edges.remove(&(node, node)).unwrap_or(Re::Empty));
        let incoming = self.take_matching(|_, to| to == node);
        let outgoing = self.take_matching(|from, _| from == node);

        for ((from, _), into) in &incoming {
            for ((_, to), out) in &outgoing {
                let path = Re::concat(
                    Re::concat(into.clone(), self_loop.clone()),
                    out.clone(),
                );
                self.add(*from, *to, path);
            }
        }
    }
}

fn eliminate_states(dfa: &Dfa) -> Re {
    let useful: Vec<State> = dfa.useful_states().into_iter().collect();
    let index: BTreeMap<&State, usize> = useful.iter().enumerate().map(|(i, s)| (s, i)).collect();
    let Some(&start) = index.get(dfa.start()) else {
        return Re::Empty;
    };

    let source = useful.len();
    let sink = useful.len() + 1;
    let mut gnfa = Gnfa {
        edges: BTreeMap::new(),
    };

    gnfa.add(source, start, Re::Epsilon);
    for (state, &i) in &index {
        if dfa.is_accepting(state) {
            gnfa.add(i, sink, Re::Epsilon);
        }
    }
    for (src, symbol, dst) in dfa.transitions() {
        if let (Some(&i), Some(&j)) = (index.get(src), index.get(dst)) {
            gnfa.add(i, j, Re::Symbol(symbol.clone()));
        }
    }

    for (node, state) in useful.iter().enumerate() {
        gnfa.eliminate(node);
        trace!(state = %state, edges = gnfa.edges.len(), "Eliminated state");
    }

    gnfa.edges.remove(&(source, sink)).unwrap_or(Re::Empty)
}

/// Regular expression for the DFA's language
///
/// None when the language is empty. Epsilon prints as `ε`, union as `|`
/// and Kleene star as `*`.
pub fn to_regex(dfa: &Dfa) -> Option<String> {
    let regex_span = span!(Level::INFO, "to_regex", states = dfa.states().len());
    let _enter = regex_span.enter();

    let re = eliminate_states(dfa);
    if re == Re::Empty {
        debug!("Empty language has no regex");
        return None;
    }

    let text = re.to_string();
    debug!(regex = %text, "Built regex");
    Some(text)
}
