//! Language queries on DFAs: emptiness, finiteness, cardinality

use super::Dfa;
use crate::core::{State, Symbol};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, span, Level};

impl Dfa {
    /// States that can reach an accepting state
    pub fn coreachable_states(&self) -> BTreeSet<State> {
        let mut predecessors: BTreeMap<&State, Vec<&State>> = BTreeMap::new();
        for (src, _, dst) in self.transitions() {
            predecessors.entry(dst).or_default().push(src);
        }

        let mut seen: BTreeSet<State> = self.accepting().clone();
        let mut queue: VecDeque<&State> = self.accepting().iter().collect();
        while let Some(state) = queue.pop_front() {
            for &pred in predecessors.get(state).into_iter().flatten() {
                if seen.insert(pred.clone()) {
                    queue.push_back(pred);
                }
            }
        }
        seen
    }

    /// Reachable states from which acceptance is still possible
    pub fn useful_states(&self) -> BTreeSet<State> {
        let coreachable = self.coreachable_states();
        self.reachable_states()
            .into_iter()
            .filter(|s| coreachable.contains(s))
            .collect()
    }

    /// True when the DFA accepts no word at all
    pub fn is_empty(&self) -> bool {
        self.reachable_states()
            .iter()
            .all(|state| !self.is_accepting(state))
    }

    /// Useful states in topological order, or None if they contain a cycle
    fn useful_topological_order(&self) -> Option<Vec<State>> {
        let useful = self.useful_states();
        let mut in_degree: BTreeMap<&State, usize> = useful.iter().map(|s| (s, 0)).collect();
        for (src, _, dst) in self.transitions() {
            if useful.contains(src) && useful.contains(dst) {
                *in_degree.entry(dst).or_default() += 1;
            }
        }

        let mut queue: VecDeque<&State> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(state, _)| *state)
            .collect();
        let mut order = Vec::with_capacity(useful.len());

        while let Some(state) = queue.pop_front() {
            order.push(state.clone());
            for symbol in self.alphabet() {
                let Some(next) = self.transition(state, symbol) else {
                    continue;
                };
                if let Some(degree) = in_degree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(next);
                    }
                }
            }
        }

        (order.len() == useful.len()).then_some(order)
    }

    /// True when the accepted language is finite
    ///
    /// The language is infinite exactly when some cycle runs through
    /// states that are both reachable and co-reachable.
    pub fn is_finite(&self) -> bool {
        self.useful_topological_order().is_some()
    }

    /// Number of accepted words
    ///
    /// None when the language is infinite or the count overflows `u128`.
    pub fn cardinality(&self) -> Option<u128> {
        let analysis_span = span!(Level::INFO, "cardinality", states = self.states().len());
        let _enter = analysis_span.enter();

        let order = self.useful_topological_order()?;
        let useful: BTreeSet<&State> = order.iter().collect();

        let mut paths: BTreeMap<&State, u128> = BTreeMap::new();
        if useful.contains(self.start()) {
            paths.insert(self.start(), 1);
        }

        let mut total: u128 = 0;
        for state in &order {
            let count = paths.get(state).copied().unwrap_or(0);
            if count == 0 {
                continue;
            }
            if self.is_accepting(state) {
                total = total.checked_add(count)?;
            }
            for symbol in self.alphabet() {
                if let Some(next) = self.transition(state, symbol) {
                    if useful.contains(next) {
                        let entry = paths.entry(next).or_insert(0);
                        *entry = entry.checked_add(count)?;
                    }
                }
            }
        }

        debug!(total = %total, "Counted accepted words");
        Some(total)
    }

    /// Accepted words of length at most `max_len`, shortest first, then lexicographic
    pub fn words_up_to(&self, max_len: usize) -> Vec<Vec<Symbol>> {
        let useful = self.useful_states();
        let mut words = Vec::new();
        if !useful.contains(self.start()) {
            return words;
        }

        let mut frontier: Vec<(Vec<Symbol>, &State)> = vec![(Vec::new(), self.start())];
        for length in 0..=max_len {
            for (word, state) in &frontier {
                if self.is_accepting(state) {
                    words.push(word.clone());
                }
            }
            if length == max_len {
                break;
            }

            let mut next_frontier = Vec::new();
            for (word, state) in &frontier {
                for symbol in self.alphabet() {
                    if let Some(next) = self.transition(state, symbol) {
                        if useful.contains(next) {
                            let mut extended = word.clone();
                            extended.push(symbol.clone());
                            next_frontier.push((extended, next));
                        }
                    }
                }
            }
            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }

        words
    }
}
