//! DFA minimization by Moore partition refinement
//!
//! Starting from the accepting/non-accepting split, every round groups
//! states by their signature: the group they were in last round plus the
//! group each symbol leads to. A missing transition leads to the implicit
//! dead state, which is refined alongside the declared states: declared
//! states with no way to accept end up in its class, and that class is
//! never emitted as a state of the result. While the dead state shares no
//! group with a declared state its sentinel is `None`. Refinement stops at
//! the first round that does not increase the number of classes; that
//! stable round is recorded too.
//!
//! Group ids are assigned in order of first appearance while scanning the
//! states in sorted order, so the whole trace is deterministic. Each final
//! group is represented by its smallest member.

use super::{Automaton, Dfa};
use crate::core::{Result, State, Symbol};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, span, Level};

/// Index of a group within one partition
pub type GroupId = usize;

/// Why a state landed in its group during one round
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Signature {
    pub accepting: bool,
    /// Group in the previous partition; None for the initial split
    pub previous: Option<GroupId>,
    /// Per alphabet symbol (sorted), the group reached; None when that is the
    /// dead state and it shares no group with a declared state
    pub targets: Vec<Option<GroupId>>,
}

/// A partition of the reachable states into groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    groups: Vec<BTreeSet<State>>,
    #[serde(skip)]
    index: BTreeMap<State, GroupId>,
}

impl Partition {
    /// Group states by key, numbering groups by first appearance in sorted order
    fn by_key<K: Ord + Clone>(
        states: &BTreeSet<State>,
        mut key: impl FnMut(&State) -> K,
    ) -> (Self, BTreeMap<State, K>) {
        let mut ids: BTreeMap<K, GroupId> = BTreeMap::new();
        let mut groups: Vec<BTreeSet<State>> = Vec::new();
        let mut index = BTreeMap::new();
        let mut keys = BTreeMap::new();

        for state in states {
            let k = key(state);
            let id = *ids.entry(k.clone()).or_insert_with(|| {
                groups.push(BTreeSet::new());
                groups.len() - 1
            });
            groups[id].insert(state.clone());
            index.insert(state.clone(), id);
            keys.insert(state.clone(), k);
        }

        (Self { groups, index }, keys)
    }

    pub fn groups(&self) -> &[BTreeSet<State>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_of(&self, state: &State) -> Option<GroupId> {
        self.index.get(state).copied()
    }
}

/// One round of refinement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefinementStep {
    /// 0 for the initial accepting/non-accepting split
    pub round: usize,
    pub partition: Partition,
    pub signatures: BTreeMap<State, Signature>,
    /// Group the implicit dead state shares with declared states, if any
    pub dead_group: Option<GroupId>,
    /// Groups, plus one when the dead state is reachable and stands alone
    #[serde(skip)]
    classes: usize,
}

/// A minimized DFA plus the refinement trace that produced it
#[derive(Debug, Clone)]
pub struct Minimization {
    pub dfa: Dfa,
    /// P0 through the stable final partition
    pub trace: Vec<RefinementStep>,
    /// Alphabet order used for signature targets
    pub symbols: Vec<Symbol>,
    representatives: BTreeMap<State, State>,
}

impl Minimization {
    /// Number of rounds that split at least one group
    pub fn splits(&self) -> usize {
        self.trace
            .windows(2)
            .filter(|pair| pair[1].classes > pair[0].classes)
            .count()
    }

    /// Minimized state standing in for an original state
    ///
    /// None for states that were removed: unreachable ones, and in a partial
    /// DFA the ones that can no longer reach an accepting state.
    pub fn group_of(&self, state: &State) -> Option<&State> {
        self.representatives.get(state)
    }

    pub fn final_partition(&self) -> Option<&Partition> {
        self.trace.last().map(|step| &step.partition)
    }
}

/// Group of the declared states whose signature equals the dead state's
fn dead_group_of(
    partition: &Partition,
    signatures: &BTreeMap<State, Signature>,
    dead: &Signature,
) -> Option<GroupId> {
    signatures
        .iter()
        .find(|(_, signature)| *signature == dead)
        .and_then(|(state, _)| partition.group_of(state))
}

/// Minimize a DFA (complete or partial)
pub fn minimize(dfa: &Dfa) -> Minimization {
    let minimize_span = span!(Level::INFO, "minimize", states = dfa.states().len());
    let _enter = minimize_span.enter();

    let states = dfa.reachable_states();
    if states.len() < dfa.states().len() {
        debug!(
            removed = dfa.states().len() - states.len(),
            "Dropped unreachable states"
        );
    }
    let symbols: Vec<Symbol> = dfa.alphabet().iter().cloned().collect();

    // The dead state takes part only when some reachable move is missing
    let dead_reachable = states
        .iter()
        .any(|state| symbols.iter().any(|symbol| dfa.transition(state, symbol).is_none()));
    let classes = |partition: &Partition, dead: Option<GroupId>| {
        partition.len() + usize::from(dead_reachable && dead.is_none())
    };

    let (mut current, signatures) = Partition::by_key(&states, |state| Signature {
        accepting: dfa.is_accepting(state),
        previous: None,
        targets: Vec::new(),
    });
    let mut dead = if dead_reachable {
        let key = Signature {
            accepting: false,
            previous: None,
            targets: Vec::new(),
        };
        dead_group_of(&current, &signatures, &key)
    } else {
        None
    };
    debug!(round = 0, groups = current.len(), dead = ?dead, "Initial partition");
    let mut trace = vec![RefinementStep {
        round: 0,
        partition: current.clone(),
        signatures,
        dead_group: dead,
        classes: classes(&current, dead),
    }];

    loop {
        let round = trace.len();
        let (next, signatures) = Partition::by_key(&states, |state| Signature {
            accepting: dfa.is_accepting(state),
            previous: current.group_of(state),
            targets: symbols
                .iter()
                .map(|symbol| match dfa.transition(state, symbol) {
                    Some(target) => current.group_of(target),
                    None => dead,
                })
                .collect(),
        });
        let next_dead = if dead_reachable {
            let key = Signature {
                accepting: false,
                previous: dead,
                targets: vec![dead; symbols.len()],
            };
            dead_group_of(&next, &signatures, &key)
        } else {
            None
        };

        let next_classes = classes(&next, next_dead);
        let stable = trace
            .last()
            .map_or(false, |previous| previous.classes == next_classes);
        debug!(round, groups = next.len(), dead = ?next_dead, stable, "Refined partition");
        trace.push(RefinementStep {
            round,
            partition: next.clone(),
            signatures,
            dead_group: next_dead,
            classes: next_classes,
        });
        current = next;
        dead = next_dead;

        if stable {
            break;
        }
    }

    // The dead class stays only when it holds the start (empty language)
    let start_group = current.group_of(dfa.start());
    let dropped = dead.filter(|group| Some(*group) != start_group);
    let mut representatives = BTreeMap::new();
    for (id, group) in current.groups().iter().enumerate() {
        if Some(id) == dropped {
            debug!(states = group.len(), "Dropped dead states");
            continue;
        }
        if let Some(representative) = group.first() {
            for member in group {
                representatives.insert(member.clone(), representative.clone());
            }
        }
    }

    let mut transitions = BTreeMap::new();
    let mut accepting = BTreeSet::new();
    let min_states: BTreeSet<State> = representatives.values().cloned().collect();
    for state in &min_states {
        if dfa.is_accepting(state) {
            accepting.insert(state.clone());
        }
        for symbol in &symbols {
            let Some(target) = dfa.transition(state, symbol) else {
                continue;
            };
            if dead.is_some() && current.group_of(target) == dead {
                continue;
            }
            if let Some(representative) = representatives.get(target) {
                transitions.insert((state.clone(), symbol.clone()), representative.clone());
            }
        }
    }

    // start is always reachable and never dropped, so it has a representative
    let start = representatives
        .get(dfa.start())
        .cloned()
        .unwrap_or_else(|| dfa.start().clone());

    info!(
        original = dfa.states().len(),
        minimized = min_states.len(),
        rounds = trace.len(),
        "Minimized DFA"
    );

    Minimization {
        dfa: Dfa::from_parts(dfa.alphabet().clone(), min_states, start, accepting, transitions),
        trace,
        symbols,
        representatives,
    }
}

/// Minimize any automaton that is deterministic
///
/// Fails with `NotDeterministic` for an NFA with epsilon moves or several
/// targets per (state, symbol), before any refinement happens.
pub fn minimize_automaton(automaton: &Automaton) -> Result<Minimization> {
    match automaton {
        Automaton::Dfa(dfa) => Ok(minimize(dfa)),
        Automaton::Nfa(nfa) => Ok(minimize(&Dfa::try_from_nfa(nfa)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{Completion, Nfa};
    use crate::core::{symbols_of, AutomatonError};
    use crate::table::TransitionTable;

    fn st(label: &str) -> State {
        State::atomic(label)
    }

    /// A, B, C, D over {0,1}; B and C are equivalent
    fn four_state_dfa() -> Dfa {
        let table = TransitionTable::new()
            .with_alphabet(["0", "1"])
            .with_start("A")
            .with_accepting(["D"])
            .with_transition("A", "0", "B")
            .with_transition("A", "1", "C")
            .with_transition("B", "0", "D")
            .with_transition("B", "1", "B")
            .with_transition("C", "0", "D")
            .with_transition("C", "1", "C")
            .with_transition("D", "0", "D")
            .with_transition("D", "1", "D");
        Dfa::from_table(&table, Completion::Complete).unwrap()
    }

    #[test]
    fn test_four_state_scenario() {
        let result = minimize(&four_state_dfa());

        assert_eq!(result.dfa.states().len(), 3);
        assert_eq!(result.splits(), 1);
        assert_eq!(result.trace.len(), 3);

        let p0 = &result.trace[0].partition;
        assert_eq!(p0.len(), 2);
        assert_eq!(p0.group_of(&st("A")), Some(0));
        assert_eq!(p0.group_of(&st("D")), Some(1));

        let p1 = &result.trace[1].partition;
        assert_eq!(p1.len(), 3);
        assert_eq!(p1.group_of(&st("B")), p1.group_of(&st("C")));
        assert_ne!(p1.group_of(&st("A")), p1.group_of(&st("B")));

        assert_eq!(result.trace[2].partition.groups(), p1.groups());
    }

    #[test]
    fn test_representative_is_smallest_member() {
        let result = minimize(&four_state_dfa());
        assert_eq!(result.group_of(&st("C")), Some(&st("B")));
        assert_eq!(result.group_of(&st("B")), Some(&st("B")));
        assert!(!result.dfa.states().contains(&st("C")));
        assert_eq!(
            result.dfa.transition(&st("A"), &Symbol::from("1")),
            Some(&st("B"))
        );
    }

    #[test]
    fn test_signatures_are_recorded() {
        let result = minimize(&four_state_dfa());
        let round1 = &result.trace[1];
        let b = &round1.signatures[&st("B")];
        assert_eq!(b.previous, Some(0));
        assert_eq!(b.targets, vec![Some(1), Some(0)]);
        assert_eq!(round1.signatures[&st("C")], *b);
    }

    #[test]
    fn test_language_preserved() {
        let original = four_state_dfa();
        let result = minimize(&original);
        for word in ["", "0", "1", "00", "10", "110", "1111", "0101"] {
            assert_eq!(
                original.accepts(&symbols_of(word)),
                result.dfa.accepts(&symbols_of(word)),
                "word {word:?}"
            );
        }
    }

    #[test]
    fn test_partial_dfa_never_gains_sink() {
        let table = TransitionTable::new()
            .with_alphabet(["a", "b"])
            .with_start("p")
            .with_accepting(["r"])
            .with_transition("p", "a", "q")
            .with_transition("q", "b", "r");
        let dfa = Dfa::from_table(&table, Completion::Partial).unwrap();
        let result = minimize(&dfa);

        assert_eq!(result.dfa.states().len(), 3);
        assert_eq!(result.dfa.transition_count(), 2);
        assert!(result.dfa.accepts(&symbols_of("ab")));
        assert!(!result.dfa.accepts(&symbols_of("b")));
    }

    #[test]
    fn test_dead_sentinel_separates_states() {
        // p has no move on b, q does; otherwise identical and non-accepting
        let table = TransitionTable::new()
            .with_alphabet(["a", "b"])
            .with_start("s")
            .with_accepting(["f"])
            .with_transition("s", "a", "p")
            .with_transition("s", "b", "q")
            .with_transition("p", "a", "f")
            .with_transition("q", "a", "f")
            .with_transition("q", "b", "f");
        let dfa = Dfa::from_table(&table, Completion::Partial).unwrap();
        let result = minimize(&dfa);
        assert_ne!(result.group_of(&st("p")), result.group_of(&st("q")));
    }

    #[test]
    fn test_declared_dead_state_joins_missing_moves() {
        // t can never accept, so q --b--> t behaves like p's missing b move
        let table = TransitionTable::new()
            .with_alphabet(["a", "b"])
            .with_start("s")
            .with_accepting(["f"])
            .with_transition("s", "a", "p")
            .with_transition("s", "b", "q")
            .with_transition("p", "a", "f")
            .with_transition("q", "a", "f")
            .with_transition("q", "b", "t");
        let dfa = Dfa::from_table(&table, Completion::Partial).unwrap();
        let result = minimize(&dfa);

        assert_eq!(result.group_of(&st("q")), Some(&st("p")));
        assert_eq!(result.group_of(&st("t")), None);
        let labels: Vec<_> = result.dfa.states().iter().map(State::label).collect();
        assert_eq!(labels, vec!["f", "p", "s"]);
        assert_eq!(result.dfa.transition(&st("p"), &Symbol::from("b")), None);

        // Same count as minimizing the completed DFA, less its sink class
        let completed = minimize(&dfa.complete());
        assert_eq!(result.dfa.states().len(), completed.dfa.states().len() - 1);

        let last = result.trace.last().unwrap();
        assert_eq!(last.dead_group, last.partition.group_of(&st("t")));
        for word in ["a", "aa", "ba", "bb", "bba", "b"] {
            assert_eq!(
                dfa.accepts(&symbols_of(word)),
                result.dfa.accepts(&symbols_of(word)),
                "word {word:?}"
            );
        }
    }

    #[test]
    fn test_dead_start_is_kept_alone() {
        let table = TransitionTable::new()
            .with_alphabet(["a"])
            .with_start("s")
            .with_transition("s", "a", "t");
        let dfa = Dfa::from_table(&table, Completion::Partial).unwrap();
        let result = minimize(&dfa);

        assert_eq!(result.dfa.states().len(), 1);
        assert_eq!(result.dfa.start(), &st("s"));
        assert_eq!(result.dfa.transition_count(), 0);
        assert_eq!(result.group_of(&st("t")), Some(&st("s")));
    }

    #[test]
    fn test_complete_dfa_keeps_its_trap() {
        let table = TransitionTable::new()
            .with_alphabet(["a"])
            .with_start("s")
            .with_accepting(["s"])
            .with_transition("s", "a", "trap")
            .with_transition("trap", "a", "trap");
        let dfa = Dfa::from_table(&table, Completion::Complete).unwrap();
        let result = minimize(&dfa);

        assert_eq!(result.dfa.states().len(), 2);
        assert!(result.dfa.is_complete());
        assert!(result.trace.iter().all(|step| step.dead_group.is_none()));
    }

    #[test]
    fn test_unreachable_states_removed() {
        let table = TransitionTable::new()
            .with_alphabet(["a"])
            .with_start("s")
            .with_accepting(["s"])
            .with_transition("s", "a", "s")
            .with_transition("island", "a", "s");
        let dfa = Dfa::from_table(&table, Completion::Complete).unwrap();
        let result = minimize(&dfa);
        assert_eq!(result.dfa.states().len(), 1);
        assert_eq!(result.group_of(&st("island")), None);
    }

    #[test]
    fn test_all_accepting_single_group() {
        let table = TransitionTable::new()
            .with_alphabet(["a"])
            .with_start("x")
            .with_accepting(["x", "y"])
            .with_transition("x", "a", "y")
            .with_transition("y", "a", "x");
        let dfa = Dfa::from_table(&table, Completion::Complete).unwrap();
        let result = minimize(&dfa);
        assert_eq!(result.trace[0].partition.len(), 1);
        assert_eq!(result.dfa.states().len(), 1);
        assert_eq!(result.splits(), 0);
    }

    #[test]
    fn test_minimize_automaton_rejects_nfa() {
        let table = TransitionTable::new()
            .with_alphabet(["a"])
            .with_start("p")
            .with_transition("p", "eps", "q");
        let nfa = Nfa::from_table(&table).unwrap();
        let err = minimize_automaton(&Automaton::Nfa(nfa)).unwrap_err();
        assert!(matches!(err, AutomatonError::NotDeterministic { .. }));
    }

    #[test]
    fn test_minimize_automaton_accepts_deterministic_nfa() {
        let nfa = Nfa::from(&four_state_dfa());
        let result = minimize_automaton(&Automaton::Nfa(nfa)).unwrap();
        assert_eq!(result.dfa.states().len(), 3);
    }
}
