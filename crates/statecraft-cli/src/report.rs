//! Plain-text reports: transition matrices, construction traces and
//! language analysis
//!
//! Labels such as `ε`, `∅` and `{q0,q1}` mix multi-byte characters with
//! ASCII, so column widths are measured with `unicode-width` rather than
//! byte length.

use serde::Serialize;
use statecraft::automaton::{
    minimize, to_regex, Automaton, Dfa, Minimization, SubsetConstruction,
};
use std::fmt;
use unicode_width::UnicodeWidthStr;

/// Pad `text` on the right to `width` display columns
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

/// Render rows under a header with every column aligned
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.width());
            } else {
                widths.push(cell.width());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

/// One row per state, one column per symbol; `→` marks the start, `*` accepting states
pub fn transition_matrix(dfa: &Dfa) -> String {
    let symbols: Vec<String> = dfa.alphabet().iter().map(|s| s.to_string()).collect();
    let mut headers = vec!["", "state"];
    headers.extend(symbols.iter().map(String::as_str));

    let rows: Vec<Vec<String>> = dfa
        .states()
        .iter()
        .map(|state| {
            let mut marker = String::new();
            if state == dfa.start() {
                marker.push('→');
            }
            if dfa.is_accepting(state) {
                marker.push('*');
            }
            let mut row = vec![marker, state.to_string()];
            for symbol in dfa.alphabet() {
                row.push(
                    dfa.transition(state, symbol)
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            row
        })
        .collect();

    render_table(&headers, &rows)
}

/// The expansions performed by subset construction, in order
pub fn subset_trace(construction: &SubsetConstruction) -> String {
    let rows: Vec<Vec<String>> = construction
        .steps
        .iter()
        .map(|step| {
            vec![
                step.from.to_string(),
                step.symbol.to_string(),
                step.to
                    .as_ref()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                if step.discovered { "new" } else { "" }.to_string(),
            ]
        })
        .collect();
    render_table(&["from", "symbol", "to", ""], &rows)
}

fn group_name(group: Option<usize>) -> String {
    group
        .map(|g| format!("G{}", g))
        .unwrap_or_else(|| "dead".to_string())
}

/// Every refinement round: its groups and each state's signature
pub fn refinement_trace(minimization: &Minimization) -> String {
    let mut out = String::new();
    let mut headers = vec!["state", "group", "accepting", "previous"];
    let symbols: Vec<String> = minimization.symbols.iter().map(|s| s.to_string()).collect();
    headers.extend(symbols.iter().map(String::as_str));

    for step in &minimization.trace {
        let groups: Vec<String> = step
            .partition
            .groups()
            .iter()
            .enumerate()
            .map(|(i, group)| {
                let members: Vec<&str> = group.iter().map(|s| s.label()).collect();
                format!("G{}={{{}}}", i, members.join(","))
            })
            .collect();
        let dead = step
            .dead_group
            .map(|g| format!(" (G{} is dead)", g))
            .unwrap_or_default();
        out.push_str(&format!(
            "round {}: {} group(s) {}{}\n",
            step.round,
            step.partition.len(),
            groups.join(" "),
            dead
        ));

        let rows: Vec<Vec<String>> = step
            .signatures
            .iter()
            .map(|(state, signature)| {
                let mut row = vec![
                    state.to_string(),
                    group_name(step.partition.group_of(state)),
                    if signature.accepting { "yes" } else { "no" }.to_string(),
                    signature
                        .previous
                        .map(|g| format!("G{}", g))
                        .unwrap_or_else(|| "-".to_string()),
                ];
                row.extend(signature.targets.iter().map(|t| group_name(*t)));
                row
            })
            .collect();
        out.push_str(&render_table(&headers, &rows));
        out.push('\n');
    }

    out.push_str(&format!(
        "{} split(s), {} round(s)\n",
        minimization.splits(),
        minimization.trace.len()
    ));
    out
}

/// Language facts about an automaton
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub kind: String,
    pub states: usize,
    pub transitions: usize,
    pub deterministic: bool,
    pub minimal_states: usize,
    pub empty: bool,
    pub finite: bool,
    /// None when the language is infinite or its size overflows `u128`
    pub cardinality: Option<u128>,
    /// None for the empty language
    pub regex: Option<String>,
}

impl AnalysisReport {
    pub fn analyze(automaton: &Automaton) -> Self {
        let (transitions, deterministic) = match automaton {
            Automaton::Nfa(nfa) => (nfa.transition_count(), nfa.is_deterministic()),
            Automaton::Dfa(dfa) => (dfa.transition_count(), true),
        };
        let dfa = automaton.to_dfa();
        let minimal = minimize(&dfa);

        Self {
            kind: automaton.kind().to_string(),
            states: automaton.state_count(),
            transitions,
            deterministic,
            minimal_states: minimal.dfa.states().len(),
            empty: dfa.is_empty(),
            finite: dfa.is_finite(),
            cardinality: dfa.cardinality(),
            regex: to_regex(&minimal.dfa),
        }
    }

    fn cardinality_text(&self) -> String {
        match self.cardinality {
            Some(n) => n.to_string(),
            None if self.finite => format!("overflow (more than {})", u128::MAX),
            None => "infinite".to_string(),
        }
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yes_no = |b: bool| if b { "yes" } else { "no" }.to_string();
        let fields = [
            ("kind", self.kind.clone()),
            ("states", self.states.to_string()),
            ("transitions", self.transitions.to_string()),
            ("deterministic", yes_no(self.deterministic)),
            ("minimal states", self.minimal_states.to_string()),
            ("empty", yes_no(self.empty)),
            ("finite", yes_no(self.finite)),
            ("cardinality", self.cardinality_text()),
            ("regex", self.regex.clone().unwrap_or_else(|| "∅".to_string())),
        ];
        let width = fields.iter().map(|(k, _)| k.width()).max().unwrap_or(0);
        for (key, value) in fields {
            writeln!(f, "{} {}", pad(&format!("{}:", key), width + 1), value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statecraft::automaton::{subset_construction, Completion};
    use statecraft::{parse_dfa, parse_nfa};

    const EPSILON_NFA: &str = "alphabet: 0, 1\nstart: q0\naccept: q2\nq0 --ε--> q1\nq1 --0--> q2\nq2 --1--> q2";

    #[test]
    fn test_render_table_aligns_by_display_width() {
        let rows = vec![
            vec!["∅".to_string(), "x".to_string()],
            vec!["abc".to_string(), "y".to_string()],
        ];
        let table = render_table(&["a", "b"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "a    b");
        assert_eq!(lines[1], "---  -");
        assert_eq!(lines[2], "∅    x");
        assert_eq!(lines[3], "abc  y");
    }

    #[test]
    fn test_transition_matrix_marks_start_and_accepting() {
        let dfa = parse_dfa(
            "alphabet: a\nstart: p\naccept: q\np --a--> q",
            Completion::Partial,
        )
        .unwrap();
        let matrix = transition_matrix(&dfa);
        let lines: Vec<&str> = matrix.lines().collect();
        assert!(lines[2].starts_with("→"));
        assert!(lines[2].contains("p"));
        assert!(lines[3].starts_with("*"));
        assert!(lines[3].ends_with("-"));
    }

    #[test]
    fn test_subset_trace_lists_discoveries() {
        let nfa = parse_nfa(EPSILON_NFA).unwrap();
        let trace = subset_trace(&subset_construction(&nfa));
        assert!(trace.lines().any(|l| l.starts_with("{q0,q1}") && l.ends_with("new")));
        assert!(trace.contains("{q2}"));
    }

    #[test]
    fn test_refinement_trace_reports_rounds() {
        let dfa = parse_dfa(
            "alphabet: a\nstart: x\naccept: x, y\nx --a--> y\ny --a--> x",
            Completion::Complete,
        )
        .unwrap();
        let trace = refinement_trace(&minimize(&dfa));
        assert!(trace.starts_with("round 0: 1 group(s) G0={x,y}"));
        assert!(trace.contains("0 split(s)"));
    }

    #[test]
    fn test_refinement_trace_marks_dead_group() {
        let dfa = parse_dfa(
            "alphabet: a, b\nstart: s\naccept: f\ns --a--> p\ns --b--> q\np --a--> f\nq --a--> f\nq --b--> t",
            Completion::Partial,
        )
        .unwrap();
        let trace = refinement_trace(&minimize(&dfa));
        let last_round = trace
            .lines()
            .filter(|l| l.starts_with("round "))
            .last()
            .unwrap();
        let t_group = trace
            .lines()
            .filter(|l| l.starts_with("t "))
            .last()
            .and_then(|l| l.split_whitespace().nth(1))
            .unwrap();
        assert!(last_round.ends_with(&format!("({} is dead)", t_group)));
    }

    #[test]
    fn test_analysis_of_infinite_language() {
        let automaton = Automaton::from(parse_nfa(EPSILON_NFA).unwrap());
        let report = AnalysisReport::analyze(&automaton);
        assert_eq!(report.kind, "NFA");
        assert!(!report.deterministic);
        assert!(!report.empty);
        assert!(!report.finite);
        assert_eq!(report.cardinality, None);
        assert!(report.to_string().contains("cardinality:    infinite"));
    }

    #[test]
    fn test_cardinality_overflow_is_not_infinite() {
        let report = AnalysisReport {
            kind: "DFA".to_string(),
            states: 130,
            transitions: 258,
            deterministic: true,
            minimal_states: 130,
            empty: false,
            finite: true,
            cardinality: None,
            regex: None,
        };
        let text = report.to_string();
        assert!(text.contains("cardinality:    overflow (more than"));
        assert!(!text.contains("infinite"));
    }

    #[test]
    fn test_analysis_of_finite_language() {
        let dfa = parse_dfa(
            "alphabet: a, b\nstart: p\naccept: q\np --a--> q\np --b--> q",
            Completion::Partial,
        )
        .unwrap();
        let report = AnalysisReport::analyze(&Automaton::from(dfa));
        assert!(report.finite);
        assert_eq!(report.cardinality, Some(2));
        assert_eq!(report.regex.as_deref(), Some("a|b"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "DFA");
        assert_eq!(json["finite"], true);
    }
}
