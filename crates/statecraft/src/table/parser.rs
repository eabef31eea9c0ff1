//! Transition table parser using chumsky
//!
//! Parses the line-oriented table format into a [`TransitionTable`].
//! Each non-blank, non-comment line is one statement.

use super::{TransitionRow, TransitionTable};
use crate::core::{AutomatonError, Input, Parser as CoreParser, Result};
use chumsky::prelude::*;
use tracing::{debug, span, trace, Level};

/// Parsed table statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `alphabet: a, b`
    Alphabet(Vec<String>),
    /// `states: q0, q1`
    States(Vec<String>),
    /// `start: q0`
    Start(Vec<String>),
    /// `accept: q1, q2` (also `accepting:` and `final:`)
    Accept(Vec<String>),
    /// `q0 --a,b--> q1`
    Transition {
        from: String,
        symbols: Vec<String>,
        to: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Directive {
    Alphabet,
    States,
    Start,
    Accept,
}

/// Transition table parser
pub struct TableParser;

impl TableParser {
    pub fn new() -> Self {
        Self
    }

    fn whitespace<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
        any()
            .filter(|c: &char| c.is_whitespace())
            .repeated()
            .collect::<String>()
    }

    /// Parse a quoted token: `"{q0,q1}"`, with `\"` and `\\` escapes
    fn quoted_string<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
        let escaped = just('\\').ignore_then(any());
        let plain = any().filter(|c: &char| *c != '"' && *c != '\\');
        just('"')
            .ignore_then(plain.or(escaped).repeated().collect::<String>())
            .then_ignore(just('"'))
    }

    /// Parse a state name (bare identifier or quoted)
    fn identifier<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
        let bare = any()
            .filter(|c: &char| c.is_alphanumeric() || matches!(c, '_' | '\'' | '.'))
            .repeated()
            .at_least(1)
            .collect::<String>();
        Self::quoted_string().or(bare)
    }

    /// Parse a symbol (anything up to a separator, or quoted)
    fn symbol<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, String, extra::Err<Rich<'src, char>>> + Clone {
        let bare = any()
            .filter(|c: &char| !c.is_whitespace() && !matches!(c, ',' | '-' | ':' | '>' | '"'))
            .repeated()
            .at_least(1)
            .collect::<String>();
        Self::quoted_string().or(bare)
    }

    /// Parse a directive line: `keyword: item, item`
    fn directive_parser<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, Statement, extra::Err<Rich<'src, char>>> + Clone
    {
        let ws = Self::whitespace();

        let keyword = choice((
            just("alphabet").to(Directive::Alphabet),
            just("states").to(Directive::States),
            just("start").to(Directive::Start),
            just("accepting").to(Directive::Accept),
            just("accept").to(Directive::Accept),
            just("final").to(Directive::Accept),
        ));

        let items = Self::symbol()
            .padded_by(ws.clone())
            .separated_by(just(','))
            .allow_trailing()
            .collect::<Vec<String>>();

        keyword
            .then_ignore(ws.clone())
            .then_ignore(just(':'))
            .then_ignore(ws)
            .then(items)
            .map(|(directive, items)| match directive {
                Directive::Alphabet => Statement::Alphabet(items),
                Directive::States => Statement::States(items),
                Directive::Start => Statement::Start(items),
                Directive::Accept => Statement::Accept(items),
            })
    }

    /// Parse a transition: `from --a--> to` or `from --a, b--> to`
    fn transition_parser<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, Statement, extra::Err<Rich<'src, char>>> + Clone
    {
        let ws = Self::whitespace();

        let symbols = Self::symbol()
            .padded_by(ws.clone())
            .separated_by(just(','))
            .at_least(1)
            .collect::<Vec<String>>();

        Self::identifier()
            .padded_by(ws.clone())
            .then_ignore(just("--"))
            .then(symbols)
            .then_ignore(just("-->"))
            .then(Self::identifier().padded_by(ws))
            .map(|((from, symbols), to)| Statement::Transition { from, symbols, to })
    }

    /// Parse a single statement
    fn statement_parser<'src>(
    ) -> impl chumsky::Parser<'src, &'src str, Statement, extra::Err<Rich<'src, char>>> + Clone
    {
        Self::directive_parser().or(Self::transition_parser())
    }

    /// Parse one statement; errors carry line 1 and the 1-based column
    pub fn parse_statement(&self, input: &str) -> Result<Statement> {
        let parser = Self::whitespace()
            .ignore_then(Self::statement_parser())
            .then_ignore(end());

        parser.parse(input).into_result().map_err(|errors| {
            let (message, column) = errors
                .first()
                .map(|e| (e.to_string(), e.span().start + 1))
                .unwrap_or_else(|| ("invalid statement".to_string(), 1));
            AutomatonError::parse_error(message, 1, column)
        })
    }

    /// Check if a line is a comment
    fn is_comment(&self, line: &str) -> bool {
        let trimmed = line.trim_start();
        trimmed.starts_with("%%") || trimmed.starts_with('#')
    }

    fn apply(
        &self,
        statement: Statement,
        table: &mut TransitionTable,
        line_no: usize,
    ) -> Result<()> {
        match statement {
            Statement::Alphabet(symbols) => {
                for symbol in symbols {
                    table.add_symbol(symbol.as_str());
                }
            }
            Statement::States(states) => {
                for state in states {
                    table.declare_state(state);
                }
            }
            Statement::Start(states) => {
                if states.len() != 1 {
                    return Err(AutomatonError::parse_error(
                        format!("start expects exactly one state, got {}", states.len()),
                        line_no,
                        1,
                    ));
                }
                if let Some(existing) = table.start() {
                    return Err(AutomatonError::parse_error(
                        format!("start state already set to '{}'", existing),
                        line_no,
                        1,
                    ));
                }
                table.set_start(states[0].as_str());
            }
            Statement::Accept(states) => {
                for state in states {
                    table.add_accepting(state);
                }
            }
            Statement::Transition { from, symbols, to } => {
                for symbol in symbols {
                    table.add_row(TransitionRow::new(
                        from.as_str(),
                        Input::parse(&symbol),
                        to.as_str(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for TableParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreParser<TransitionTable> for TableParser {
    fn parse(&self, input: &str, table: &mut TransitionTable) -> Result<()> {
        let parse_span = span!(Level::INFO, "parse_table", input_len = input.len());
        let _enter = parse_span.enter();

        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            if line.trim().is_empty() || self.is_comment(line) {
                continue;
            }

            let statement = self.parse_statement(line).map_err(|err| match err {
                AutomatonError::Parse {
                    message, column, ..
                } => AutomatonError::parse_error(message, line_no, column),
                other => other,
            })?;
            trace!(line = line_no, ?statement, "Parsed statement");
            self.apply(statement, table, line_no)?;
        }

        debug!(
            symbols = table.alphabet().len(),
            rows = table.rows().len(),
            "Parsed transition table"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "table"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        input.contains("-->") || input.lines().any(|l| l.trim_start().starts_with("start"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{State, Symbol};

    #[test]
    fn test_parse_transition() {
        let parser = TableParser::new();
        let result = parser.parse_statement("q0 --0--> q1").unwrap();
        assert_eq!(
            result,
            Statement::Transition {
                from: "q0".to_string(),
                symbols: vec!["0".to_string()],
                to: "q1".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_transition_symbol_list() {
        let parser = TableParser::new();
        let result = parser.parse_statement("  q1 -- a, b --> q1").unwrap();
        assert_eq!(
            result,
            Statement::Transition {
                from: "q1".to_string(),
                symbols: vec!["a".to_string(), "b".to_string()],
                to: "q1".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_quoted_states() {
        let parser = TableParser::new();
        let result = parser.parse_statement("\"{q0,q1}\" --0--> \"{q2}\"").unwrap();
        assert_eq!(
            result,
            Statement::Transition {
                from: "{q0,q1}".to_string(),
                symbols: vec!["0".to_string()],
                to: "{q2}".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_escaped_quotes() {
        let parser = TableParser::new();
        let result = parser
            .parse_statement(r#""{\"a,b\",b}" --x--> "back\\slash""#)
            .unwrap();
        assert_eq!(
            result,
            Statement::Transition {
                from: "{\"a,b\",b}".to_string(),
                symbols: vec!["x".to_string()],
                to: "back\\slash".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_directives() {
        let parser = TableParser::new();
        assert_eq!(
            parser.parse_statement("alphabet: 0, 1").unwrap(),
            Statement::Alphabet(vec!["0".to_string(), "1".to_string()])
        );
        assert_eq!(
            parser.parse_statement("start : q0").unwrap(),
            Statement::Start(vec!["q0".to_string()])
        );
        assert_eq!(
            parser.parse_statement("accepting: q1,q2").unwrap(),
            Statement::Accept(vec!["q1".to_string(), "q2".to_string()])
        );
        assert_eq!(
            parser.parse_statement("accept:").unwrap(),
            Statement::Accept(vec![])
        );
    }

    #[test]
    fn test_keyword_as_state_name() {
        let parser = TableParser::new();
        let result = parser.parse_statement("start --a--> final").unwrap();
        assert!(matches!(result, Statement::Transition { .. }));
    }

    #[test]
    fn test_parse_full_table() {
        let parser = TableParser::new();
        let mut table = TransitionTable::new();
        let input = r#"
%% epsilon NFA
alphabet: 0, 1
start: q0
accept: q2
q0 --ε--> q1
q1 --0--> q2
"#;
        parser.parse(input, &mut table).unwrap();

        assert_eq!(table.alphabet().len(), 2);
        assert!(table.alphabet().contains(&Symbol::from("1")));
        assert_eq!(table.start(), Some(&State::atomic("q0")));
        assert_eq!(table.rows().len(), 2);
        assert!(table.rows()[0].input.is_epsilon());
    }

    #[test]
    fn test_error_reports_line() {
        let parser = TableParser::new();
        let mut table = TransitionTable::new();
        let err = parser
            .parse("alphabet: a\nstart: p\np ==a==> p", &mut table)
            .unwrap_err();
        match err {
            AutomatonError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_start_rejected() {
        let parser = TableParser::new();
        let mut table = TransitionTable::new();
        let err = parser.parse("start: p\nstart: q", &mut table).unwrap_err();
        assert!(err.to_string().contains("already set"));
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let parser = TableParser::new();
        let mut table = TransitionTable::new();
        parser
            .parse("\n# note\n%% other\n\nalphabet: a\n", &mut table)
            .unwrap();
        assert_eq!(table.alphabet().len(), 1);
        assert!(table.rows().is_empty());
    }

    #[test]
    fn test_can_parse() {
        let parser = TableParser::new();
        assert!(parser.can_parse("p --a--> q"));
        assert!(parser.can_parse("start: p"));
        assert!(!parser.can_parse("graph TD"));
    }
}
