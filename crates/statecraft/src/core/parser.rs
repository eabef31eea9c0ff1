//! Core parser trait for automaton markup
//!
//! This trait defines the interface for parsing a textual automaton
//! description into a structure the engine can build automata from.

use super::Result;

/// Core trait for automaton parsers
///
/// # Example
/// ```
/// use statecraft::core::Parser;
/// use statecraft::table::{TableParser, TransitionTable};
///
/// let parser = TableParser::new();
/// let mut table = TransitionTable::new();
/// parser.parse("alphabet: a\nstart: p\np --a--> p", &mut table).unwrap();
/// assert_eq!(table.rows().len(), 1);
/// ```
pub trait Parser<T>: Send + Sync {
    /// Parse markup into the provided target
    fn parse(&self, input: &str, target: &mut T) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check if the input looks like something this parser understands
    fn can_parse(&self, input: &str) -> bool;
}
