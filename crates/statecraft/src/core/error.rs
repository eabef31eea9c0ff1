//! Core error types for automaton processing
//!
//! Every failure the engine can report is raised either while an automaton
//! is being constructed or before minimization starts, so a caller never
//! sees a partially built automaton or partition.

use thiserror::Error;

/// Core error type for automaton construction and transformation
#[derive(Error, Debug)]
pub enum AutomatonError {
    /// Declared states/alphabet disagree with the table or the start/accept designations
    #[error("Malformed automaton: {message}")]
    MalformedAutomaton { message: String },

    /// A deterministic table was required but a (state, symbol) pair is ambiguous or missing
    #[error("Non-deterministic table at ({state}, {symbol}): {message}")]
    NonDeterministicTable {
        state: String,
        symbol: String,
        message: String,
    },

    /// Minimization was asked for on an automaton that is not deterministic
    #[error("Automaton is not deterministic: {message}")]
    NotDeterministic { message: String },

    #[error("Parse error: {message} at line {line}, column {column}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AutomatonError {
    /// Create a new malformed automaton error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedAutomaton {
            message: message.into(),
        }
    }

    /// Create a new non-deterministic table error for a (state, symbol) pair
    pub fn non_deterministic_table(
        state: impl Into<String>,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::NonDeterministicTable {
            state: state.into(),
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    /// Create a new not-deterministic error
    pub fn not_deterministic(message: impl Into<String>) -> Self {
        Self::NotDeterministic {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Result alias used throughout the engine
pub type Result<T, E = AutomatonError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_error() {
        let error = AutomatonError::malformed("start state 'q9' is not declared");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Malformed automaton"));
        assert!(error_msg.contains("q9"));
    }

    #[test]
    fn test_non_deterministic_table_error() {
        let error = AutomatonError::non_deterministic_table("q0", "1", "2 destinations");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Non-deterministic table"));
        assert!(error_msg.contains("(q0, 1)"));
        assert!(error_msg.contains("2 destinations"));
    }

    #[test]
    fn test_not_deterministic_error() {
        let error = AutomatonError::not_deterministic("epsilon transition from q0");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("not deterministic"));
        assert!(error_msg.contains("epsilon"));
    }

    #[test]
    fn test_parse_error() {
        let error = AutomatonError::parse_error("expected '-->'", 5, 10);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Parse error"));
        assert!(error_msg.contains("line 5"));
        assert!(error_msg.contains("column 10"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: AutomatonError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
