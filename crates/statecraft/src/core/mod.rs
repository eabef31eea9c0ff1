//! Core abstractions for automaton processing
//!
//! Shared value types, the error type, logging setup, and the parser and
//! renderer traits every front end and output format implements.

mod error;
pub mod logging;
mod parser;
mod renderer;
mod types;

pub use error::*;
pub use logging::*;
pub use parser::*;
pub use renderer::*;
pub use types::*;
