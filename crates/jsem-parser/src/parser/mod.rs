//! Parser module: node storage and the recursive-descent parser state.

pub mod base;
pub mod node;
pub mod node_flags;

mod state;
mod state_expressions;
mod state_statements;

pub use base::{NodeIndex, NodeList};
pub use node::*;
pub use state::{ParseDiagnostic, ParserState};

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod state_tests;
