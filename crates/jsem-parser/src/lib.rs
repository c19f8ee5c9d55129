//! JavaScript parser and syntax tree for the jsem analyzer.
//!
//! The tree is stored in a [`NodeArena`]; nodes refer to each other by
//! [`NodeIndex`]. Once [`ParserState::parse_source_file`] returns, the arena
//! is never mutated again, so every semantic pass borrows it immutably.

pub mod parser;

pub use parser::base::{NodeIndex, NodeList};
pub use parser::node::{Node, NodeArena, NodeData};
pub use parser::node_flags::NodeFlags;
pub use parser::{ParseDiagnostic, ParserState};
