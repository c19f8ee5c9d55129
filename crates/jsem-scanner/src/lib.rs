//! JavaScript scanner for the jsem analyzer.
//!
//! `SyntaxKind` covers both token kinds and syntax-tree node kinds, so the
//! parser and every semantic pass share one tag type.

pub mod syntax_kind;
pub use syntax_kind::*;

pub mod scanner;
pub use scanner::{Scanner, ScannerSnapshot, TokenFlags};
