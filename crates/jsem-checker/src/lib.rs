//! Heuristic type inference and the symbol model for the jsem analyzer.
//!
//! [`SymbolModel::build`] runs the scope builder and binder from
//! `jsem-binder`, then a single flow-insensitive inference pass that types
//! literals and expressions and propagates types to symbols through
//! assignments, initializers and call arguments. A few library shapes
//! (selector libraries, model libraries, browser globals) are recognized by
//! the matchers in [`heuristics`].
//!
//! The resulting [`SymbolModel`] is read-only and refers to syntax nodes by
//! `NodeIndex`; it does not borrow the tree.

pub mod error;
pub mod heuristics;
pub mod inference;
pub mod model;
pub mod options;

pub use error::AnalysisError;
pub use inference::TypeInference;
pub use model::SymbolModel;
pub use options::AnalyzerOptions;
