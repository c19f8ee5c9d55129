//! Scope builder and symbol binder for the jsem analyzer.
//!
//! Binding runs in two steps over an immutable [`NodeArena`]:
//!
//! 1. [`build_scopes`] walks the tree once and creates a [`Scope`] for every
//!    scope-introducing node, recording the enclosing scope of each node.
//! 2. [`BinderState`] walks the tree again. On entering a scope it declares
//!    every binding site that targets that scope (hoisting), then it resolves
//!    each identifier reference against the scope chain and records a
//!    classified [`Usage`] on the resolved [`Symbol`].
//!
//! References that resolve to nothing bind to an external symbol created
//! lazily in the root scope, so binding never fails.
//!
//! [`NodeArena`]: jsem_parser::NodeArena

pub mod scopes;
pub mod symbols;

mod state;
mod state_declarations;
mod state_references;

pub use scopes::{Scope, ScopeId, ScopeKind, ScopeTree, build_scopes};
pub use state::{BindResult, BinderState, ValidationError, bind};
pub use symbols::{Symbol, SymbolArena, SymbolId, SymbolKind, Usage, UsageKind};
