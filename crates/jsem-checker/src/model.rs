//! The read-only symbol model of one analyzed file.

use crate::error::AnalysisError;
use crate::heuristics::model_library;
use crate::inference::{self, NodeTypes, TypeInference};
use crate::options::AnalyzerOptions;
use jsem_binder::{BindResult, Scope, ScopeId, ScopeTree, Symbol, SymbolArena, SymbolId, SymbolKind, bind};
use jsem_common::TokenLocation;
use jsem_parser::{NodeArena, NodeIndex};
use jsem_solver::TypeSet;
use tracing::{debug, error};

/// Scopes, symbols, usages and inferred types of one file.
///
/// The model refers to syntax nodes by [`NodeIndex`] and does not borrow the
/// tree; queries that need node text or positions take the arena the model
/// was built from.
#[derive(Debug)]
pub struct SymbolModel {
    bound: BindResult,
    node_types: NodeTypes,
    options: AnalyzerOptions,
}

impl SymbolModel {
    /// Build scopes, bind identifiers and infer types for the tree at `root`.
    #[tracing::instrument(level = "debug", skip_all, fields(root = root.0))]
    pub fn build(arena: &NodeArena, root: NodeIndex, options: &AnalyzerOptions) -> Result<Self, AnalysisError> {
        if arena.get(root).is_none() {
            return Err(AnalysisError::MissingRoot { node: root.0 });
        }

        let mut bound = bind(arena, root);
        let problems = bound.validate();
        if !problems.is_empty() {
            error!(count = problems.len(), "symbol table validation failed");
            return Err(AnalysisError::InconsistentSymbolTable { problems });
        }

        let node_types = TypeInference::new(arena, &mut bound, options).infer(root);
        debug!(
            scopes = bound.scopes.len(),
            symbols = bound.symbols.len(),
            "symbol model built"
        );

        Ok(SymbolModel {
            bound,
            node_types,
            options: options.clone(),
        })
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.bound.symbols.iter()
    }

    pub fn symbols_of_kind(&self, kind: SymbolKind) -> impl Iterator<Item = &Symbol> {
        self.all_symbols().filter(move |symbol| symbol.kind == kind)
    }

    /// Symbols named `name`, in creation order. Names repeat across scopes.
    pub fn symbols_named<'m>(&'m self, name: &'m str) -> impl Iterator<Item = &'m Symbol> {
        self.all_symbols().filter(move |symbol| symbol.name == name)
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.bound.symbols.get(id)
    }

    pub fn symbols(&self) -> &SymbolArena {
        &self.bound.symbols
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.bound.scopes.get(id)
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.bound.scopes
    }

    pub fn root_scope(&self) -> Option<&Scope> {
        self.bound.scopes.get(self.bound.scopes.root())
    }

    /// Innermost scope enclosing `node`; `None` for nodes outside the
    /// analyzed tree.
    pub fn scope_for(&self, node: NodeIndex) -> Option<&Scope> {
        self.bound
            .scopes
            .scope_for(node)
            .and_then(|id| self.bound.scopes.get(id))
    }

    /// Symbol an identifier node is bound to.
    pub fn symbol_for(&self, node: NodeIndex) -> Option<&Symbol> {
        self.bound
            .node_symbols
            .get(&node)
            .and_then(|&id| self.bound.symbols.get(id))
    }

    /// Types of an expression. Identifiers report the final types of their
    /// symbol together with anything recognized at the node itself.
    pub fn expression_types(&self, node: NodeIndex) -> TypeSet {
        inference::expression_types(&self.bound, &self.node_types, node)
    }

    /// Value node of the property `name` in the object literal passed to a
    /// model library `extend` call.
    pub fn model_property(&self, arena: &NodeArena, call: NodeIndex, name: &str) -> Option<NodeIndex> {
        model_library::extend_property(arena, call, name)
    }

    /// Position of a symbol's first usage, the anchor navigation tools use as
    /// its declaration.
    pub fn declaration_location(&self, arena: &NodeArena, id: SymbolId) -> Option<TokenLocation> {
        let usage = self.symbol(id)?.first_usage()?;
        arena.token_at(usage.node)
    }

    /// Positions of every usage after the first.
    pub fn reference_locations(&self, arena: &NodeArena, id: SymbolId) -> Vec<TokenLocation> {
        self.symbol(id)
            .map(|symbol| {
                symbol
                    .usages
                    .iter()
                    .skip(1)
                    .filter_map(|usage| arena.token_at(usage.node))
                    .collect()
            })
            .unwrap_or_default()
    }
}
