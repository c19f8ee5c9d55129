//! Binder state: the symbol table under construction and the binding walk.

use crate::scopes::{ScopeId, ScopeTree, build_scopes};
use crate::symbols::{SymbolArena, SymbolId, SymbolKind, Usage, UsageKind};
use jsem_parser::{NodeArena, NodeIndex};
use jsem_scanner::SyntaxKind;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Output of binding: the scope tree with its symbol tables, the symbols and
/// the identifier node -> symbol table.
#[derive(Clone, Debug, Default)]
pub struct BindResult {
    pub scopes: ScopeTree,
    pub symbols: SymbolArena,
    pub node_symbols: FxHashMap<NodeIndex, SymbolId>,
}

/// Consistency problems found by [`BinderState::validate_symbol_table`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A node->symbol mapping points to a non-existent symbol
    BrokenSymbolLink { node_index: u32, symbol_id: u32 },
    /// A usage recorded on one symbol names another symbol as its owner
    ForeignUsage { symbol_id: u32, owner_id: u32 },
    /// A symbol is missing from its scope's table, or the scope is missing
    SymbolOutsideScope { symbol_id: u32, name: String },
    /// A scope table entry points to a non-existent symbol
    DanglingScopeEntry { scope_id: u32, name: String },
}

pub struct BinderState {
    pub scopes: ScopeTree,
    pub symbols: SymbolArena,
    /// Identifier node -> symbol, for every bound identifier
    pub node_symbols: FxHashMap<NodeIndex, SymbolId>,
    /// Binding identifiers seen by the walk, checked once it ends
    pub(crate) unbound_declarations: Vec<NodeIndex>,
}

/// Build scopes and bind the file rooted at `root`.
pub fn bind(arena: &NodeArena, root: NodeIndex) -> BindResult {
    let scopes = build_scopes(arena, root);
    let mut binder = BinderState::new(scopes);
    binder.bind_source_file(arena, root);
    binder.finish()
}

impl BinderState {
    pub fn new(scopes: ScopeTree) -> Self {
        BinderState {
            scopes,
            symbols: SymbolArena::new(),
            node_symbols: FxHashMap::default(),
            unbound_declarations: Vec::new(),
        }
    }

    /// Bind every identifier of the file. Declarations targeting a scope
    /// are processed when the walk enters the scope, before any reference
    /// inside it.
    #[tracing::instrument(level = "debug", skip(self, arena), fields(root = root.0))]
    pub fn bind_source_file(&mut self, arena: &NodeArena, root: NodeIndex) {
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let Some(node) = arena.get(idx) else {
                continue;
            };
            if let Some(scope) = self.scopes.scope_introduced_by(idx) {
                self.declare_scope_bindings(arena, scope);
            }
            match node.kind {
                SyntaxKind::Identifier => self.bind_reference(arena, idx),
                SyntaxKind::ThisKeyword => self.bind_this(arena, idx),
                SyntaxKind::BindingIdentifier => self.unbound_declarations.push(idx),
                _ => {}
            }
            for child in arena.get_children(idx).into_iter().rev() {
                stack.push(child);
            }
        }
        self.bind_leftover_declarations(arena);
        debug!(
            symbols = self.symbols.len(),
            bound_nodes = self.node_symbols.len(),
            "binding finished"
        );
    }

    pub fn finish(self) -> BindResult {
        BindResult {
            scopes: self.scopes,
            symbols: self.symbols,
            node_symbols: self.node_symbols,
        }
    }

    /// Declare `name` in `scope` and record a usage for `node`.
    ///
    /// A name already present in the scope reuses its symbol. A plain
    /// `Variable` or an external symbol may be promoted to the declared kind
    /// once; later conflicting declarations only add usages.
    pub(crate) fn declare_symbol(
        &mut self,
        name: &str,
        kind: SymbolKind,
        scope: ScopeId,
        node: NodeIndex,
        usage: UsageKind,
    ) -> Option<SymbolId> {
        let existing = self.scopes.get(scope)?.lookup(name);
        let sym_id = match existing {
            Some(sym_id) => {
                let symbol = self.symbols.get_mut(sym_id)?;
                let promotable = symbol.kind == SymbolKind::Variable || symbol.is_external;
                if !symbol.promoted && promotable && (symbol.kind != kind || symbol.is_external) {
                    debug!(
                        name,
                        from = ?symbol.kind,
                        to = ?kind,
                        "promoting symbol"
                    );
                    symbol.kind = kind;
                    symbol.is_external = false;
                    symbol.promoted = true;
                }
                sym_id
            }
            None => self.create_symbol(name, kind, scope, false)?,
        };
        self.add_usage(sym_id, node, usage);
        Some(sym_id)
    }

    /// Declare a built-in symbol with no usages. Existing declarations win.
    pub(crate) fn declare_builtin(&mut self, name: &str, kind: SymbolKind, scope: ScopeId) -> Option<SymbolId> {
        match self.scopes.get(scope)?.lookup(name) {
            Some(sym_id) => Some(sym_id),
            None => self.create_symbol(name, kind, scope, true),
        }
    }

    fn create_symbol(&mut self, name: &str, kind: SymbolKind, scope: ScopeId, is_external: bool) -> Option<SymbolId> {
        let scope_data = self.scopes.get_mut(scope)?;
        let sym_id = self.symbols.alloc(name.to_string(), kind, scope, is_external);
        scope_data.symbols.insert(name.to_string(), sym_id);
        debug!(name, ?kind, scope = scope.0, sym_id = sym_id.0, is_external, "created symbol");
        Some(sym_id)
    }

    pub(crate) fn add_usage(&mut self, sym_id: SymbolId, node: NodeIndex, kind: UsageKind) {
        let Some(symbol) = self.symbols.get_mut(sym_id) else {
            return;
        };
        symbol.usages.push(Usage {
            node,
            kind,
            symbol: sym_id,
        });
        if node.is_some() {
            self.node_symbols.insert(node, sym_id);
        }
        trace!(name = %symbol.name, ?kind, node = node.0, "added usage");
    }

    /// Binding identifiers in positions the scope pre-declaration does not
    /// cover (malformed input) still get a symbol in their enclosing scope.
    fn bind_leftover_declarations(&mut self, arena: &NodeArena) {
        let pending = std::mem::take(&mut self.unbound_declarations);
        for idx in pending {
            if self.node_symbols.contains_key(&idx) {
                continue;
            }
            let (Some(name), Some(scope)) = (arena.identifier_text(idx), self.scopes.scope_for(idx)) else {
                continue;
            };
            debug!(name, node = idx.0, "binding identifier outside a known declaration site");
            self.declare_symbol(name, SymbolKind::Variable, scope, idx, UsageKind::Declaration);
        }
    }

    /// Check that usages, symbols and scope tables agree with each other.
    pub fn validate_symbol_table(&self) -> Vec<ValidationError> {
        validate_tables(&self.scopes, &self.symbols, &self.node_symbols)
    }
}

impl BindResult {
    /// Validate a finished binding. See [`BinderState::validate_symbol_table`].
    pub fn validate(&self) -> Vec<ValidationError> {
        validate_tables(&self.scopes, &self.symbols, &self.node_symbols)
    }
}

fn validate_tables(
    scopes: &ScopeTree,
    symbols: &SymbolArena,
    node_symbols: &FxHashMap<NodeIndex, SymbolId>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (&node_idx, &sym_id) in node_symbols {
        if symbols.get(sym_id).is_none() {
            errors.push(ValidationError::BrokenSymbolLink {
                node_index: node_idx.0,
                symbol_id: sym_id.0,
            });
        }
    }

    for symbol in symbols.iter() {
        for usage in &symbol.usages {
            if usage.symbol != symbol.id {
                errors.push(ValidationError::ForeignUsage {
                    symbol_id: symbol.id.0,
                    owner_id: usage.symbol.0,
                });
            }
        }
        let listed = scopes
            .get(symbol.scope)
            .and_then(|scope| scope.lookup(&symbol.name));
        if listed != Some(symbol.id) {
            errors.push(ValidationError::SymbolOutsideScope {
                symbol_id: symbol.id.0,
                name: symbol.name.clone(),
            });
        }
    }

    for scope in scopes.iter() {
        for (name, &sym_id) in &scope.symbols {
            if symbols.get(sym_id).is_none() {
                errors.push(ValidationError::DanglingScopeEntry {
                    scope_id: scope.id.0,
                    name: name.clone(),
                });
            }
        }
    }

    errors
}
