//! Reference resolution and usage classification.

use crate::scopes::ScopeId;
use crate::state::BinderState;
use crate::state_declarations::THIS;
use crate::symbols::{SymbolId, SymbolKind, UsageKind};
use jsem_parser::{NodeArena, NodeIndex};
use jsem_scanner::{SyntaxKind, token_is_compound_assignment};
use tracing::debug;

impl BinderState {
    /// Bind an `Identifier` reference to the symbol it resolves to, or to the
    /// external symbol of that name.
    pub(crate) fn bind_reference(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let Some(name) = arena.identifier_text(idx) else {
            return;
        };
        let usage = classify_reference(arena, idx);
        let resolved = self
            .scopes
            .scope_for(idx)
            .and_then(|scope| self.resolve_name(name, scope));
        let sym_id = match resolved {
            Some(sym_id) => sym_id,
            None => match self.external_symbol(name) {
                Some(sym_id) => sym_id,
                None => return,
            },
        };
        self.add_usage(sym_id, idx, usage);
    }

    /// Bind a `this` keyword to the nearest `this` pseudo-symbol. The module
    /// scope always declares one.
    pub(crate) fn bind_this(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let resolved = self.scopes.scope_for(idx).and_then(|scope| {
            self.scopes.ancestors(scope).find_map(|candidate| {
                let sym_id = candidate.lookup(THIS)?;
                (self.symbols.get(sym_id)?.kind == SymbolKind::This).then_some(sym_id)
            })
        });
        match resolved {
            Some(sym_id) => self.add_usage(sym_id, idx, classify_reference(arena, idx)),
            None => debug!(node = idx.0, "`this` outside any scope"),
        }
    }

    /// Walk the scope chain from `scope` looking for `name`. Method symbols
    /// are members, not bindings, and are skipped, as is the `this`
    /// pseudo-symbol.
    pub fn resolve_name(&self, name: &str, scope: ScopeId) -> Option<SymbolId> {
        self.scopes.ancestors(scope).find_map(|candidate| {
            let sym_id = candidate.lookup(name)?;
            let symbol = self.symbols.get(sym_id)?;
            (!matches!(symbol.kind, SymbolKind::Method | SymbolKind::This)).then_some(sym_id)
        })
    }

    /// The external symbol for `name`, created in the root scope on first
    /// use.
    fn external_symbol(&mut self, name: &str) -> Option<SymbolId> {
        debug!(name, "reference resolved to nothing, binding to external symbol");
        let root = self.scopes.root();
        self.declare_builtin(name, SymbolKind::Variable, root)
    }
}

/// Usage kind of an identifier reference, from its syntactic position.
///
/// Destructuring assignment targets are found by climbing out of array and
/// object literals; only a direct target of a compound assignment or an
/// update expression is a read-write.
pub(crate) fn classify_reference(arena: &NodeArena, idx: NodeIndex) -> UsageKind {
    let mut current = idx;
    let mut in_pattern = false;

    loop {
        let parent = arena.parent(current);
        let Some(parent_node) = arena.get(parent) else {
            return UsageKind::Read;
        };

        match parent_node.kind {
            SyntaxKind::ParenthesizedExpression => {}
            SyntaxKind::ArrayLiteralExpression
            | SyntaxKind::ObjectLiteralExpression
            | SyntaxKind::SpreadElement
            | SyntaxKind::SpreadAssignment => in_pattern = true,
            SyntaxKind::ShorthandPropertyAssignment => {
                let is_name = arena
                    .get_shorthand_property(parent_node)
                    .is_some_and(|data| data.name == current);
                if !is_name {
                    return UsageKind::Read;
                }
                in_pattern = true;
            }
            SyntaxKind::PropertyAssignment => {
                let is_value = arena
                    .get_property_assignment(parent_node)
                    .is_some_and(|data| data.initializer == current);
                if !is_value {
                    return UsageKind::Read;
                }
                in_pattern = true;
            }
            SyntaxKind::BinaryExpression => {
                let Some(binary) = arena.get_binary_expr(parent_node) else {
                    return UsageKind::Read;
                };
                if binary.left != current {
                    return UsageKind::Read;
                }
                return match binary.operator_token {
                    SyntaxKind::EqualsToken => UsageKind::Write,
                    op if token_is_compound_assignment(op) && !in_pattern => UsageKind::ReadWrite,
                    _ => UsageKind::Read,
                };
            }
            SyntaxKind::PrefixUnaryExpression | SyntaxKind::PostfixUnaryExpression => {
                let is_update = arena.get_unary_expr(parent_node).is_some_and(|data| {
                    matches!(data.operator, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
                });
                return if is_update && !in_pattern {
                    UsageKind::ReadWrite
                } else {
                    UsageKind::Read
                };
            }
            SyntaxKind::ForInStatement | SyntaxKind::ForOfStatement => {
                let is_target = arena
                    .get_for_in_of(parent_node)
                    .is_some_and(|data| data.initializer == current);
                return if is_target {
                    UsageKind::Write
                } else {
                    UsageKind::Read
                };
            }
            _ => return UsageKind::Read,
        }

        current = parent;
    }
}
