//! Scope tree construction.
//!
//! One pre-order walk over the syntax tree creates a scope for every
//! scope-introducing node and records, for every visited node, the innermost
//! scope enclosing it. The introducing node itself maps to the scope it
//! introduces.

use crate::symbols::SymbolId;
use indexmap::IndexMap;
use jsem_common::limits::MAX_SCOPE_WALK_ITERATIONS;
use jsem_parser::{NodeArena, NodeIndex};
use jsem_scanner::SyntaxKind;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, warn};

/// Index of a scope in the [`ScopeTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ScopeKind {
    Module,
    Function,
    /// Function expressions, arrows, methods, accessors and constructors
    FunctionExpression,
    Block,
    Catch,
    ClassBody,
}

impl ScopeKind {
    /// Scopes that receive hoisted `var` and function declarations.
    pub fn is_function_scope(self) -> bool {
        matches!(
            self,
            ScopeKind::Module | ScopeKind::Function | ScopeKind::FunctionExpression
        )
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// Node that introduced this scope
    pub node: NodeIndex,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Symbols declared directly in this scope, in declaration order
    pub symbols: IndexMap<String, SymbolId>,
}

impl Scope {
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    node_scopes: FxHashMap<NodeIndex, ScopeId>,
}

impl ScopeTree {
    /// The module scope. Always present once the tree is built.
    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    #[inline]
    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Innermost scope enclosing `node`, or `None` for nodes the builder
    /// never visited.
    pub fn scope_for(&self, node: NodeIndex) -> Option<ScopeId> {
        self.node_scopes.get(&node).copied()
    }

    /// Scope introduced by `node`, if it is a scope-introducing node.
    pub fn scope_introduced_by(&self, node: NodeIndex) -> Option<ScopeId> {
        let id = self.scope_for(node)?;
        (self.get(id)?.node == node).then_some(id)
    }

    /// `scope` and its ancestors up to the root.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> {
        let mut next = Some(scope);
        let mut steps = 0;
        std::iter::from_fn(move || {
            if steps >= MAX_SCOPE_WALK_ITERATIONS {
                warn!(scope = scope.0, "scope chain exceeded walk limit");
                return None;
            }
            steps += 1;
            let current = self.get(next?)?;
            next = current.parent;
            Some(current)
        })
    }

    /// Nearest scope at or above `scope` that receives hoisted declarations.
    pub fn hoisting_target(&self, scope: ScopeId) -> ScopeId {
        self.ancestors(scope)
            .find(|candidate| candidate.kind.is_function_scope())
            .map_or(self.root(), |candidate| candidate.id)
    }

    fn push_scope(&mut self, kind: ScopeKind, node: NodeIndex, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            id,
            kind,
            node,
            parent,
            children: Vec::new(),
            symbols: IndexMap::new(),
        });
        if let Some(parent) = parent
            && let Some(parent_scope) = self.get_mut(parent)
        {
            parent_scope.children.push(id);
        }
        debug!(scope = id.0, ?kind, node = node.0, "created scope");
        id
    }
}

/// Kind of scope `idx` introduces, if any.
pub fn scope_kind_for(arena: &NodeArena, idx: NodeIndex) -> Option<ScopeKind> {
    let node = arena.get(idx)?;
    let kind = match node.kind {
        SyntaxKind::SourceFile => ScopeKind::Module,
        SyntaxKind::FunctionDeclaration => ScopeKind::Function,
        SyntaxKind::FunctionExpression
        | SyntaxKind::ArrowFunction
        | SyntaxKind::MethodDeclaration
        | SyntaxKind::GetAccessor
        | SyntaxKind::SetAccessor
        | SyntaxKind::Constructor => ScopeKind::FunctionExpression,
        SyntaxKind::CatchClause => ScopeKind::Catch,
        SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression => ScopeKind::ClassBody,
        SyntaxKind::ForStatement
        | SyntaxKind::ForInStatement
        | SyntaxKind::ForOfStatement
        | SyntaxKind::CaseBlock => ScopeKind::Block,
        SyntaxKind::Block if !is_scope_owned_block(arena, idx) => ScopeKind::Block,
        _ => return None,
    };
    Some(kind)
}

/// A block that is the body of a function, catch clause or loop shares the
/// scope of its owner.
fn is_scope_owned_block(arena: &NodeArena, idx: NodeIndex) -> bool {
    let parent = arena.parent(idx);
    let Some(parent_node) = arena.get(parent) else {
        return false;
    };
    if parent_node.kind.is_function_like() {
        return arena.get_function(parent_node).is_some_and(|func| func.body == idx);
    }
    match parent_node.kind {
        SyntaxKind::CatchClause => arena.get_catch_clause(parent_node).is_some_and(|clause| clause.block == idx),
        SyntaxKind::ForStatement => arena.get_loop(parent_node).is_some_and(|data| data.statement == idx),
        SyntaxKind::ForInStatement | SyntaxKind::ForOfStatement => {
            arena.get_for_in_of(parent_node).is_some_and(|data| data.statement == idx)
        }
        _ => false,
    }
}

/// Build the scope tree for the file rooted at `root`.
///
/// The root always gets a `Module` scope, even if it is not a source file.
#[tracing::instrument(level = "debug", skip(arena), fields(root = root.0))]
pub fn build_scopes(arena: &NodeArena, root: NodeIndex) -> ScopeTree {
    let mut tree = ScopeTree::default();
    let module = tree.push_scope(ScopeKind::Module, root, None);
    tree.node_scopes.insert(root, module);

    let mut stack: Vec<(NodeIndex, ScopeId)> = arena
        .get_children(root)
        .into_iter()
        .rev()
        .map(|child| (child, module))
        .collect();

    while let Some((idx, enclosing)) = stack.pop() {
        let scope = match scope_kind_for(arena, idx) {
            Some(kind) => tree.push_scope(kind, idx, Some(enclosing)),
            None => enclosing,
        };
        tree.node_scopes.insert(idx, scope);
        for child in arena.get_children(idx).into_iter().rev() {
            stack.push((child, scope));
        }
    }

    debug!(scopes = tree.len(), nodes = tree.node_scopes.len(), "scope tree built");
    tree
}
