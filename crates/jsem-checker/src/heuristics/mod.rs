//! Library and framework shape matchers.
//!
//! Each matcher looks at one expression and the types already inferred for
//! its sub-expressions, and either recognizes a known shape or contributes
//! nothing. Matchers never fail.
//!
//! - [`selector_library`]: `$("sel")`, `$(el).find("x")`
//! - [`model_library`]: `Backbone.Model.extend({...})`, `new Model()`
//! - [`web_api`]: `window`, `document`, element lookups

pub mod model_library;
pub mod selector_library;
pub mod web_api;

use crate::options::AnalyzerOptions;
use jsem_parser::{NodeArena, NodeIndex};
use jsem_scanner::SyntaxKind;
use jsem_solver::{Type, TypeKind};
use smallvec::SmallVec;

/// Types contributed by the matchers for one node.
pub type HeuristicTypes = SmallVec<[Type; 2]>;

/// Read access to the types inferred so far.
pub trait TypeQuery {
    /// True when the expression at `node` has a type of `kind`.
    fn has_kind(&self, node: NodeIndex, kind: TypeKind) -> bool;
}

/// Callee of a call or `new` expression, without parentheses.
pub fn callee(arena: &NodeArena, call: NodeIndex) -> Option<NodeIndex> {
    let data = arena.get_call_expr_at(call)?;
    Some(arena.skip_parentheses(data.expression))
}

/// Receiver and member name of a dotted property access `receiver.name`.
pub fn member_access(arena: &NodeArena, access: NodeIndex) -> Option<(NodeIndex, &str)> {
    if arena.kind(access)? != SyntaxKind::PropertyAccessExpression {
        return None;
    }
    let data = arena.get_access_expr_at(access)?;
    let name = arena.identifier_text(data.name_or_argument)?;
    Some((arena.skip_parentheses(data.expression), name))
}

/// Receiver and method name of a method call `receiver.name(...)`.
pub fn method_call(arena: &NodeArena, call: NodeIndex) -> Option<(NodeIndex, &str)> {
    if arena.kind(call)? != SyntaxKind::CallExpression {
        return None;
    }
    member_access(arena, callee(arena, call)?)
}

/// Argument nodes of a call; empty for `new C` without parentheses.
pub fn arguments(arena: &NodeArena, call: NodeIndex) -> Vec<NodeIndex> {
    arena
        .get_call_expr_at(call)
        .and_then(|data| data.arguments.as_ref())
        .map(|args| args.iter().collect())
        .unwrap_or_default()
}

/// Types for an identifier reference.
pub fn classify_identifier(arena: &NodeArena, ident: NodeIndex, options: &AnalyzerOptions) -> HeuristicTypes {
    let mut types = HeuristicTypes::new();
    types.extend(selector_library::identifier_type(arena, ident, options));
    types.extend(web_api::identifier_type(arena, ident));
    types
}

/// Types for a call expression.
pub fn classify_call(
    arena: &NodeArena,
    call: NodeIndex,
    options: &AnalyzerOptions,
    query: &dyn TypeQuery,
) -> HeuristicTypes {
    let mut types = HeuristicTypes::new();
    types.extend(selector_library::call_type(arena, call, options, query));
    types.extend(model_library::call_type(arena, call, query));
    types.extend(web_api::call_type(arena, call, query));
    types
}

/// Types for a dotted property access.
pub fn classify_property_access(arena: &NodeArena, access: NodeIndex, query: &dyn TypeQuery) -> HeuristicTypes {
    let mut types = HeuristicTypes::new();
    types.extend(web_api::property_type(arena, access, query));
    types
}
