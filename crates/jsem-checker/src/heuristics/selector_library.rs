//! jQuery-style selector libraries.
//!
//! The library is reached through global aliases (`$`, `jQuery` by
//! default). Calling an alias yields a selector object, and the traversal
//! methods below keep the selector object type along a call chain:
//!
//! ```javascript
//! var items = $("#list").children().first();
//! ```

use super::{TypeQuery, callee, method_call};
use crate::options::AnalyzerOptions;
use jsem_parser::{NodeArena, NodeIndex};
use jsem_scanner::SyntaxKind;
use jsem_solver::{FrameworkKind, Type, TypeKind};

/// Methods that return another selector object when called on one.
pub const CHAINING_METHODS: &[&str] = &[
    "add",
    "addBack",
    "children",
    "closest",
    "contents",
    "end",
    "eq",
    "filter",
    "find",
    "first",
    "has",
    "last",
    "next",
    "nextAll",
    "nextUntil",
    "not",
    "offsetParent",
    "parent",
    "parents",
    "parentsUntil",
    "prev",
    "prevAll",
    "prevUntil",
    "siblings",
    "slice",
];

/// An alias identifier is the library object itself.
pub fn identifier_type(arena: &NodeArena, ident: NodeIndex, options: &AnalyzerOptions) -> Option<Type> {
    let name = arena.identifier_text(ident)?;
    (arena.kind(ident) == Some(SyntaxKind::Identifier) && options.is_selector_alias(name))
        .then_some(Type::Framework(FrameworkKind::SelectorLibrary))
}

pub fn call_type(
    arena: &NodeArena,
    call: NodeIndex,
    options: &AnalyzerOptions,
    query: &dyn TypeQuery,
) -> Option<Type> {
    is_selector_object(arena, call, options, query).then_some(Type::Framework(FrameworkKind::SelectorObject))
}

/// `alias(...)`, or a chaining method called on a selector object.
pub fn is_selector_object(
    arena: &NodeArena,
    call: NodeIndex,
    options: &AnalyzerOptions,
    query: &dyn TypeQuery,
) -> bool {
    if arena.kind(call) != Some(SyntaxKind::CallExpression) {
        return false;
    }
    if let Some(target) = callee(arena, call)
        && arena.kind(target) == Some(SyntaxKind::Identifier)
        && arena
            .identifier_text(target)
            .is_some_and(|name| options.is_selector_alias(name))
    {
        return true;
    }
    method_call(arena, call).is_some_and(|(receiver, method)| {
        CHAINING_METHODS.contains(&method) && query.has_kind(receiver, TypeKind::SelectorObject)
    })
}
