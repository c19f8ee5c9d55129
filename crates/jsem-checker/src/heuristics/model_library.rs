//! Backbone-style model classes.
//!
//! ```javascript
//! var Base = Backbone.Model.extend({ defaults: { done: false } });
//! var Todo = Base.extend({});
//! var todo = new Todo();
//! ```

use super::{TypeQuery, arguments, member_access, method_call};
use jsem_parser::{NodeArena, NodeIndex};
use jsem_scanner::SyntaxKind;
use jsem_solver::{FrameworkKind, Type, TypeKind};

pub fn call_type(arena: &NodeArena, call: NodeIndex, query: &dyn TypeQuery) -> Option<Type> {
    is_model_class(arena, call, query).then_some(Type::Framework(FrameworkKind::ModelClass))
}

/// `<Base>.Model.extend(...)`, or `extend` called on a model class.
pub fn is_model_class(arena: &NodeArena, call: NodeIndex, query: &dyn TypeQuery) -> bool {
    let Some((receiver, "extend")) = method_call(arena, call) else {
        return false;
    };
    let is_model_namespace = member_access(arena, receiver).is_some_and(|(_, name)| name == "Model");
    is_model_namespace || query.has_kind(receiver, TypeKind::ModelClass)
}

/// `new X(...)` where `X` is a model class.
pub fn new_type(arena: &NodeArena, new_expr: NodeIndex, query: &dyn TypeQuery) -> Option<Type> {
    if arena.kind(new_expr) != Some(SyntaxKind::NewExpression) {
        return None;
    }
    let constructor = super::callee(arena, new_expr)?;
    query
        .has_kind(constructor, TypeKind::ModelClass)
        .then_some(Type::Framework(FrameworkKind::ModelInstance))
}

/// Value node of the entry `name` in the object literal passed to an
/// `extend` call. Methods resolve to the method node itself and shorthand
/// entries to their identifier.
pub fn extend_property(arena: &NodeArena, call: NodeIndex, name: &str) -> Option<NodeIndex> {
    let (_, "extend") = method_call(arena, call)? else {
        return None;
    };
    let properties = arguments(arena, call).into_iter().next()?;
    let literal = arena.skip_parentheses(properties);
    if arena.kind(literal)? != SyntaxKind::ObjectLiteralExpression {
        return None;
    }

    arena.get_literal_expr_at(literal)?.elements.iter().find_map(|element| {
        let node = arena.get(element)?;
        match node.kind {
            SyntaxKind::PropertyAssignment => {
                let data = arena.get_property_assignment(node)?;
                (property_key(arena, data.name)? == name).then_some(data.initializer)
            }
            SyntaxKind::ShorthandPropertyAssignment => {
                let data = arena.get_shorthand_property(node)?;
                (arena.identifier_text(data.name)? == name).then_some(data.name)
            }
            SyntaxKind::MethodDeclaration | SyntaxKind::GetAccessor | SyntaxKind::SetAccessor => {
                let data = arena.get_function(node)?;
                (property_key(arena, data.name)? == name).then_some(element)
            }
            _ => None,
        }
    })
}

/// Static text of a property key: identifier names and string literals.
fn property_key(arena: &NodeArena, key: NodeIndex) -> Option<&str> {
    let node = arena.get(key)?;
    match node.kind {
        SyntaxKind::IdentifierName => arena.identifier_text(key),
        SyntaxKind::StringLiteral => arena.get_literal(node).map(|literal| literal.text.as_str()),
        _ => None,
    }
}
