//! Browser globals: `window`, `document` and DOM element lookups.

use super::{TypeQuery, member_access, method_call};
use jsem_parser::{NodeArena, NodeIndex};
use jsem_scanner::SyntaxKind;
use jsem_solver::{Type, TypeKind, WebApiKind};

/// Window properties that are windows themselves.
const WINDOW_PROPERTIES: &[&str] = &["frames", "opener", "parent", "self", "top"];

/// Window methods returning a window.
const WINDOW_METHODS: &[&str] = &["open"];

const ELEMENT_PROPERTIES: &[&str] = &["activeElement", "body", "documentElement", "head"];

const ELEMENT_METHODS: &[&str] = &["getElementById", "querySelector"];

const ELEMENT_LIST_PROPERTIES: &[&str] = &["anchors", "forms", "images", "links", "scripts"];

const ELEMENT_LIST_METHODS: &[&str] = &[
    "getElementsByClassName",
    "getElementsByName",
    "getElementsByTagName",
    "querySelectorAll",
];

pub fn identifier_type(arena: &NodeArena, ident: NodeIndex) -> Option<Type> {
    if arena.kind(ident) != Some(SyntaxKind::Identifier) {
        return None;
    }
    match arena.identifier_text(ident)? {
        "window" => Some(Type::WebApi(WebApiKind::Window)),
        "document" => Some(Type::WebApi(WebApiKind::Document)),
        _ => None,
    }
}

/// `w.open(...)`, `document.getElementById(...)` and the other lookups.
pub fn call_type(arena: &NodeArena, call: NodeIndex, query: &dyn TypeQuery) -> Option<Type> {
    let (receiver, method) = method_call(arena, call)?;
    if query.has_kind(receiver, TypeKind::Window) && WINDOW_METHODS.contains(&method) {
        return Some(Type::WebApi(WebApiKind::Window));
    }
    if query.has_kind(receiver, TypeKind::Document) {
        if ELEMENT_METHODS.contains(&method) {
            return Some(Type::dom_element());
        }
        if ELEMENT_LIST_METHODS.contains(&method) {
            return Some(Type::dom_element_list());
        }
    }
    None
}

/// `w.parent`, `document.body`, `document.forms` and friends.
pub fn property_type(arena: &NodeArena, access: NodeIndex, query: &dyn TypeQuery) -> Option<Type> {
    let (receiver, name) = member_access(arena, access)?;
    if query.has_kind(receiver, TypeKind::Window) && WINDOW_PROPERTIES.contains(&name) {
        return Some(Type::WebApi(WebApiKind::Window));
    }
    if query.has_kind(receiver, TypeKind::Document) {
        if ELEMENT_PROPERTIES.contains(&name) {
            return Some(Type::dom_element());
        }
        if ELEMENT_LIST_PROPERTIES.contains(&name) {
            return Some(Type::dom_element_list());
        }
    }
    None
}
