//! Tests for `Type` classification and `TypeSet` semantics.

use jsem_parser::NodeIndex;
use jsem_solver::*;

#[test]
fn test_adding_equal_type_is_noop() {
    let mut set = TypeSet::new();
    assert!(set.add(Type::NUMBER));
    assert!(!set.add(Type::NUMBER));
    assert!(set.add(Type::STRING));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_union_keeps_insertion_order() {
    let mut left = TypeSet::single(Type::NUMBER);
    let right: TypeSet = [Type::STRING, Type::NUMBER, Type::BOOLEAN].into_iter().collect();
    assert!(left.union_with(&right));
    let order: Vec<String> = left.iter().map(ToString::to_string).collect();
    assert_eq!(order, vec!["number", "string", "boolean"]);
    assert!(!left.union_with(&right));
}

#[test]
fn test_unique_is_none_when_ambiguous() {
    let mut set = TypeSet::new();
    assert!(set.unique(TypeKind::Function).is_none());

    set.add(Type::Function {
        declaration: NodeIndex(3),
    });
    assert_eq!(
        set.unique(TypeKind::Function),
        Some(&Type::Function {
            declaration: NodeIndex(3)
        })
    );

    set.add(Type::Function {
        declaration: NodeIndex(7),
    });
    assert!(set.unique(TypeKind::Function).is_none());
    assert!(set.contains_kind(TypeKind::Function));
}

#[test]
fn test_arrays_with_different_elements_are_distinct() {
    let mut set = TypeSet::new();
    set.add(Type::array());
    set.add(Type::dom_element_list());
    assert_eq!(set.len(), 2);
    assert!(set.unique(TypeKind::Array).is_none());
    assert!(Type::dom_element_list().is_dom_element_list());
    assert!(!Type::array().is_dom_element_list());
}

#[test]
fn test_callability() {
    assert_eq!(Type::NUMBER.callability(), Callability::NonCallable);
    assert_eq!(Type::object().callability(), Callability::NonCallable);
    assert_eq!(
        Type::Object {
            callability: Callability::MaybeCallable
        }
        .callability(),
        Callability::MaybeCallable
    );
    assert!(Type::Function { declaration: NodeIndex(0) }.is_callable());
    assert!(Type::Framework(FrameworkKind::SelectorLibrary).is_callable());
    assert!(!Type::Framework(FrameworkKind::SelectorObject).is_callable());
    assert!(Type::Framework(FrameworkKind::ModelClass).is_callable());
}

#[test]
fn test_kinds_and_display() {
    assert_eq!(Type::BuiltIn(BuiltInKind::Date).kind(), TypeKind::Date);
    assert_eq!(Type::WebApi(WebApiKind::Window).kind(), TypeKind::Window);
    assert_eq!(Type::dom_element_list().kind(), TypeKind::Array);
    assert_eq!(Type::dom_element_list().to_string(), "Array<DomElement>");
    assert_eq!(
        Type::Object {
            callability: Callability::MaybeCallable
        }
        .to_string(),
        "Object?"
    );
}

#[test]
fn test_only() {
    assert_eq!(TypeSet::single(Type::BOOLEAN).only(), Some(&Type::BOOLEAN));
    assert_eq!(TypeSet::new().only(), None);
}

#[test]
fn test_unknown_and_instance_types() {
    assert_eq!(Type::UNKNOWN.kind(), TypeKind::Unknown);
    assert!(Type::UNKNOWN.is_primitive());
    assert_eq!(Type::UNKNOWN.to_string(), "unknown");

    let instance = Type::Instance { class: NodeIndex(4) };
    assert_eq!(instance.kind(), TypeKind::Object);
    assert!(!instance.is_callable());
    assert_ne!(instance, Type::Instance { class: NodeIndex(9) });
    assert!(TypeSet::single(instance).contains_kind(TypeKind::Object));
}
