//! The closed `Type` enumeration.

use jsem_parser::NodeIndex;
use serde::Serialize;
use std::fmt;

/// Whether values of a type can be invoked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Callability {
    Callable,
    NonCallable,
    /// Unknown: e.g. the result of `new` on an unrecognized constructor
    MaybeCallable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    /// Assigned a value no rule recognized
    Unknown,
}

/// Wrapper objects created with `new String(..)`, `new Number(..)`,
/// `new Boolean(..)` and `new Date(..)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BuiltInKind {
    StringObject,
    NumberObject,
    BooleanObject,
    Date,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum WebApiKind {
    Window,
    Document,
    DomElement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FrameworkKind {
    /// The selector library itself (`$`, `jQuery`)
    SelectorLibrary,
    /// Result of a selector call or a chained traversal
    SelectorObject,
    /// Result of `Backbone.Model.extend(...)`
    ModelClass,
    /// `new` of a model class
    ModelInstance,
}

/// A heuristic classification of a value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    Primitive(PrimitiveKind),
    /// Array literal or array-like; `element` is known only for recognized
    /// lists such as DOM element lists.
    Array { element: Option<Box<Type>> },
    Object { callability: Callability },
    /// A function, identified by its declaring node
    Function { declaration: NodeIndex },
    /// A class, identified by its declaring node
    Class { declaration: NodeIndex },
    /// An object created from the class declared at `class`. Its kind is
    /// [`TypeKind::Object`].
    Instance { class: NodeIndex },
    BuiltIn(BuiltInKind),
    WebApi(WebApiKind),
    Framework(FrameworkKind),
}

/// Flat discriminant of [`Type`], used for uniqueness queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeKind {
    String,
    Number,
    Boolean,
    Unknown,
    Array,
    Object,
    Function,
    Class,
    StringObject,
    NumberObject,
    BooleanObject,
    Date,
    Window,
    Document,
    DomElement,
    SelectorLibrary,
    SelectorObject,
    ModelClass,
    ModelInstance,
}

impl Type {
    pub const STRING: Type = Type::Primitive(PrimitiveKind::String);
    pub const NUMBER: Type = Type::Primitive(PrimitiveKind::Number);
    pub const BOOLEAN: Type = Type::Primitive(PrimitiveKind::Boolean);
    pub const UNKNOWN: Type = Type::Primitive(PrimitiveKind::Unknown);

    /// Array with no known element type.
    pub fn array() -> Type {
        Type::Array { element: None }
    }

    pub fn array_of(element: Type) -> Type {
        Type::Array {
            element: Some(Box::new(element)),
        }
    }

    /// Plain object literal.
    pub fn object() -> Type {
        Type::Object {
            callability: Callability::NonCallable,
        }
    }

    pub fn dom_element() -> Type {
        Type::WebApi(WebApiKind::DomElement)
    }

    /// A list of DOM elements is an array of DOM elements.
    pub fn dom_element_list() -> Type {
        Type::array_of(Type::dom_element())
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Primitive(PrimitiveKind::String) => TypeKind::String,
            Type::Primitive(PrimitiveKind::Number) => TypeKind::Number,
            Type::Primitive(PrimitiveKind::Boolean) => TypeKind::Boolean,
            Type::Primitive(PrimitiveKind::Unknown) => TypeKind::Unknown,
            Type::Array { .. } => TypeKind::Array,
            Type::Object { .. } | Type::Instance { .. } => TypeKind::Object,
            Type::Function { .. } => TypeKind::Function,
            Type::Class { .. } => TypeKind::Class,
            Type::BuiltIn(BuiltInKind::StringObject) => TypeKind::StringObject,
            Type::BuiltIn(BuiltInKind::NumberObject) => TypeKind::NumberObject,
            Type::BuiltIn(BuiltInKind::BooleanObject) => TypeKind::BooleanObject,
            Type::BuiltIn(BuiltInKind::Date) => TypeKind::Date,
            Type::WebApi(WebApiKind::Window) => TypeKind::Window,
            Type::WebApi(WebApiKind::Document) => TypeKind::Document,
            Type::WebApi(WebApiKind::DomElement) => TypeKind::DomElement,
            Type::Framework(FrameworkKind::SelectorLibrary) => TypeKind::SelectorLibrary,
            Type::Framework(FrameworkKind::SelectorObject) => TypeKind::SelectorObject,
            Type::Framework(FrameworkKind::ModelClass) => TypeKind::ModelClass,
            Type::Framework(FrameworkKind::ModelInstance) => TypeKind::ModelInstance,
        }
    }

    pub fn callability(&self) -> Callability {
        match self {
            Type::Object { callability } => *callability,
            Type::Function { .. }
            | Type::Class { .. }
            | Type::Framework(FrameworkKind::SelectorLibrary)
            | Type::Framework(FrameworkKind::ModelClass) => Callability::Callable,
            Type::Primitive(_)
            | Type::Array { .. }
            | Type::Instance { .. }
            | Type::BuiltIn(_)
            | Type::WebApi(_)
            | Type::Framework(FrameworkKind::SelectorObject)
            | Type::Framework(FrameworkKind::ModelInstance) => Callability::NonCallable,
        }
    }

    pub fn is_callable(&self) -> bool {
        self.callability() == Callability::Callable
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    /// Element type of an array with a known element.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array { element } => element.as_deref(),
            _ => None,
        }
    }

    pub fn is_dom_element_list(&self) -> bool {
        self.element_type() == Some(&Type::dom_element())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(PrimitiveKind::String) => f.write_str("string"),
            Type::Primitive(PrimitiveKind::Number) => f.write_str("number"),
            Type::Primitive(PrimitiveKind::Boolean) => f.write_str("boolean"),
            Type::Primitive(PrimitiveKind::Unknown) => f.write_str("unknown"),
            Type::Array { element: None } => f.write_str("Array"),
            Type::Array { element: Some(element) } => write!(f, "Array<{element}>"),
            Type::Object { callability } => match callability {
                Callability::MaybeCallable => f.write_str("Object?"),
                Callability::Callable => f.write_str("Object()"),
                Callability::NonCallable => f.write_str("Object"),
            },
            Type::Function { .. } => f.write_str("Function"),
            Type::Class { .. } => f.write_str("Class"),
            Type::Instance { .. } => f.write_str("Instance"),
            Type::BuiltIn(kind) => write!(f, "{kind:?}"),
            Type::WebApi(kind) => write!(f, "{kind:?}"),
            Type::Framework(kind) => write!(f, "{kind:?}"),
        }
    }
}
