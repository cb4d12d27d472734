//! Declarative field bindings
//!
//! A target type implements [`FromXml`] by listing one [`FieldBinding`] per
//! field and accepting the coerced [`Field`] values back in `assign`. The
//! binding list is read once per [`Registry`] and cached.

use std::any::{type_name, Any};
use std::fmt;

use crate::error::Result;
use crate::materialize::materialize_any;
use crate::registry::Registry;
use crate::value::Field;
use crate::xml::XmlNode;

/// A type that can be populated from an XML element through its bindings
pub trait FromXml: Default + 'static {
    /// Declared shape of the type, one binding per field
    fn bindings() -> Vec<FieldBinding>;

    /// Store one coerced value; called once per binding, in binding order
    fn assign(&mut self, field: Field) -> Result<()>;
}

/// Where a field's raw value comes from, relative to the bound element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// Value of the named attribute
    Attribute(&'static str),
    /// Text of the first child element with this name
    ChildText(&'static str),
    /// The element's own character data
    OwnText,
    /// First child element with this name, materialized as a nested object
    ChildObject(&'static str),
    /// Every `item` child, in document order. With a `container`, items are
    /// taken from under the first child of that name instead of the element
    /// itself.
    ChildList {
        container: Option<&'static str>,
        item: &'static str,
    },
}

impl Source {
    /// The XML name this source claims, if any
    pub const fn xml_name(&self) -> Option<&'static str> {
        match self {
            Self::Attribute(name) | Self::ChildText(name) | Self::ChildObject(name) => Some(*name),
            Self::ChildList {
                container: Some(container),
                ..
            } => Some(*container),
            Self::ChildList {
                container: None,
                item,
            } => Some(*item),
            Self::OwnText => None,
        }
    }

    pub const fn is_attribute(&self) -> bool {
        matches!(self, Self::Attribute(_))
    }

    pub(crate) const fn is_nested(&self) -> bool {
        matches!(self, Self::ChildObject(_) | Self::ChildList { .. })
    }
}

/// Semantic type of a bound field
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ValueKind {
    String,
    Integer,
    Double,
    /// True only when the raw text equals `sentinel` exactly
    Flag { sentinel: &'static str },
    /// `YYYY-MM-DD hh:mm:ss`
    DateTime,
    Object(Nested),
}

type BuildFn = fn(&Registry, &XmlNode) -> Result<Box<dyn Any>>;

/// Handle for materializing a nested target type without knowing it statically
#[derive(Clone, Copy)]
pub struct Nested {
    type_name: &'static str,
    build: BuildFn,
}

impl Nested {
    pub fn of<T: FromXml>() -> Self {
        Self {
            type_name: type_name::<T>(),
            build: materialize_any::<T>,
        }
    }

    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn build(&self, registry: &Registry, node: &XmlNode) -> Result<Box<dyn Any>> {
        (self.build)(registry, node)
    }
}

impl fmt::Debug for Nested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Nested").field(&self.type_name).finish()
    }
}

impl PartialEq for Nested {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}

/// Binding of one target field to one XML construct
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldBinding {
    pub field: &'static str,
    pub source: Source,
    pub kind: ValueKind,
    pub required: bool,
}

impl FieldBinding {
    pub const fn new(field: &'static str, source: Source, kind: ValueKind) -> Self {
        Self {
            field,
            source,
            kind,
            required: false,
        }
    }

    pub const fn attribute(field: &'static str, name: &'static str, kind: ValueKind) -> Self {
        Self::new(field, Source::Attribute(name), kind)
    }

    pub const fn child_text(field: &'static str, name: &'static str, kind: ValueKind) -> Self {
        Self::new(field, Source::ChildText(name), kind)
    }

    pub const fn own_text(field: &'static str, kind: ValueKind) -> Self {
        Self::new(field, Source::OwnText, kind)
    }

    pub fn child_object<T: FromXml>(field: &'static str, name: &'static str) -> Self {
        Self::new(field, Source::ChildObject(name), ValueKind::Object(Nested::of::<T>()))
    }

    /// Repeated `item` children, optionally wrapped in a `container` element
    pub fn child_list<T: FromXml>(
        field: &'static str,
        container: Option<&'static str>,
        item: &'static str,
    ) -> Self {
        Self::new(
            field,
            Source::ChildList { container, item },
            ValueKind::Object(Nested::of::<T>()),
        )
    }

    /// Absence of the source becomes an error instead of an absent value
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
