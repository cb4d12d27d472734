//! Recursive assembly of target objects from a node tree

use std::any::Any;

use tracing::{trace, warn};

use crate::binding::{FieldBinding, FromXml, Nested, Source, ValueKind};
use crate::coerce::coerce;
use crate::error::{Error, ErrorKind, Result};
use crate::registry::Registry;
use crate::value::{Field, FieldValue};
use crate::xml::XmlNode;

/// Build a `T` from `node` using the bindings `registry` holds for it
///
/// The first failing binding aborts the whole call; the returned error names
/// the element path it surfaced under.
pub fn materialize<T: FromXml>(registry: &Registry, node: &XmlNode) -> Result<T> {
    let set = registry.bindings_for::<T>()?;
    trace!(element = %node.name, target_type = set.type_name(), "materializing");

    let mut target = T::default();
    for binding in set.iter() {
        let value = resolve(registry, node, binding).map_err(|e| e.within(&node.name))?;
        target
            .assign(Field::new(binding.field, value))
            .map_err(|e| e.within(&node.name))?;
    }
    Ok(target)
}

pub(crate) fn materialize_any<T: FromXml>(
    registry: &Registry,
    node: &XmlNode,
) -> Result<Box<dyn Any>> {
    let target: T = materialize(registry, node)?;
    Ok(Box::new(target))
}

fn resolve(registry: &Registry, node: &XmlNode, binding: &FieldBinding) -> Result<FieldValue> {
    let field = binding.field;
    let value = match binding.source {
        Source::Attribute(name) => coerce(field, &binding.kind, node.attribute(name))?,
        Source::ChildText(name) => {
            let raw = first_child(node, name, field).and_then(XmlNode::text);
            coerce(field, &binding.kind, raw)?
        }
        Source::OwnText => coerce(field, &binding.kind, node.text())?,
        Source::ChildObject(name) => match first_child(node, name, field) {
            Some(child) => FieldValue::Object(nested(binding)?.build(registry, child)?),
            None => FieldValue::Absent,
        },
        Source::ChildList { container, item } => {
            let parent = match container {
                Some(container) => first_child(node, container, field),
                None => Some(node),
            };
            let builder = nested(binding)?;
            let items = parent
                .into_iter()
                .flat_map(|parent| parent.children_named(item))
                .map(|child| {
                    builder.build(registry, child).map_err(|e| match container {
                        Some(container) => e.within(container),
                        None => e,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            FieldValue::List(items)
        }
    };

    if binding.required && value.is_absent() {
        return Err(Error::mapping(ErrorKind::MissingChild {
            element: node.name.clone(),
            field,
        }));
    }
    Ok(value)
}

fn nested(binding: &FieldBinding) -> Result<Nested> {
    match binding.kind {
        ValueKind::Object(nested) => Ok(nested),
        _ => Err(Error::mapping(ErrorKind::FieldTypeMismatch {
            field: binding.field,
            expected: "nested object",
        })),
    }
}

/// First child named `name`; later duplicates are ignored
fn first_child<'a>(node: &'a XmlNode, name: &'a str, field: &str) -> Option<&'a XmlNode> {
    let mut matches = node.children_named(name);
    let first = matches.next();
    if first.is_some() && matches.next().is_some() {
        warn!(
            element = %node.name,
            child = name,
            field,
            "multiple matching children for single-valued field, using the first"
        );
    }
    first
}
