//! XML entity abstraction

use crate::error::{ParseError, Result};
use std::str::FromStr;

/// Read access to a launch element, independent of the document backend
pub trait Entity {
    /// Element tag (e.g., "arg", "node_container")
    fn type_name(&self) -> &str;

    /// Attribute value, `None` when absent
    fn optional_attr_str(&self, name: &str) -> Option<String>;

    /// Attribute value, erroring when absent
    fn required_attr_str(&self, name: &str) -> Result<String> {
        self.optional_attr_str(name)
            .ok_or_else(|| ParseError::MissingAttribute {
                element: self.type_name().to_string(),
                attribute: name.to_string(),
            })
    }
}

/// Extension trait for type-aware attribute access
pub trait EntityExt: Entity {
    /// Get attribute value with type coercion
    fn optional_attr<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        match self.optional_attr_str(name) {
            Some(value) => {
                value
                    .trim()
                    .parse::<T>()
                    .map(Some)
                    .map_err(|_| ParseError::TypeCoercion {
                        attribute: name.to_string(),
                        value: value.to_string(),
                        expected_type: std::any::type_name::<T>(),
                    })
            }
            None => Ok(None),
        }
    }
}

impl<T: Entity + ?Sized> EntityExt for T {}

/// XML entity implementation wrapping roxmltree::Node
#[derive(Clone, Copy)]
pub struct XmlEntity<'a, 'input> {
    node: roxmltree::Node<'a, 'input>,
}

impl<'a, 'input> XmlEntity<'a, 'input> {
    pub fn new(node: roxmltree::Node<'a, 'input>) -> Self {
        Self { node }
    }

    /// Iterate over child elements, skipping text and comments
    pub fn children(&self) -> impl Iterator<Item = XmlEntity<'a, 'input>> {
        self.node
            .children()
            .filter(|n| n.is_element())
            .map(XmlEntity::new)
    }
}

impl Entity for XmlEntity<'_, '_> {
    fn type_name(&self) -> &str {
        self.node.tag_name().name()
    }

    fn optional_attr_str(&self, name: &str) -> Option<String> {
        self.node.attribute(name).map(str::to_string)
    }
}
