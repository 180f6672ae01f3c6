//! The attribute bag every node carries

use indexmap::IndexMap;

use crate::error::SceneError;
use crate::renderer::svg::{hyphenate, SvgWriter};

use super::value::AttrValue;

/// Names that belong to node state rather than the attribute bag
pub const RESERVED_ATTRIBUTES: &[&str] =
    &["style", "parent", "class", "class_name", "transform", "children"];

/// Ordered SVG attributes beyond a node's position and geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    values: IndexMap<String, AttrValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is held by node state and cannot live in the bag
    pub fn is_reserved(name: &str) -> bool {
        let normalized = name.replace('-', "_");
        RESERVED_ATTRIBUTES.contains(&normalized.as_str())
    }

    /// Store an attribute, replacing any previous value in place
    ///
    /// Names are stored hyphenated, so `stroke_width` and `stroke-width`
    /// are the same attribute.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> Result<&mut Self, SceneError> {
        let name: String = name.into();
        if Self::is_reserved(&name) {
            return Err(SceneError::ReservedAttribute(name));
        }
        self.values.insert(hyphenate(&name).into_owned(), value.into());
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(&*hyphenate(name))
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(AttrValue::as_number)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.values.shift_remove(&*hyphenate(name))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Emit every truthy attribute in insertion order
    pub(crate) fn write(&self, w: &mut SvgWriter) {
        for (name, value) in self.values.iter().filter(|(_, v)| v.is_truthy()) {
            w.attr(name, value);
        }
    }
}
