//! Inline CSS-like styles

use indexmap::IndexMap;
use serde::Deserialize;

use crate::renderer::svg::{escape_xml, hyphenate};

use super::value::AttrValue;

/// Property name → value mapping rendered as a single `style` attribute
///
/// Properties keep insertion order, so output is stable. Names are stored
/// hyphenated, so `font_size` and `font-size` are the same property. No CSS
/// validation is done on names or values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "IndexMap<String, AttrValue>")]
pub struct Style {
    properties: IndexMap<String, AttrValue>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value (under either spelling)
    /// in place
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<AttrValue>) -> &mut Self {
        let property: String = property.into();
        let key = hyphenate(&property).into_owned();
        self.properties.insert(key, value.into());
        self
    }

    /// Builder form of [`Style::set`]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(property, value);
        self
    }

    pub fn get(&self, property: &str) -> Option<&AttrValue> {
        self.properties.get(&*hyphenate(property))
    }

    pub fn remove(&mut self, property: &str) -> Option<AttrValue> {
        self.properties.shift_remove(&*hyphenate(property))
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Numeric font size, if one is set
    pub fn font_size(&self) -> Option<f64> {
        self.get("font-size")
            .and_then(AttrValue::as_number)
            .filter(|size| size.is_finite())
    }

    /// `prop: value;` declarations, space-joined, falsy values dropped
    pub fn declarations(&self) -> String {
        self.properties
            .iter()
            .filter(|(_, value)| value.is_truthy())
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The ` style="…"` fragment, or an empty string when nothing renders
    pub fn serialize(&self) -> String {
        let declarations = self.declarations();
        if declarations.is_empty() {
            return String::new();
        }
        format!(r#" style="{}""#, escape_xml(&declarations))
    }
}

impl<K, V> FromIterator<(K, V)> for Style
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Style::new();
        for (property, value) in iter {
            style.set(property, value);
        }
        style
    }
}

impl From<IndexMap<String, AttrValue>> for Style {
    fn from(properties: IndexMap<String, AttrValue>) -> Self {
        properties.into_iter().collect()
    }
}
