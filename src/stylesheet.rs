//! CSS rules embedded in a group's `<style>` block
//!
//! A stylesheet is an ordered set of `selector → properties` rules. It can
//! be written in TOML:
//!
//! ```toml
//! [metadata]
//! name = "Night"
//!
//! [rules.".accent"]
//! fill = "#ff9800"
//! stroke-width = 2
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use crate::scene::{AttrValue, Style};

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Ordered CSS rules, keyed by selector
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Selector → declarations, in file order
    pub rules: IndexMap<String, Style>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    rules: IndexMap<String, Style>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            rules: parsed.rules,
        })
    }

    /// Stylesheet from already-built rules
    pub fn from_rules(rules: IndexMap<String, Style>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Add one declaration to a selector, creating the rule if needed
    pub fn rule(
        &mut self,
        selector: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<AttrValue>,
    ) -> &mut Self {
        self.rules
            .entry(selector.into())
            .or_default()
            .set(property, value);
        self
    }

    /// Merge another stylesheet's rules over this one's
    pub fn extend(&mut self, other: Stylesheet) {
        for (selector, style) in other.rules {
            let target = self.rules.entry(selector).or_default();
            for (property, value) in style.iter() {
                target.set(property, value.clone());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// `selector { prop: value; }` for every rule, space-separated
    ///
    /// Rules whose declarations are all empty are skipped.
    pub fn to_css(&self) -> String {
        self.rules
            .iter()
            .filter_map(|(selector, style)| {
                let body = style.declarations();
                (!body.is_empty()).then(|| format!("{} {{ {} }}", selector, body))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
