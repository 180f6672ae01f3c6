//! The `<svg>` root

use std::fmt;

use tracing::debug;

use crate::error::SceneError;
use crate::renderer::{SvgConfig, SvgWriter};
use crate::stylesheet::Stylesheet;

use super::geometry::BoundingBox;
use super::group::Group;
use super::node::{NodeCore, SceneNode};
use super::value::AttrValue;
use super::Node;

/// Namespace written on every document
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Root of a scene: a group rendered as `<svg>` with the SVG namespace and
/// an optional `viewBox`
///
/// A document cannot be added to a group, so it is always the tree root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    root: Group,
    view_box: Option<String>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a top-level node
    pub fn add(&mut self, node: impl Into<Node>) -> &mut Self {
        self.root.add(node);
        self
    }

    /// Builder form of [`Document::add`]
    pub fn with_child(mut self, node: impl Into<Node>) -> Self {
        self.add(node);
        self
    }

    pub fn children(&self) -> &[Node] {
        self.root.children()
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Group {
        &mut self.root
    }

    pub fn set_stylesheet(&mut self, stylesheet: Stylesheet) -> &mut Self {
        self.root.set_stylesheet(stylesheet);
        self
    }

    pub fn view_box(&self) -> Option<&str> {
        self.view_box.as_deref()
    }

    pub fn set_view_box(&mut self, view_box: impl Into<String>) -> &mut Self {
        self.view_box = Some(view_box.into());
        self
    }

    /// Derive the `viewBox` from the bounding box of everything in the tree
    ///
    /// Reads the current geometry, so run it after any transform resolution
    /// that should be reflected in the viewport.
    pub fn auto_resize(&mut self) -> &mut Self {
        let bounds = self.get_box();
        let view_box = bounds
            .to_view_box()
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        debug!(?bounds, %view_box, "auto-resized document");
        self.view_box = Some(view_box);
        self
    }

    /// Serialize with default settings
    pub fn to_svg(&self) -> String {
        self.to_svg_with(&SvgConfig::default())
    }

    /// Serialize with the given settings
    pub fn to_svg_with(&self, config: &SvgConfig) -> String {
        let mut w = SvgWriter::new(config.clone());
        w.declaration();
        self.write_svg(&mut w);
        w.finish()
    }
}

impl SceneNode for Document {
    fn tag(&self) -> &'static str {
        "svg"
    }

    fn core(&self) -> &NodeCore {
        self.root.core()
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        self.root.core_mut()
    }

    fn get_box(&self) -> BoundingBox {
        self.root.get_box()
    }

    fn resolve_transforms(&mut self) {
        self.root.resolve_transforms();
    }

    /// `viewBox` is the document's own field and `xmlns` is fixed; neither
    /// may land in the root's attribute bag
    fn set_geometry(&mut self, name: &str, value: &AttrValue) -> Result<bool, SceneError> {
        match name {
            "viewBox" | "view_box" | "view-box" => {
                self.set_view_box(value.to_string());
                Ok(true)
            }
            "xmlns" => Err(SceneError::ReservedAttribute(name.to_string())),
            _ => self.root.set_geometry(name, value),
        }
    }

    fn write_svg(&self, w: &mut SvgWriter) {
        let view_box = self.view_box.as_deref().filter(|vb| !vb.is_empty());
        self.root.write_with(w, self.tag(), |w| {
            w.attr("xmlns", SVG_NAMESPACE);
            if let Some(vb) = view_box {
                w.attr("viewBox", vb);
            }
        });
    }

    fn to_svg(&self) -> String {
        Document::to_svg(self)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_svg())
    }
}
