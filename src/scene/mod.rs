//! In-memory scene graph of 2-D vector primitives
//!
//! Build a tree of [`Group`]s and shapes under a [`Document`], queue
//! transforms on any node, then optionally resolve transforms and size the
//! viewport before serializing:
//!
//! ```rust
//! use vector_scene::scene::{Document, Rect, SceneNode, Text};
//!
//! let mut doc = Document::new();
//! doc.add(Rect::new(0.0, 0.0, 40.0, 20.0).with_style("fill", "steelblue"))
//!     .add(Text::new("hi", 4.0, 14.0));
//! doc.translate(10.0, None)?;
//! doc.apply_transform().auto_resize();
//!
//! let svg = doc.to_svg();
//! assert!(svg.contains(r#"<rect x="10" y="10" width="40" height="20""#));
//! assert!(svg.contains(r#"viewBox="10 10 40 20""#));
//! # Ok::<(), vector_scene::SceneError>(())
//! ```

pub mod attributes;
pub mod document;
pub mod geometry;
pub mod group;
pub mod node;
pub mod shapes;
pub mod style;
pub mod transform;
pub mod value;

pub use attributes::Attributes;
pub use document::{Document, SVG_NAMESPACE};
pub use geometry::{BoundingBox, Point};
pub use group::Group;
pub use node::{NodeCore, ParentLink, SceneNode};
pub use shapes::{Circle, Ellipse, Line, Path, Polygon, Polyline, Rect, Text};
pub use style::Style;
pub use transform::{Transform, TransformList};
pub use value::AttrValue;

use crate::error::SceneError;
use crate::renderer::SvgWriter;

/// Any node that can sit inside a group
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rect(Rect),
    Circle(Circle),
    Ellipse(Ellipse),
    Line(Line),
    Polygon(Polygon),
    Polyline(Polyline),
    Path(Path),
    Text(Text),
    Group(Group),
}

macro_rules! each_node {
    ($node:expr, $inner:ident => $body:expr) => {
        match $node {
            Node::Rect($inner) => $body,
            Node::Circle($inner) => $body,
            Node::Ellipse($inner) => $body,
            Node::Line($inner) => $body,
            Node::Polygon($inner) => $body,
            Node::Polyline($inner) => $body,
            Node::Path($inner) => $body,
            Node::Text($inner) => $body,
            Node::Group($inner) => $body,
        }
    };
}

impl Node {
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Node::Group(g) => Some(g),
            _ => None,
        }
    }
}

impl SceneNode for Node {
    fn tag(&self) -> &'static str {
        each_node!(self, n => n.tag())
    }

    fn core(&self) -> &NodeCore {
        each_node!(self, n => n.core())
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        each_node!(self, n => n.core_mut())
    }

    fn get_box(&self) -> BoundingBox {
        each_node!(self, n => n.get_box())
    }

    fn fold(&mut self, foldable: &[Transform]) {
        each_node!(self, n => n.fold(foldable))
    }

    fn resolve_transforms(&mut self) {
        each_node!(self, n => n.resolve_transforms())
    }

    fn set_geometry(&mut self, name: &str, value: &AttrValue) -> Result<bool, SceneError> {
        each_node!(self, n => n.set_geometry(name, value))
    }

    fn write_geometry(&self, w: &mut SvgWriter) {
        each_node!(self, n => n.write_geometry(w))
    }

    fn write_svg(&self, w: &mut SvgWriter) {
        each_node!(self, n => n.write_svg(w))
    }
}

macro_rules! node_from {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Node {
                fn from(inner: $variant) -> Self {
                    Node::$variant(inner)
                }
            }
        )*
    };
}

node_from!(Rect, Circle, Ellipse, Line, Polygon, Polyline, Path, Text, Group);
