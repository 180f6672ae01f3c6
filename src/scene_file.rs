//! TOML scene descriptions
//!
//! A scene file lists top-level nodes, each tagged by `kind`:
//!
//! ```toml
//! [stylesheet.".accent"]
//! fill = "#2196f3"
//!
//! [[nodes]]
//! kind = "rect"
//! x = 10
//! y = 10
//! width = 40
//! height = 20
//! class = "accent"
//! transform = [{ translate = [5] }, { rotate = [45] }]
//!
//! [[nodes]]
//! kind = "group"
//! transform = [{ scale = [2] }]
//!
//! [[nodes.children]]
//! kind = "circle"
//! cx = 5
//! cy = 5
//! r = 2
//! ```

use std::path::Path as FsPath;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::SceneError;
use crate::scene::transform::DEFAULT_ROTATION;
use crate::scene::{
    AttrValue, Circle, Document, Ellipse, Group, Line, Node, Path, Polygon, Polyline, Rect,
    SceneNode, Style, Text, Transform,
};
use crate::stylesheet::Stylesheet;

/// One entry of a `transform` list: `{ translate = [tx, ty?] }`,
/// `{ scale = [sx, sy?] }` or `{ rotate = [angle?, cx?, cy?] }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformSpec {
    Translate(Vec<f64>),
    Scale(Vec<f64>),
    Rotate(Vec<f64>),
}

impl TransformSpec {
    /// Check argument counts and values and build the entry
    pub fn to_transform(&self) -> Result<Transform, SceneError> {
        match self {
            TransformSpec::Translate(args) => match args.as_slice() {
                [tx] => Transform::translate(*tx, None),
                [tx, ty] => Transform::translate(*tx, Some(*ty)),
                _ => Err(SceneError::arity("translate", "1 or 2", args.len())),
            },
            TransformSpec::Scale(args) => match args.as_slice() {
                [sx] => Transform::scale(*sx, None),
                [sx, sy] => Transform::scale(*sx, Some(*sy)),
                _ => Err(SceneError::arity("scale", "1 or 2", args.len())),
            },
            TransformSpec::Rotate(args) => match args.as_slice() {
                [] => Transform::rotate(DEFAULT_ROTATION, None, None),
                [angle] => Transform::rotate(*angle, None, None),
                [angle, cx] => Transform::rotate(*angle, Some(*cx), None),
                [angle, cx, cy] => Transform::rotate(*angle, Some(*cx), Some(*cy)),
                _ => Err(SceneError::arity("rotate", "0 to 3", args.len())),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Rect,
    Circle,
    Ellipse,
    Line,
    Polygon,
    Polyline,
    Path,
    Text,
    Group,
}

impl NodeKind {
    /// Geometry fields the kind reads, beyond the shared `x`/`y`
    fn geometry_fields(self) -> &'static [&'static str] {
        match self {
            NodeKind::Rect => &["width", "height", "rx", "ry"],
            NodeKind::Circle => &["cx", "cy", "r"],
            NodeKind::Ellipse => &["cx", "cy", "rx", "ry"],
            NodeKind::Line => &["x1", "y1", "x2", "y2"],
            NodeKind::Polygon | NodeKind::Polyline => &["points"],
            NodeKind::Path => &["d"],
            NodeKind::Text => &["text"],
            NodeKind::Group => &["width", "height"],
        }
    }

    /// SVG tag the kind builds
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Rect => "rect",
            NodeKind::Circle => "circle",
            NodeKind::Ellipse => "ellipse",
            NodeKind::Line => "line",
            NodeKind::Polygon => "polygon",
            NodeKind::Polyline => "polyline",
            NodeKind::Path => "path",
            NodeKind::Text => "text",
            NodeKind::Group => "g",
        }
    }
}

/// A node as written in a scene file
///
/// Setting a geometry field the kind does not use is an error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rx: Option<f64>,
    pub ry: Option<f64>,
    pub cx: Option<f64>,
    pub cy: Option<f64>,
    pub r: Option<f64>,
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    #[serde(default)]
    pub points: Vec<[f64; 2]>,
    pub d: Option<String>,
    pub text: Option<String>,
    pub class: Option<String>,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub attributes: IndexMap<String, AttrValue>,
    #[serde(default)]
    pub transform: Vec<TransformSpec>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// Geometry fields present in the file, by name
    fn present_fields(&self) -> [(&'static str, bool); 14] {
        [
            ("width", self.width.is_some()),
            ("height", self.height.is_some()),
            ("rx", self.rx.is_some()),
            ("ry", self.ry.is_some()),
            ("cx", self.cx.is_some()),
            ("cy", self.cy.is_some()),
            ("r", self.r.is_some()),
            ("x1", self.x1.is_some()),
            ("y1", self.y1.is_some()),
            ("x2", self.x2.is_some()),
            ("y2", self.y2.is_some()),
            ("points", !self.points.is_empty()),
            ("d", self.d.is_some()),
            ("text", self.text.is_some()),
        ]
    }

    /// Build the scene node, recursing into group children
    pub fn into_node(self) -> Result<Node, SceneError> {
        if self.kind != NodeKind::Group && !self.children.is_empty() {
            return Err(SceneError::invalid_geometry(
                self.kind.tag(),
                "only groups can have children",
            ));
        }
        let allowed = self.kind.geometry_fields();
        if let Some((field, _)) = self
            .present_fields()
            .into_iter()
            .find(|(field, present)| *present && !allowed.contains(field))
        {
            return Err(SceneError::invalid_geometry(
                self.kind.tag(),
                format!("`{}` does not apply to this kind", field),
            ));
        }

        let zero = |v: Option<f64>| v.unwrap_or(0.0);
        let mut node: Node = match self.kind {
            NodeKind::Rect => {
                let rect = Rect::new(
                    zero(self.x),
                    zero(self.y),
                    zero(self.width),
                    zero(self.height),
                )
                .rounded(zero(self.rx), zero(self.ry));
                rect.validate()?;
                rect.into()
            }
            NodeKind::Circle => {
                let circle = Circle::new(zero(self.cx), zero(self.cy), zero(self.r));
                circle.validate()?;
                circle.into()
            }
            NodeKind::Ellipse => {
                let ellipse =
                    Ellipse::new(zero(self.cx), zero(self.cy), zero(self.rx), zero(self.ry));
                ellipse.validate()?;
                ellipse.into()
            }
            NodeKind::Line => {
                Line::new(zero(self.x1), zero(self.y1), zero(self.x2), zero(self.y2)).into()
            }
            NodeKind::Polygon => Polygon::new(self.points).into(),
            NodeKind::Polyline => Polyline::new(self.points).into(),
            NodeKind::Path => Path::new(self.d.unwrap_or_default()).into(),
            NodeKind::Text => {
                Text::new(self.text.unwrap_or_default(), zero(self.x), zero(self.y)).into()
            }
            NodeKind::Group => {
                let mut group = Group::new();
                for child in self.children {
                    group.add(child.into_node()?);
                }
                // the footprint extends the union of the children's boxes
                if let Some(width) = self.width {
                    group.set_attr("width", width)?;
                }
                if let Some(height) = self.height {
                    group.set_attr("height", height)?;
                }
                group.into()
            }
        };

        let core = node.core_mut();
        if self.x.is_some() {
            core.x = self.x;
        }
        if self.y.is_some() {
            core.y = self.y;
        }
        core.style = self.style;
        core.class_name = self.class;
        for spec in &self.transform {
            core.transform.push(spec.to_transform()?);
        }
        for (name, value) in self.attributes {
            node.set_attr(&name, value)?;
        }
        Ok(node)
    }
}

/// Top level of a scene file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    /// Fixed `viewBox`; when absent it can be derived from the content
    pub view_box: Option<String>,
    /// Style of the `<svg>` element itself
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub attributes: IndexMap<String, AttrValue>,
    pub class: Option<String>,
    /// Transforms queued on the root and inherited by every node
    #[serde(default)]
    pub transform: Vec<TransformSpec>,
    /// Inline CSS rules, selector → declarations
    #[serde(default)]
    pub stylesheet: IndexMap<String, Style>,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

impl SceneFile {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        let scene: SceneFile = toml::from_str(content)?;
        debug!(nodes = scene.nodes.len(), "parsed scene file");
        Ok(scene)
    }

    pub fn from_file(path: &FsPath) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Build the document tree; transforms are queued, not yet resolved
    pub fn into_document(self) -> Result<Document, SceneError> {
        let mut doc = Document::new();
        for node in self.nodes {
            doc.add(node.into_node()?);
        }

        let core = doc.core_mut();
        core.style = self.style;
        core.class_name = self.class;
        for spec in &self.transform {
            core.transform.push(spec.to_transform()?);
        }
        for (name, value) in self.attributes {
            doc.set_attr(&name, value)?;
        }

        if !self.stylesheet.is_empty() {
            doc.set_stylesheet(Stylesheet::from_rules(self.stylesheet));
        }
        if let Some(view_box) = self.view_box {
            doc.set_view_box(view_box);
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spec(args: &[f64]) -> Vec<f64> {
        args.to_vec()
    }

    #[test]
    fn test_transform_arity() {
        assert_eq!(
            TransformSpec::Translate(spec(&[5.0])).to_transform().unwrap(),
            Transform::Translate { tx: 5.0, ty: 5.0 }
        );
        assert_eq!(
            TransformSpec::Rotate(vec![]).to_transform().unwrap(),
            Transform::Rotate {
                angle: 180.0,
                center: None
            }
        );
        assert_eq!(
            TransformSpec::Rotate(spec(&[30.0, 4.0])).to_transform().unwrap(),
            Transform::Rotate {
                angle: 30.0,
                center: None
            }
        );
        for bad in [
            TransformSpec::Translate(vec![]),
            TransformSpec::Scale(spec(&[1.0, 2.0, 3.0])),
            TransformSpec::Rotate(spec(&[1.0, 2.0, 3.0, 4.0])),
        ] {
            assert!(matches!(
                bad.to_transform(),
                Err(SceneError::TransformArity { .. })
            ));
        }
    }

    #[test]
    fn test_parse_nodes() {
        let scene = SceneFile::from_str(
            r#"
            view_box = "0 0 100 100"

            [[nodes]]
            kind = "rect"
            x = 1
            y = 2
            width = 3
            height = 4
            style = { fill = "red" }
            transform = [{ translate = [5, 6] }]

            [[nodes]]
            kind = "polygon"
            points = [[0, 0], [10, 0], [5, 8]]
            "#,
        )
        .unwrap();
        assert_eq!(scene.view_box.as_deref(), Some("0 0 100 100"));
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.nodes[0].kind, NodeKind::Rect);
        assert_eq!(
            scene.nodes[0].transform,
            vec![TransformSpec::Translate(vec![5.0, 6.0])]
        );
        assert_eq!(scene.nodes[1].points.len(), 3);
    }

    #[test]
    fn test_into_document() {
        let doc = SceneFile::from_str(
            r#"
            [[nodes]]
            kind = "group"
            class = "layer"

            [[nodes.children]]
            kind = "circle"
            cx = 5
            cy = 5
            r = 2
            attributes = { id = "dot" }
            "#,
        )
        .unwrap()
        .into_document()
        .unwrap();
        let Some(Node::Group(group)) = doc.children().first() else {
            panic!("expected group");
        };
        assert_eq!(group.core().class_name.as_deref(), Some("layer"));
        assert_eq!(
            group.child(0).map(SceneNode::to_svg).unwrap(),
            r#"<circle cx="5" cy="5" r="2" id="dot"/>"#
        );
    }

    #[test]
    fn test_numeric_attributes_reach_geometry() {
        let node = NodeSpec {
            attributes: [("width".to_string(), AttrValue::from(7))].into_iter().collect(),
            ..minimal(NodeKind::Rect)
        }
        .into_node()
        .unwrap();
        assert_eq!(node.get_box().to_array(), [0.0, 0.0, 7.0, 0.0]);
    }

    #[test]
    fn test_children_only_on_groups() {
        let node = NodeSpec {
            children: vec![minimal(NodeKind::Path)],
            ..minimal(NodeKind::Rect)
        };
        assert!(matches!(
            node.into_node(),
            Err(SceneError::InvalidGeometry { tag: "rect", .. })
        ));
    }

    #[test]
    fn test_group_footprint_extends_box() {
        let doc = SceneFile::from_str(
            r#"
            [[nodes]]
            kind = "group"
            x = -10
            y = -10
            width = 100
            height = 100

            [[nodes.children]]
            kind = "rect"
            width = 5
            height = 5
            "#,
        )
        .unwrap()
        .into_document()
        .unwrap();
        assert_eq!(doc.get_box().to_array(), [-10.0, -10.0, 90.0, 90.0]);
    }

    #[test]
    fn test_fields_outside_the_kind_rejected() {
        let err = SceneFile::from_str("[[nodes]]\nkind = \"rect\"\nr = 3\n")
            .unwrap()
            .into_document()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid rect geometry: `r` does not apply to this kind"
        );
        let node = NodeSpec {
            d: Some("M0 0".into()),
            ..minimal(NodeKind::Group)
        };
        assert!(node.into_node().is_err());
    }

    #[test]
    fn test_root_view_box_attribute() {
        let doc = SceneFile::from_str("attributes = { viewBox = \"0 0 5 5\" }")
            .unwrap()
            .into_document()
            .unwrap();
        assert_eq!(doc.view_box(), Some("0 0 5 5"));
        assert!(doc.root().core().attributes.is_empty());
    }

    #[test]
    fn test_negative_radius_rejected() {
        let node = NodeSpec {
            r: Some(-1.0),
            ..minimal(NodeKind::Circle)
        };
        assert!(node.into_node().is_err());
    }

    #[test]
    fn test_reserved_attribute_rejected() {
        let err = SceneFile::from_str("attributes = { children = 1 }")
            .unwrap()
            .into_document()
            .unwrap_err();
        assert!(matches!(err, SceneError::ReservedAttribute(_)));
    }

    #[test]
    fn test_unknown_fields_and_kinds_are_errors() {
        assert!(matches!(
            SceneFile::from_str("[[nodes]]\nkind = \"star\"\n"),
            Err(SceneError::Toml(_))
        ));
        assert!(matches!(
            SceneFile::from_str("[[nodes]]\nkind = \"rect\"\nwidht = 3\n"),
            Err(SceneError::Toml(_))
        ));
    }

    fn minimal(kind: NodeKind) -> NodeSpec {
        NodeSpec {
            kind,
            x: None,
            y: None,
            width: None,
            height: None,
            rx: None,
            ry: None,
            cx: None,
            cy: None,
            r: None,
            x1: None,
            y1: None,
            x2: None,
            y2: None,
            points: vec![],
            d: None,
            text: None,
            class: None,
            style: Style::default(),
            attributes: IndexMap::new(),
            transform: vec![],
            children: vec![],
        }
    }
}
