//! Containers of child nodes

use tracing::trace;

use crate::renderer::svg::css_block;
use crate::renderer::SvgWriter;
use crate::stylesheet::Stylesheet;

use super::geometry::BoundingBox;
use super::node::{NodeCore, ParentLink, SceneNode};
use super::transform::Transform;
use super::Node;

/// `<g>`: an ordered list of children, rendered in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Group {
    core: NodeCore,
    children: Vec<Node>,
    stylesheet: Option<Stylesheet>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group with an explicit position
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            core: NodeCore::at(x, y),
            ..Self::default()
        }
    }

    /// Append a child and link it back to this group
    pub fn add(&mut self, node: impl Into<Node>) -> &mut Self {
        let mut node = node.into();
        node.core_mut().set_parent(ParentLink::new(self.children.len()));
        self.children.push(node);
        self
    }

    /// Builder form of [`Group::add`]
    pub fn with_child(mut self, node: impl Into<Node>) -> Self {
        self.add(node);
        self
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn stylesheet(&self) -> Option<&Stylesheet> {
        self.stylesheet.as_ref()
    }

    /// Embed CSS rules right after the opening tag
    pub fn set_stylesheet(&mut self, stylesheet: Stylesheet) -> &mut Self {
        self.stylesheet = Some(stylesheet);
        self
    }

    /// Open tag, CSS block, one child per line, close tag
    ///
    /// `lead` writes attributes that precede the node's own (the document
    /// uses it for `xmlns` and `viewBox`).
    pub(crate) fn write_with(
        &self,
        w: &mut SvgWriter,
        tag: &str,
        lead: impl FnOnce(&mut SvgWriter),
    ) {
        w.open_tag(tag);
        lead(w);
        self.core.write_position(w);
        self.core.write_trailer(w);
        w.close_start();

        w.descend();
        if let Some(css) = self
            .stylesheet
            .as_ref()
            .map(Stylesheet::to_css)
            .filter(|css| !css.is_empty())
        {
            w.line_break();
            w.raw(&css_block(&css));
        }
        for child in &self.children {
            w.line_break();
            child.write_svg(w);
        }
        w.ascend();

        w.line_break();
        w.end_tag(tag);
    }
}

impl SceneNode for Group {
    fn tag(&self) -> &'static str {
        "g"
    }

    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut NodeCore {
        &mut self.core
    }

    /// Union of the children's boxes, extended (never shrunk) by the
    /// group's own footprint when it carries a non-zero `x`/`y` and
    /// optional `width`/`height` attributes
    fn get_box(&self) -> BoundingBox {
        let Some(mut bound) = self
            .children
            .iter()
            .map(SceneNode::get_box)
            .reduce(|a, b| a.union(&b))
        else {
            return self.core.position_box();
        };

        if let Some(x) = self.core.x.filter(|x| *x != 0.0) {
            bound.min_x = bound.min_x.min(x);
            if let Some(width) = self.core.attributes.number("width") {
                bound.max_x = bound.max_x.max(x + width);
            }
        }
        if let Some(y) = self.core.y.filter(|y| *y != 0.0) {
            bound.min_y = bound.min_y.min(y);
            if let Some(height) = self.core.attributes.number("height") {
                bound.max_y = bound.max_y.max(y + height);
            }
        }
        bound
    }

    /// Push own translate/scale entries down to every child and resolve
    /// the children first, then fold them into the group's own position
    fn resolve_transforms(&mut self) {
        let foldable = self.core.transform.take_foldable();
        trace!(
            children = self.children.len(),
            entries = foldable.len(),
            "propagating group transforms"
        );
        for child in &mut self.children {
            child.core_mut().transform.extend(foldable.iter().copied());
            child.resolve_transforms();
        }
        self.fold(&foldable);
    }

    /// A group only moves itself when it was given a position; otherwise
    /// its children carry the shift
    fn fold(&mut self, foldable: &[Transform]) {
        for t in foldable {
            self.core.fold_explicit_position(t);
        }
    }

    fn write_svg(&self, w: &mut SvgWriter) {
        self.write_with(w, self.tag(), |_| {});
    }
}
