//! State shared by every node and the contract all nodes implement

use tracing::trace;

use crate::error::SceneError;
use crate::renderer::SvgWriter;

use super::attributes::Attributes;
use super::geometry::{BoundingBox, Point};
use super::style::Style;
use super::transform::{Transform, TransformList, DEFAULT_ROTATION};
use super::value::AttrValue;

/// Non-owning link from a child to the group that holds it
///
/// Records the child's slot in its parent's child list. Nothing in
/// serialization or resolution reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    index: usize,
}

impl ParentLink {
    pub(crate) fn new(index: usize) -> Self {
        Self { index }
    }

    /// Position of the child within its parent's children
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Position, style, class, transforms and free-form attributes of a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeCore {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub style: Style,
    pub class_name: Option<String>,
    pub transform: TransformList,
    pub attributes: Attributes,
    parent: Option<ParentLink>,
}

impl NodeCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Core with an explicit position
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Position with absent coordinates read as 0
    pub fn position(&self) -> Point {
        Point::new(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }

    pub fn set_position(&mut self, point: Point) {
        self.x = Some(point.x);
        self.y = Some(point.y);
    }

    pub fn has_position(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }

    pub fn parent(&self) -> Option<ParentLink> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, link: ParentLink) {
        self.parent = Some(link);
    }

    /// Fold one entry into the position; absent coordinates start at 0
    pub fn fold_position(&mut self, transform: &Transform) {
        let folded = transform.fold_point(self.position());
        self.set_position(folded);
    }

    /// Fold one entry into the position only if one was set explicitly
    ///
    /// Shapes anchored by their own geometry (`cx`/`cy`, endpoints, points)
    /// use this so an unused `x`/`y` does not appear in the output.
    pub fn fold_explicit_position(&mut self, transform: &Transform) {
        if self.has_position() {
            self.fold_position(transform);
        }
    }

    /// Zero-area box at the node's position
    pub fn position_box(&self) -> BoundingBox {
        BoundingBox::at(self.position())
    }

    pub(crate) fn write_position(&self, w: &mut SvgWriter) {
        for (name, value) in [("x", self.x), ("y", self.y)] {
            if let Some(v) = value.filter(|v| *v != 0.0 && !v.is_nan()) {
                w.attr(name, v);
            }
        }
    }

    /// Attribute bag, class, remaining transforms, then the style fragment
    pub(crate) fn write_trailer(&self, w: &mut SvgWriter) {
        self.attributes.write(w);
        if let Some(class) = self.class_name.as_deref().filter(|c| !c.is_empty()) {
            w.attr("class", class);
        }
        if !self.transform.is_empty() {
            w.attr("transform", &self.transform);
        }
        w.raw(&self.style.serialize());
    }
}

/// Read a typed coordinate or size from an attribute value
///
/// Numbers and numeric strings are accepted; anything else (`"50%"`,
/// `"auto"`, NaN) is rejected.
pub(crate) fn numeric_attr(
    tag: &'static str,
    name: &str,
    value: &AttrValue,
) -> Result<f64, SceneError> {
    value
        .as_number()
        .filter(|n| n.is_finite())
        .ok_or_else(|| {
            let reason = format!("{} must be a number (got '{}')", name, value);
            SceneError::invalid_geometry(tag, reason)
        })
}

/// Behaviour every scene-graph node provides
///
/// Implementors supply their tag, access to the [`NodeCore`], and whatever
/// geometry-specific pieces differ from the defaults: the bounding box, how
/// translate/scale entries fold into the geometry, and which geometry
/// attributes to write.
pub trait SceneNode {
    /// SVG tag name
    fn tag(&self) -> &'static str;

    fn core(&self) -> &NodeCore;

    fn core_mut(&mut self) -> &mut NodeCore;

    /// `[min_x, min_y, max_x, max_y]` in the node's resolved coordinates
    fn get_box(&self) -> BoundingBox {
        self.core().position_box()
    }

    /// Fold translate/scale entries (already removed from the transform
    /// list) into the node's coordinates, in order
    fn fold(&mut self, foldable: &[Transform]) {
        let core = self.core_mut();
        for t in foldable {
            core.fold_position(t);
        }
    }

    /// Resolve queued translate/scale entries into coordinates, keeping only
    /// rotations. Calling it again with no new entries changes nothing.
    fn resolve_transforms(&mut self) {
        let foldable = self.core_mut().transform.take_foldable();
        if foldable.is_empty() {
            return;
        }
        trace!(tag = self.tag(), entries = foldable.len(), "folding transforms");
        self.fold(&foldable);
    }

    /// Route an attribute to typed geometry; `Ok(false)` when the name is
    /// not part of this node's geometry
    fn set_geometry(&mut self, _name: &str, _value: &AttrValue) -> Result<bool, SceneError> {
        Ok(false)
    }

    /// Write geometry attributes between the position and the attribute bag
    fn write_geometry(&self, _w: &mut SvgWriter) {}

    /// Write the full element
    fn write_svg(&self, w: &mut SvgWriter) {
        w.open_tag(self.tag());
        self.core().write_position(w);
        self.write_geometry(w);
        self.core().write_trailer(w);
        w.close_empty();
    }

    /// Serialize this node (and its subtree) with default settings
    fn to_svg(&self) -> String {
        let mut w = SvgWriter::new(Default::default());
        self.write_svg(&mut w);
        w.finish()
    }

    /// Queue a translation; `ty` defaults to `tx`
    fn translate(&mut self, tx: f64, ty: Option<f64>) -> Result<&mut Self, SceneError>
    where
        Self: Sized,
    {
        self.core_mut().transform.push(Transform::translate(tx, ty)?);
        Ok(self)
    }

    /// Queue a scale; `sy` defaults to `sx`
    fn scale(&mut self, sx: f64, sy: Option<f64>) -> Result<&mut Self, SceneError>
    where
        Self: Sized,
    {
        self.core_mut().transform.push(Transform::scale(sx, sy)?);
        Ok(self)
    }

    /// Queue a rotation; a pivot is kept only when both `cx` and `cy` are given
    fn rotate(
        &mut self,
        angle: f64,
        cx: Option<f64>,
        cy: Option<f64>,
    ) -> Result<&mut Self, SceneError>
    where
        Self: Sized,
    {
        self.core_mut()
            .transform
            .push(Transform::rotate(angle, cx, cy)?);
        Ok(self)
    }

    /// Queue the default half-turn rotation
    fn rotate_half_turn(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.core_mut().transform.push(Transform::Rotate {
            angle: DEFAULT_ROTATION,
            center: None,
        });
        self
    }

    /// Resolve transforms and return the node for further chaining
    fn apply_transform(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.resolve_transforms();
        self
    }

    /// Set an attribute. `x`/`y` and the shape's own geometry names always
    /// go to their typed fields, so each is written exactly once; a value
    /// they cannot hold is an error. Everything else lands in the bag.
    fn set_attr(
        &mut self,
        name: &str,
        value: impl Into<AttrValue>,
    ) -> Result<&mut Self, SceneError>
    where
        Self: Sized,
    {
        let value = value.into();
        match name {
            "x" | "y" => {
                let n = numeric_attr(self.tag(), name, &value)?;
                let core = self.core_mut();
                if name == "x" {
                    core.x = Some(n);
                } else {
                    core.y = Some(n);
                }
            }
            _ => {
                if !self.set_geometry(name, &value)? {
                    self.core_mut().attributes.set(name, value)?;
                }
            }
        }
        Ok(self)
    }

    fn set_style(&mut self, property: &str, value: impl Into<AttrValue>) -> &mut Self
    where
        Self: Sized,
    {
        self.core_mut().style.set(property, value);
        self
    }

    fn set_class(&mut self, class_name: impl Into<String>) -> &mut Self
    where
        Self: Sized,
    {
        self.core_mut().class_name = Some(class_name.into());
        self
    }

    /// Builder form of [`SceneNode::set_attr`]
    fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Result<Self, SceneError>
    where
        Self: Sized,
    {
        self.set_attr(name, value)?;
        Ok(self)
    }

    /// Builder form of [`SceneNode::set_style`]
    fn with_style(mut self, property: &str, value: impl Into<AttrValue>) -> Self
    where
        Self: Sized,
    {
        self.set_style(property, value);
        self
    }

    /// Builder form of [`SceneNode::set_class`]
    fn with_class(mut self, class_name: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.set_class(class_name);
        self
    }
}
