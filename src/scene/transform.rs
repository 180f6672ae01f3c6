//! Transform entries and their two-pass resolution.
//!
//! A node queues transforms in call order. Resolution happens in two passes:
//!
//! 1. **Fold**: translate and scale entries are applied, in sequence, to the
//!    node's own coordinates. Each entry sees the coordinates left by the
//!    previous one.
//! 2. **Emit**: whatever remains (rotations only) is written out as the
//!    node's `transform` attribute.
//!
//! Rotations never fold. Turning a rotation into a coordinate shift needs a
//! pivot, and the positional model has nowhere to keep one.

use std::fmt;

use crate::error::SceneError;

use super::geometry::Point;

/// A queued translate, scale or rotate operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translate { tx: f64, ty: f64 },
    Scale { sx: f64, sy: f64 },
    /// Angle in degrees (clockwise positive, SVG convention), with an
    /// optional pivot
    Rotate {
        angle: f64,
        center: Option<(f64, f64)>,
    },
}

/// Angle used when a rotation is requested without one
pub const DEFAULT_ROTATION: f64 = 180.0;

fn finite(op: &'static str, arg: &'static str, value: f64) -> Result<f64, SceneError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::InvalidTransform { op, arg, value })
    }
}

impl Transform {
    /// Translation; `ty` defaults to `tx`
    pub fn translate(tx: f64, ty: Option<f64>) -> Result<Self, SceneError> {
        let tx = finite("translate", "tx", tx)?;
        let ty = finite("translate", "ty", ty.unwrap_or(tx))?;
        Ok(Transform::Translate { tx, ty })
    }

    /// Scale; `sy` defaults to `sx`
    pub fn scale(sx: f64, sy: Option<f64>) -> Result<Self, SceneError> {
        let sx = finite("scale", "sx", sx)?;
        let sy = finite("scale", "sy", sy.unwrap_or(sx))?;
        Ok(Transform::Scale { sx, sy })
    }

    /// Rotation; the pivot is kept only when both `cx` and `cy` are given
    pub fn rotate(angle: f64, cx: Option<f64>, cy: Option<f64>) -> Result<Self, SceneError> {
        let angle = finite("rotate", "angle", angle)?;
        let center = match (cx, cy) {
            (Some(cx), Some(cy)) => Some((
                finite("rotate", "cx", cx)?,
                finite("rotate", "cy", cy)?,
            )),
            _ => None,
        };
        Ok(Transform::Rotate { angle, center })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Translate { .. } => "translate",
            Transform::Scale { .. } => "scale",
            Transform::Rotate { .. } => "rotate",
        }
    }

    /// Whether the entry can be folded into coordinates
    pub fn is_foldable(&self) -> bool {
        !matches!(self, Transform::Rotate { .. })
    }

    /// Scale factors, for shapes whose extents grow with the scale
    pub fn scale_factors(&self) -> Option<(f64, f64)> {
        match *self {
            Transform::Scale { sx, sy } => Some((sx, sy)),
            _ => None,
        }
    }

    /// Apply a foldable entry to a point; rotations leave it untouched
    pub fn fold_point(&self, point: Point) -> Point {
        match *self {
            Transform::Translate { tx, ty } => Point::new(point.x + tx, point.y + ty),
            Transform::Scale { sx, sy } => Point::new(point.x * sx, point.y * sy),
            Transform::Rotate { .. } => point,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Transform::Translate { tx, ty } => write!(f, "translate({}, {})", tx, ty),
            Transform::Scale { sx, sy } => write!(f, "scale({}, {})", sx, sy),
            Transform::Rotate {
                angle,
                center: Some((cx, cy)),
            } => write!(f, "rotate({}, {}, {})", angle, cx, cy),
            Transform::Rotate { angle, center: None } => write!(f, "rotate({})", angle),
        }
    }
}

/// Ordered transform entries owned by a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformList(Vec<Transform>);

impl TransformList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, transform: Transform) {
        self.0.push(transform);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transform> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Transform] {
        &self.0
    }

    /// Remove the translate and scale entries, in order, leaving only the
    /// rotations behind
    pub fn take_foldable(&mut self) -> Vec<Transform> {
        let (foldable, kept): (Vec<_>, Vec<_>) =
            self.0.drain(..).partition(Transform::is_foldable);
        self.0 = kept;
        foldable
    }
}

impl Extend<Transform> for TransformList {
    fn extend<I: IntoIterator<Item = Transform>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<Transform> for TransformList {
    fn from_iter<I: IntoIterator<Item = Transform>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TransformList {
    type Item = &'a Transform;
    type IntoIter = std::slice::Iter<'a, Transform>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for TransformList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", t)?;
        }
        Ok(())
    }
}
