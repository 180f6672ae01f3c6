//! Concrete leaf shapes
//!
//! Each shape carries its own geometry, bounding-box formula and, when it
//! has extent, its own rule for folding translate/scale into that geometry.

use crate::error::SceneError;
use crate::renderer::SvgWriter;

use super::geometry::{BoundingBox, Point};
use super::node::{numeric_attr, NodeCore, SceneNode};
use super::transform::Transform;
use super::value::AttrValue;

/// Font size assumed for text boxes when the style has no numeric one
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Write a geometry attribute unless it is zero (zero is the SVG default)
fn write_dimension(w: &mut SvgWriter, name: &str, value: f64) {
    if value != 0.0 && !value.is_nan() {
        w.attr(name, value);
    }
}

fn ensure_non_negative(tag: &'static str, name: &str, value: f64) -> Result<(), SceneError> {
    if value < 0.0 {
        return Err(SceneError::invalid_geometry(
            tag,
            format!("{} must not be negative (got {})", name, value),
        ));
    }
    Ok(())
}

macro_rules! node_core_accessors {
    () => {
        fn core(&self) -> &NodeCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut NodeCore {
            &mut self.core
        }
    };
}

/// `<rect>`: position, size and corner radii
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    core: NodeCore,
    pub width: f64,
    pub height: f64,
    pub rx: f64,
    pub ry: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            core: NodeCore::at(x, y),
            width,
            height,
            rx: 0.0,
            ry: 0.0,
        }
    }

    /// Set corner radii
    pub fn rounded(mut self, rx: f64, ry: f64) -> Self {
        self.rx = rx;
        self.ry = ry;
        self
    }

    /// Reject negative sizes and radii
    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_non_negative("rect", "width", self.width)?;
        ensure_non_negative("rect", "height", self.height)?;
        ensure_non_negative("rect", "rx", self.rx)?;
        ensure_non_negative("rect", "ry", self.ry)
    }
}

impl SceneNode for Rect {
    fn tag(&self) -> &'static str {
        "rect"
    }

    node_core_accessors!();

    fn get_box(&self) -> BoundingBox {
        let p = self.core.position();
        BoundingBox::new(p.x, p.y, p.x + self.width, p.y + self.height)
    }

    fn fold(&mut self, foldable: &[Transform]) {
        for t in foldable {
            self.core.fold_position(t);
            if let Some((sx, sy)) = t.scale_factors() {
                self.width *= sx;
                self.height *= sy;
                self.rx *= sx;
                self.ry *= sy;
            }
        }
    }

    fn set_geometry(&mut self, name: &str, value: &AttrValue) -> Result<bool, SceneError> {
        let slot = match name {
            "width" => &mut self.width,
            "height" => &mut self.height,
            "rx" => &mut self.rx,
            "ry" => &mut self.ry,
            _ => return Ok(false),
        };
        *slot = numeric_attr("rect", name, value)?;
        Ok(true)
    }

    fn write_geometry(&self, w: &mut SvgWriter) {
        write_dimension(w, "width", self.width);
        write_dimension(w, "height", self.height);
        write_dimension(w, "rx", self.rx);
        write_dimension(w, "ry", self.ry);
    }
}

/// `<circle>`: center and radius
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    core: NodeCore,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Self {
            core: NodeCore::new(),
            cx,
            cy,
            r,
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_non_negative("circle", "r", self.r)
    }
}

impl SceneNode for Circle {
    fn tag(&self) -> &'static str {
        "circle"
    }

    node_core_accessors!();

    fn get_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.cx - self.r,
            self.cy - self.r,
            self.cx + self.r,
            self.cy + self.r,
        )
    }

    fn fold(&mut self, foldable: &[Transform]) {
        for t in foldable {
            self.core.fold_explicit_position(t);
            let center = t.fold_point(Point::new(self.cx, self.cy));
            self.cx = center.x;
            self.cy = center.y;
            // A circle stays a circle: non-uniform scales keep its area
            if let Some((sx, sy)) = t.scale_factors() {
                self.r *= (sx * sy).abs().sqrt();
            }
        }
    }

    fn set_geometry(&mut self, name: &str, value: &AttrValue) -> Result<bool, SceneError> {
        let slot = match name {
            "cx" => &mut self.cx,
            "cy" => &mut self.cy,
            "r" => &mut self.r,
            _ => return Ok(false),
        };
        *slot = numeric_attr("circle", name, value)?;
        Ok(true)
    }

    fn write_geometry(&self, w: &mut SvgWriter) {
        write_dimension(w, "cx", self.cx);
        write_dimension(w, "cy", self.cy);
        write_dimension(w, "r", self.r);
    }
}

/// `<ellipse>`: center and two radii
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    core: NodeCore,
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

impl Ellipse {
    pub fn new(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        Self {
            core: NodeCore::new(),
            cx,
            cy,
            rx,
            ry,
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        ensure_non_negative("ellipse", "rx", self.rx)?;
        ensure_non_negative("ellipse", "ry", self.ry)
    }
}

impl SceneNode for Ellipse {
    fn tag(&self) -> &'static str {
        "ellipse"
    }

    node_core_accessors!();

    fn get_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.cx - self.rx,
            self.cy - self.ry,
            self.cx + self.rx,
            self.cy + self.ry,
        )
    }

    fn fold(&mut self, foldable: &[Transform]) {
        for t in foldable {
            self.core.fold_explicit_position(t);
            let center = t.fold_point(Point::new(self.cx, self.cy));
            self.cx = center.x;
            self.cy = center.y;
            if let Some((sx, sy)) = t.scale_factors() {
                self.rx *= sx.abs();
                self.ry *= sy.abs();
            }
        }
    }

    fn set_geometry(&mut self, name: &str, value: &AttrValue) -> Result<bool, SceneError> {
        let slot = match name {
            "cx" => &mut self.cx,
            "cy" => &mut self.cy,
            "rx" => &mut self.rx,
            "ry" => &mut self.ry,
            _ => return Ok(false),
        };
        *slot = numeric_attr("ellipse", name, value)?;
        Ok(true)
    }

    fn write_geometry(&self, w: &mut SvgWriter) {
        write_dimension(w, "cx", self.cx);
        write_dimension(w, "cy", self.cy);
        write_dimension(w, "rx", self.rx);
        write_dimension(w, "ry", self.ry);
    }
}

/// `<line>`: two endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    core: NodeCore,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Line {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            core: NodeCore::new(),
            x1,
            y1,
            x2,
            y2,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

impl SceneNode for Line {
    fn tag(&self) -> &'static str {
        "line"
    }

    node_core_accessors!();

    fn get_box(&self) -> BoundingBox {
        BoundingBox::at(self.start()).expand_to_include(self.end())
    }

    fn fold(&mut self, foldable: &[Transform]) {
        for t in foldable {
            self.core.fold_explicit_position(t);
            let start = t.fold_point(self.start());
            let end = t.fold_point(self.end());
            self.x1 = start.x;
            self.y1 = start.y;
            self.x2 = end.x;
            self.y2 = end.y;
        }
    }

    fn set_geometry(&mut self, name: &str, value: &AttrValue) -> Result<bool, SceneError> {
        let slot = match name {
            "x1" => &mut self.x1,
            "y1" => &mut self.y1,
            "x2" => &mut self.x2,
            "y2" => &mut self.y2,
            _ => return Ok(false),
        };
        *slot = numeric_attr("line", name, value)?;
        Ok(true)
    }

    fn write_geometry(&self, w: &mut SvgWriter) {
        write_dimension(w, "x1", self.x1);
        write_dimension(w, "y1", self.y1);
        write_dimension(w, "x2", self.x2);
        write_dimension(w, "y2", self.y2);
    }
}

fn points_box(core: &NodeCore, points: &[Point]) -> BoundingBox {
    BoundingBox::enclosing(points.iter().copied()).unwrap_or_else(|| core.position_box())
}

fn fold_points(core: &mut NodeCore, points: &mut [Point], foldable: &[Transform]) {
    for t in foldable {
        core.fold_explicit_position(t);
        for p in points.iter_mut() {
            *p = t.fold_point(*p);
        }
    }
}

/// Read a `points` value written as `x,y x,y ...`
fn parse_points(tag: &'static str, value: &AttrValue) -> Result<Vec<Point>, SceneError> {
    let text = value.to_string();
    let coords = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| {
            SceneError::invalid_geometry(tag, format!("points must be numbers (got '{}')", text))
        })?;
    if coords.len() % 2 != 0 {
        return Err(SceneError::invalid_geometry(
            tag,
            format!("points need x,y pairs (got {} coordinates)", coords.len()),
        ));
    }
    Ok(coords
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect())
}

fn write_points(w: &mut SvgWriter, points: &[Point]) {
    if points.is_empty() {
        return;
    }
    let list = points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    w.attr("points", list);
}

/// `<polygon>`: closed outline through a list of points
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    core: NodeCore,
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new<I, P>(points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        Self {
            core: NodeCore::new(),
            points: points.into_iter().map(Into::into).collect(),
        }
    }
}

impl SceneNode for Polygon {
    fn tag(&self) -> &'static str {
        "polygon"
    }

    node_core_accessors!();

    fn get_box(&self) -> BoundingBox {
        points_box(&self.core, &self.points)
    }

    fn fold(&mut self, foldable: &[Transform]) {
        fold_points(&mut self.core, &mut self.points, foldable);
    }

    fn set_geometry(&mut self, name: &str, value: &AttrValue) -> Result<bool, SceneError> {
        if name != "points" {
            return Ok(false);
        }
        self.points = parse_points("polygon", value)?;
        Ok(true)
    }

    fn write_geometry(&self, w: &mut SvgWriter) {
        write_points(w, &self.points);
    }
}

/// `<polyline>`: open outline through a list of points
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    core: NodeCore,
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn new<I, P>(points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Point>,
    {
        Self {
            core: NodeCore::new(),
            points: points.into_iter().map(Into::into).collect(),
        }
    }
}

impl SceneNode for Polyline {
    fn tag(&self) -> &'static str {
        "polyline"
    }

    node_core_accessors!();

    fn get_box(&self) -> BoundingBox {
        points_box(&self.core, &self.points)
    }

    fn fold(&mut self, foldable: &[Transform]) {
        fold_points(&mut self.core, &mut self.points, foldable);
    }

    fn set_geometry(&mut self, name: &str, value: &AttrValue) -> Result<bool, SceneError> {
        if name != "points" {
            return Ok(false);
        }
        self.points = parse_points("polyline", value)?;
        Ok(true)
    }

    fn write_geometry(&self, w: &mut SvgWriter) {
        write_points(w, &self.points);
    }
}

/// `<path>` with an opaque path description
///
/// The `d` string is never interpreted: the box is the position box and
/// translate/scale fold into `x`/`y` only.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    core: NodeCore,
    pub d: String,
}

impl Path {
    pub fn new(d: impl Into<String>) -> Self {
        Self {
            core: NodeCore::new(),
            d: d.into(),
        }
    }
}

impl SceneNode for Path {
    fn tag(&self) -> &'static str {
        "path"
    }

    node_core_accessors!();

    fn set_geometry(&mut self, name: &str, value: &AttrValue) -> Result<bool, SceneError> {
        if name != "d" {
            return Ok(false);
        }
        self.d = value.to_string();
        Ok(true)
    }

    fn write_geometry(&self, w: &mut SvgWriter) {
        if !self.d.is_empty() {
            w.attr("d", &self.d);
        }
    }
}

/// `<text>` with a string payload anchored at `(x, y)`
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    core: NodeCore,
    pub text: String,
}

impl Text {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            core: NodeCore::at(x, y),
            text: text.into(),
        }
    }

    /// Font size from the style, or [`DEFAULT_FONT_SIZE`]
    pub fn font_size(&self) -> f64 {
        self.core.style.font_size().unwrap_or(DEFAULT_FONT_SIZE)
    }

    fn anchored_at_end(&self) -> bool {
        self.core
            .attributes
            .get("text-anchor")
            .and_then(|v| v.as_str())
            == Some("end")
    }
}

impl SceneNode for Text {
    fn tag(&self) -> &'static str {
        "text"
    }

    node_core_accessors!();

    /// Estimated from glyph count: each glyph is half the font size wide
    /// (rounded down), and the box extends up from the baseline by the
    /// font size
    fn get_box(&self) -> BoundingBox {
        let size = self.font_size();
        let width = self.text.chars().count() as f64 * (size / 2.0).floor();
        let p = self.core.position();
        if self.anchored_at_end() {
            BoundingBox::new(p.x - width, p.y - size, p.x, p.y)
        } else {
            BoundingBox::new(p.x, p.y - size, p.x + width, p.y)
        }
    }

    fn write_svg(&self, w: &mut SvgWriter) {
        w.open_tag(self.tag());
        self.core.write_position(w);
        self.core.write_trailer(w);
        w.close_start();
        w.text(&self.text);
        w.end_tag(self.tag());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rect_box_and_output() {
        let rect = Rect::new(10.0, 10.0, 30.0, 20.0);
        assert_eq!(rect.get_box().to_array(), [10.0, 10.0, 40.0, 30.0]);
        assert_eq!(
            rect.to_svg(),
            r#"<rect x="10" y="10" width="30" height="20"/>"#
        );
    }

    #[test]
    fn test_rect_scale_grows_extent() {
        let mut rect = Rect::new(1.0, 2.0, 10.0, 4.0).rounded(1.0, 1.0);
        rect.translate(1.0, None)
            .unwrap()
            .scale(2.0, Some(3.0))
            .unwrap()
            .apply_transform();
        assert_eq!(rect.get_box().to_array(), [4.0, 9.0, 24.0, 21.0]);
        assert_eq!((rect.rx, rect.ry), (2.0, 3.0));
        assert_eq!(
            rect.to_svg(),
            r#"<rect x="4" y="9" width="20" height="12" rx="2" ry="3"/>"#
        );
    }

    #[test]
    fn test_rect_rotation_with_pivot() {
        let mut rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        rect.rotate(45.0, Some(5.0), Some(5.0))
            .unwrap()
            .translate(2.0, None)
            .unwrap()
            .apply_transform();
        assert_eq!(
            rect.to_svg(),
            r#"<rect x="2" y="2" width="10" height="10" transform="rotate(45, 5, 5)"/>"#
        );
    }

    #[test]
    fn test_circle_box_and_fold() {
        let mut circle = Circle::new(20.0, 20.0, 5.0);
        assert_eq!(circle.get_box().to_array(), [15.0, 15.0, 25.0, 25.0]);
        circle
            .translate(-20.0, None)
            .unwrap()
            .scale(2.0, None)
            .unwrap()
            .apply_transform();
        assert_eq!((circle.cx, circle.cy, circle.r), (0.0, 0.0, 10.0));
        assert_eq!(circle.to_svg(), r#"<circle r="10"/>"#);
    }

    #[test]
    fn test_circle_non_uniform_scale_keeps_area() {
        let mut circle = Circle::new(0.0, 0.0, 3.0);
        circle.scale(4.0, Some(1.0)).unwrap().apply_transform();
        assert_eq!(circle.r, 6.0);
    }

    #[test]
    fn test_ellipse_fold() {
        let mut ellipse = Ellipse::new(5.0, 5.0, 2.0, 1.0);
        ellipse.scale(2.0, Some(-3.0)).unwrap().apply_transform();
        assert_eq!((ellipse.cx, ellipse.cy), (10.0, -15.0));
        assert_eq!((ellipse.rx, ellipse.ry), (4.0, 3.0));
        assert_eq!(ellipse.get_box().to_array(), [6.0, -18.0, 14.0, -12.0]);
    }

    #[test]
    fn test_line_box_orders_endpoints() {
        let line = Line::new(10.0, 0.0, 2.0, 8.0);
        assert_eq!(line.get_box().to_array(), [2.0, 0.0, 10.0, 8.0]);
    }

    #[test]
    fn test_line_fold_moves_both_endpoints() {
        let mut line = Line::new(0.0, 0.0, 10.0, 5.0);
        line.translate(1.0, Some(2.0))
            .unwrap()
            .scale(2.0, None)
            .unwrap()
            .apply_transform();
        assert_eq!(line.start(), Point::new(2.0, 4.0));
        assert_eq!(line.end(), Point::new(22.0, 14.0));
        assert_eq!(line.to_svg(), r#"<line x1="2" y1="4" x2="22" y2="14"/>"#);
    }

    #[test]
    fn test_polygon_points_and_box() {
        let mut poly = Polygon::new([(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)]);
        assert_eq!(poly.get_box().to_array(), [0.0, 0.0, 10.0, 8.0]);
        poly.translate(1.0, None).unwrap().apply_transform();
        assert_eq!(poly.to_svg(), r#"<polygon points="1,1 11,1 6,9"/>"#);
    }

    #[test]
    fn test_empty_polyline_falls_back_to_position_box() {
        let line = Polyline::new(Vec::<Point>::new());
        assert_eq!(line.get_box().to_array(), [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(line.to_svg(), "<polyline/>");
    }

    #[test]
    fn test_path_is_opaque() {
        let mut path = Path::new("M0 0 L10 10");
        assert_eq!(path.get_box().to_array(), [0.0, 0.0, 0.0, 0.0]);
        path.translate(3.0, None).unwrap().apply_transform();
        assert_eq!(path.to_svg(), r#"<path x="3" y="3" d="M0 0 L10 10"/>"#);
    }

    #[test]
    fn test_text_box_default_font_size() {
        let text = Text::new("Hello", 10.0, 50.0);
        assert_eq!(text.get_box().to_array(), [10.0, 38.0, 40.0, 50.0]);
    }

    #[test]
    fn test_text_box_uses_numeric_font_size() {
        let text = Text::new("abc", 0.0, 20.0).with_style("font-size", 15);
        assert_eq!(text.get_box().to_array(), [0.0, 5.0, 21.0, 20.0]);
    }

    #[test]
    fn test_text_box_end_anchor_extends_left() {
        let text = Text::new("abcd", 100.0, 20.0)
            .with_attr("text-anchor", "end")
            .unwrap();
        assert_eq!(text.get_box().to_array(), [76.0, 8.0, 100.0, 20.0]);
    }

    #[test]
    fn test_text_serializes_escaped_payload() {
        let text = Text::new("a < b", 1.0, 2.0).with_style("font_size", 14);
        assert_eq!(
            text.to_svg(),
            r#"<text x="1" y="2" style="font-size: 14;">a &lt; b</text>"#
        );
    }

    #[test]
    fn test_validation_is_opt_in() {
        let rect = Rect::new(0.0, 0.0, -5.0, 10.0);
        assert_eq!(
            rect.to_svg(),
            r#"<rect width="-5" height="10"/>"#,
            "negative sizes still serialize"
        );
        let err = rect.validate().unwrap_err();
        assert!(err.to_string().contains("width must not be negative"));
        assert!(Circle::new(0.0, 0.0, -1.0).validate().is_err());
        assert!(Ellipse::new(0.0, 0.0, 1.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_set_attr_routes_geometry() {
        let mut rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        rect.set_attr("width", 30).unwrap().set_attr("id", "r").unwrap();
        assert_eq!(rect.width, 30.0);
        assert_eq!(rect.to_svg(), r#"<rect width="30" height="1" id="r"/>"#);
    }

    #[test]
    fn test_geometry_names_never_reach_the_bag() {
        let mut rect = Rect::new(5.0, 0.0, 10.0, 10.0);
        rect.set_attr("x", "10").unwrap().set_attr("height", "4").unwrap();
        assert!(matches!(
            rect.set_attr("width", "50%"),
            Err(SceneError::InvalidGeometry { tag: "rect", .. })
        ));
        assert!(rect.core().attributes.is_empty());
        assert_eq!(rect.to_svg(), r#"<rect x="10" width="10" height="4"/>"#);
    }

    #[test]
    fn test_path_d_replaces_description() {
        let path = Path::new("M0 0").with_attr("d", "M1 1").unwrap();
        assert_eq!(path.to_svg(), r#"<path d="M1 1"/>"#);
    }

    #[test]
    fn test_points_attribute_is_parsed() {
        let mut poly = Polygon::new([(0.0, 0.0)]);
        poly.set_attr("points", "1,2 3,4 5 6").unwrap();
        assert_eq!(poly.get_box().to_array(), [1.0, 2.0, 5.0, 6.0]);
        assert_eq!(poly.to_svg(), r#"<polygon points="1,2 3,4 5,6"/>"#);

        let mut line = Polyline::new(Vec::<Point>::new());
        assert!(line.set_attr("points", "1,2 3").is_err());
        assert!(line.set_attr("points", "a,b").is_err());
        assert_eq!(line.to_svg(), "<polyline/>");
    }
}
