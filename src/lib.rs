//! Vector Scene - an SVG scene graph with transform folding
//!
//! Build documents in code through [`scene`], or describe them in TOML and
//! render them in one call.
//!
//! # Example
//!
//! ```rust
//! use vector_scene::render;
//!
//! let svg = render(r#"
//!     [[nodes]]
//!     kind = "rect"
//!     width = 10
//!     height = 10
//! "#).unwrap();
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains(r#"viewBox="0 0 10 10""#));
//! ```

pub mod error;
pub mod renderer;
pub mod scene;
pub mod scene_file;
pub mod stylesheet;

pub use error::SceneError;
pub use renderer::SvgConfig;
pub use scene::{Document, Node, SceneNode};
pub use scene_file::SceneFile;

// Re-export Stylesheet for public API
pub use stylesheet::{Stylesheet, StylesheetError};

use tracing::debug;

/// Configuration for the complete render pipeline
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Extra CSS rules merged over the scene's own
    pub stylesheet: Option<Stylesheet>,
    /// Fold translate/scale into coordinates before output
    pub resolve_transforms: bool,
    /// Derive the viewBox from content when the scene does not set one
    pub auto_resize: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            svg: SvgConfig::default(),
            stylesheet: None,
            resolve_transforms: true,
            auto_resize: true,
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Set extra CSS rules
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = Some(stylesheet);
        self
    }

    pub fn with_resolve_transforms(mut self, resolve: bool) -> Self {
        self.resolve_transforms = resolve;
        self
    }

    pub fn with_auto_resize(mut self, auto_resize: bool) -> Self {
        self.auto_resize = auto_resize;
        self
    }
}

/// Render a TOML scene description to SVG with default configuration
pub fn render(source: &str) -> Result<String, SceneError> {
    render_with_config(source, RenderConfig::default())
}

/// Render a TOML scene description to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use vector_scene::{render_with_config, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new()
///     .with_resolve_transforms(false)
///     .with_svg(SvgConfig::new().with_standalone(false));
///
/// let svg = render_with_config(r#"
///     [[nodes]]
///     kind = "circle"
///     r = 4
///     transform = [{ translate = [2] }]
/// "#, config).unwrap();
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.contains(r#"transform="translate(2, 2)""#));
/// ```
pub fn render_with_config(source: &str, config: RenderConfig) -> Result<String, SceneError> {
    let mut doc = SceneFile::from_str(source)?.into_document()?;
    prepare(&mut doc, &config);
    Ok(doc.to_svg_with(&config.svg))
}

/// Apply the configured stylesheet, transform resolution and auto-resize
/// to a document built in code
pub fn prepare(doc: &mut Document, config: &RenderConfig) {
    if let Some(extra) = &config.stylesheet {
        let mut merged = doc.root().stylesheet().cloned().unwrap_or_default();
        merged.extend(extra.clone());
        doc.set_stylesheet(merged);
    }

    if config.resolve_transforms {
        doc.resolve_transforms();
    }

    if config.auto_resize && doc.view_box().is_none() {
        doc.auto_resize();
    } else {
        debug!(view_box = ?doc.view_box(), "keeping viewBox");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SCENE: &str = r#"
        [[nodes]]
        kind = "rect"
        x = 10
        y = 10
        width = 30
        height = 20
        transform = [{ translate = [5] }, { rotate = [90] }]
    "#;

    #[test]
    fn test_render_resolves_and_resizes() {
        let svg = render(SCENE).unwrap();
        assert_eq!(
            svg,
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"15 15 30 20\">\n",
                "<rect x=\"15\" y=\"15\" width=\"30\" height=\"20\" transform=\"rotate(90)\"/>\n",
                "</svg>"
            )
        );
    }

    #[test]
    fn test_render_without_resolution_keeps_entries() {
        let config = RenderConfig::new()
            .with_resolve_transforms(false)
            .with_auto_resize(false);
        let svg = render_with_config(SCENE, config).unwrap();
        assert!(svg.contains(r#"transform="translate(5, 5) rotate(90)""#));
        assert!(!svg.contains("viewBox"));
    }

    #[test]
    fn test_explicit_view_box_wins() {
        let source = format!("view_box = \"0 0 1 1\"\n{}", SCENE);
        let svg = render(&source).unwrap();
        assert!(svg.contains(r#"viewBox="0 0 1 1""#));
    }

    #[test]
    fn test_stylesheet_merged_over_scene_rules() {
        let source = r#"
            [stylesheet.".a"]
            fill = "red"
            stroke = "black"
        "#;
        let mut extra = Stylesheet::new();
        extra.rule(".a", "fill", "blue");
        let svg = render_with_config(source, RenderConfig::new().with_stylesheet(extra)).unwrap();
        assert!(svg.contains(".a { fill: blue; stroke: black; }"));
    }

    #[test]
    fn test_render_error() {
        let err = render("[[nodes]]\nkind = \"rect\"\ntransform = [{ scale = [] }]").unwrap_err();
        assert!(matches!(err, SceneError::TransformArity { op: "scale", .. }));
    }
}
