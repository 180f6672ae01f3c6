//! Low-level SVG text generation

use std::borrow::Cow;
use std::fmt::Display;

use super::SvgConfig;

/// First line of a standalone document
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Accumulates SVG markup for a tree of nodes
pub struct SvgWriter {
    config: SvgConfig,
    out: String,
    depth: usize,
}

impl SvgWriter {
    /// Create a new writer
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            out: String::new(),
            depth: 0,
        }
    }

    pub fn config(&self) -> &SvgConfig {
        &self.config
    }

    /// Write the XML declaration line if the configuration asks for it
    pub fn declaration(&mut self) {
        if self.config.standalone {
            self.out.push_str(XML_DECLARATION);
            self.out.push('\n');
        }
    }

    /// Start a tag: `<name`
    pub fn open_tag(&mut self, tag: &str) {
        self.out.push('<');
        self.out.push_str(tag);
    }

    /// Write ` name="value"` with the value XML-escaped
    pub fn attr(&mut self, name: &str, value: impl Display) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&escape_xml(&value.to_string()));
        self.out.push('"');
    }

    /// Write pre-rendered markup verbatim
    pub fn raw(&mut self, markup: &str) {
        self.out.push_str(markup);
    }

    /// Write character data, XML-escaped
    pub fn text(&mut self, content: &str) {
        self.out.push_str(&escape_xml(content));
    }

    /// Finish a tag with no content: `/>`
    pub fn close_empty(&mut self) {
        self.out.push_str("/>");
    }

    /// Finish a start tag: `>`
    pub fn close_start(&mut self) {
        self.out.push('>');
    }

    /// Write a closing tag: `</name>`
    pub fn end_tag(&mut self, tag: &str) {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    /// Start a new line at the current nesting depth
    pub fn line_break(&mut self) {
        self.out.push('\n');
        if self.config.pretty_print {
            self.out.push_str(&"  ".repeat(self.depth));
        }
    }

    pub fn descend(&mut self) {
        self.depth += 1;
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Build the final SVG string
    pub fn finish(self) -> String {
        self.out
    }
}

/// Escape special XML characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Render a field-style name (`stroke_width`) as an SVG/CSS name (`stroke-width`)
pub fn hyphenate(name: &str) -> Cow<'_, str> {
    if name.contains('_') {
        Cow::Owned(name.replace('_', "-"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Wrap CSS in the embedded `<style>` element used by groups and documents
pub fn css_block(css: &str) -> String {
    format!(
        r#"<style type="text/css"><![CDATA[ {} ]]></style>"#,
        css.replace("]]>", "]]]]><![CDATA[>")
    )
}
