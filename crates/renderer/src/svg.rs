//! Minimal SVG document builder.
//!
//! Charts are composed as SVG markup and rasterised by [`crate::raster`].

use std::fmt::Write;

/// Default font stack; resolved against the system font database.
pub const FONT_FAMILY: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";

/// Text anchor for [`SvgDocument::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(&self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Text styling.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle<'a> {
    pub size: f32,
    pub color: &'a str,
    pub anchor: Anchor,
    pub bold: bool,
}

impl Default for TextStyle<'_> {
    fn default() -> Self {
        Self {
            size: 12.0,
            color: "#000000",
            anchor: Anchor::Start,
            bold: false,
        }
    }
}

/// An SVG document under construction.
#[derive(Debug)]
pub struct SvgDocument {
    width: u32,
    height: u32,
    body: String,
}

impl SvgDocument {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill the whole canvas.
    pub fn background(&mut self, fill: &str) {
        let (w, h) = (self.width, self.height);
        self.rect(0.0, 0.0, w as f32, h as f32, fill, None, 0.0);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: &str,
        stroke: Option<&str>,
        radius: f32,
    ) {
        let _ = write!(
            self.body,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="{:.1}" fill="{}""#,
            x,
            y,
            width.max(0.0),
            height.max(0.0),
            radius,
            escape(fill)
        );
        if let Some(stroke) = stroke {
            let _ = write!(self.body, r#" stroke="{}" stroke-width="1""#, escape(stroke));
        }
        self.body.push_str("/>");
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, stroke: &str, dashed: bool) {
        let _ = write!(
            self.body,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="0.8""#,
            x1,
            y1,
            x2,
            y2,
            escape(stroke)
        );
        if dashed {
            self.body.push_str(r#" stroke-dasharray="4 3""#);
        }
        self.body.push_str("/>");
    }

    pub fn text(&mut self, x: f32, y: f32, content: &str, style: TextStyle<'_>) {
        let _ = write!(
            self.body,
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" fill="{}" text-anchor="{}"{}>{}</text>"#,
            x,
            y,
            FONT_FAMILY,
            style.size,
            escape(style.color),
            style.anchor.as_str(),
            if style.bold { r#" font-weight="bold""# } else { "" },
            escape(content)
        );
    }

    /// Serialise the document.
    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

/// Escape text for use in SVG attributes and content.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
