//! SVG rasterisation and PNG encoding.

use std::sync::{Arc, OnceLock};

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use tracing::debug;

use motorsport_common::{MotorsportError, MotorsportResult};

use crate::svg::SvgDocument;

/// System fonts, loaded once per process.
static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

fn font_database() -> Arc<usvg::fontdb::Database> {
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            debug!(faces = db.len(), "Loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// Rasterise an SVG document and encode it as PNG.
pub fn render_png(doc: SvgDocument) -> MotorsportResult<Vec<u8>> {
    let (width, height) = (doc.width(), doc.height());
    svg_to_png(&doc.finish(), width, height)
}

/// Rasterise SVG markup at the given pixel size and encode it as PNG.
pub fn svg_to_png(svg: &str, width: u32, height: u32) -> MotorsportResult<Vec<u8>> {
    let opt = usvg::Options {
        fontdb: font_database(),
        ..Default::default()
    };

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| MotorsportError::RenderError(format!("Invalid SVG: {}", e)))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        MotorsportError::RenderError(format!("Invalid canvas size {}x{}", width, height))
    })?;

    let svg_size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / svg_size.width(),
        height as f32 / svg_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    encode_png(&pixmap)
}

/// Encode a pixmap as 8-bit RGBA PNG.
fn encode_png(pixmap: &tiny_skia::Pixmap) -> MotorsportResult<Vec<u8>> {
    // tiny-skia stores premultiplied alpha
    let mut rgba = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&rgba, pixmap.width(), pixmap.height(), ColorType::Rgba8)
        .map_err(|e| MotorsportError::RenderError(format!("PNG encoding failed: {}", e)))?;

    debug!(
        width = pixmap.width(),
        height = pixmap.height(),
        bytes = png.len(),
        "Encoded PNG"
    );
    Ok(png)
}
