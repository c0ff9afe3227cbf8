//! Thumbnail generation: source image/PDF → small JPEG on disk.
//!
//! ## Why normalise the colour model?
//!
//! Scanned clippings arrive as whatever the archive produced: palettised
//! GIFs, RGBA PNGs with an alpha channel from a crop tool, grey+alpha TIFFs.
//! JPEG can only encode plain RGB and greyscale, so anything else is
//! converted to 3-channel RGB before encoding rather than letting the
//! encoder reject it.
//!
//! ## Why no upscaling?
//!
//! A 120 px clipping blown up to 300 px is just blur. Sources already inside
//! the bounding box are re-encoded at native size.
//!
//! Every failure here is recoverable: the Note Writer logs it and writes the
//! note without a thumbnail. Nothing in this module can abort the batch.

use crate::pipeline::filename::sanitize_stem;
use image::{ColorType, DynamicImage};
use pdfium_render::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// A recoverable thumbnail failure for a single source file.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// Source file was not found at the given path.
    #[error("Source file not found: '{path}'")]
    SourceMissing { path: String },

    /// Source image could not be decoded.
    #[error("Failed to decode '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// PDF could not be opened or its first page rendered.
    ///
    /// Includes the case where no pdfium library is available at runtime —
    /// the batch still completes, just without PDF thumbnails.
    #[error("Failed to render first page of '{path}': {detail}")]
    PdfRender { path: String, detail: String },

    /// JPEG encode/write failed.
    #[error("Failed to write thumbnail '{path}': {source}")]
    Encode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// Output directory could not be created.
    #[error("Failed to create thumbnail directory '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Thumbnail filename derived from a source file: `thumb_<sanitised stem>.jpg`.
///
/// Keyed by base name only, so one source file yields at most one thumbnail
/// per run regardless of which directory it was resolved from.
pub fn thumbnail_filename(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("thumb_{}.jpg", sanitize_stem(&stem))
}

/// Generate a JPEG thumbnail for `source` inside `output_dir`.
///
/// PDFs have their first page rasterised; raster images are decoded
/// directly. Either way the result is normalised to a JPEG-encodable colour
/// model, downscaled to fit within `max` (aspect-preserving, never
/// upscaled), and written as `thumb_<stem>.jpg`.
///
/// Creates `output_dir` if absent. Returns the thumbnail's filename.
pub fn make_thumbnail(
    source: &Path,
    output_dir: &Path,
    max: (u32, u32),
) -> Result<String, ThumbnailError> {
    if !source.exists() {
        return Err(ThumbnailError::SourceMissing {
            path: source.display().to_string(),
        });
    }

    std::fs::create_dir_all(output_dir).map_err(|e| ThumbnailError::Io {
        path: output_dir.display().to_string(),
        source: e,
    })?;

    let is_pdf = source
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let img = if is_pdf {
        render_pdf_first_page(source, max)?
    } else {
        image::open(source).map_err(|e| ThumbnailError::Decode {
            path: source.display().to_string(),
            source: e,
        })?
    };

    let img = normalize_for_jpeg(img);
    let thumb = downscale_to_fit(&img, max);

    let filename = thumbnail_filename(source);
    let out_path = output_dir.join(&filename);
    thumb
        .save_with_format(&out_path, image::ImageFormat::Jpeg)
        .map_err(|e| ThumbnailError::Encode {
            path: out_path.display().to_string(),
            source: e,
        })?;

    debug!(
        "Thumbnail {} → {}x{} px",
        out_path.display(),
        thumb.width(),
        thumb.height()
    );
    Ok(filename)
}

/// Convert to a colour model the JPEG encoder accepts.
///
/// RGB and plain greyscale pass through; palette, alpha, 16-bit, and float
/// variants are flattened to 8-bit RGB.
fn normalize_for_jpeg(img: DynamicImage) -> DynamicImage {
    match img.color() {
        ColorType::Rgb8 | ColorType::L8 => img,
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}

/// Downscale to fit within `max` preserving aspect ratio; smaller sources
/// are returned unchanged.
fn downscale_to_fit(img: &DynamicImage, max: (u32, u32)) -> DynamicImage {
    let (max_w, max_h) = max;
    if img.width() <= max_w && img.height() <= max_h {
        img.clone()
    } else {
        img.thumbnail(max_w, max_h)
    }
}

/// True when a pdfium library can be bound on this machine.
///
/// Callers can probe this up front to know whether PDF sources will render
/// or degrade to a warning; [`make_thumbnail`] itself binds lazily per call.
pub fn pdfium_available() -> bool {
    bind_pdfium().is_ok()
}

/// Rasterise the first page of a PDF at roughly twice the thumbnail size,
/// leaving the precise fit to [`downscale_to_fit`].
///
/// Unlike raster sources, a page whose native 72-dpi size is below the
/// target is rendered larger than native: pages are vector content, so
/// scaling up costs nothing and keeps text legible. The final thumbnail is
/// still capped at `max` by [`downscale_to_fit`].
fn render_pdf_first_page(path: &Path, max: (u32, u32)) -> Result<DynamicImage, ThumbnailError> {
    let pdf_err = |detail: String| ThumbnailError::PdfRender {
        path: path.display().to_string(),
        detail,
    };

    let pdfium = bind_pdfium().map_err(|e| pdf_err(format!("{e:?}")))?;

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| pdf_err(format!("{e:?}")))?;

    let pages = document.pages();
    let page = pages.get(0).map_err(|e| pdf_err(format!("{e:?}")))?;

    // Render oversized so the final downscale keeps text legible.
    let render_config = PdfRenderConfig::new()
        .set_target_width((max.0 * 2) as i32)
        .set_maximum_height((max.1 * 2) as i32);

    let bitmap = page
        .render_with_config(&render_config)
        .map_err(|e| pdf_err(format!("{e:?}")))?;

    Ok(bitmap.as_image())
}

/// Bind to a pdfium library: `PDFIUM_LIB_PATH` first, then the executable's
/// directory, then the system library.
fn bind_pdfium() -> Result<Pdfium, PdfiumError> {
    if let Ok(dir) = std::env::var("PDFIUM_LIB_PATH") {
        let name = Pdfium::pdfium_platform_library_name_at_path(&dir);
        return Pdfium::bind_to_library(name).map(Pdfium::new);
    }
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
}
