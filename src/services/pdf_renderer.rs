use image::RgbaImage;
use once_cell::sync::Lazy;
use pdfium_render::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};

const RENDER_WIDTH: i32 = 1200;
const MAX_RENDER_HEIGHT: i32 = 2400;

/// Turns a single PDF page into pixels.
///
/// Implementations are called from a blocking thread.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(&self, pdf: &[u8], page_index: u16) -> AppResult<RgbaImage>;

    fn is_available(&self) -> bool;
}

/// Rasterizer backed by the pdfium library, bound fresh for every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfiumRasterizer;

static PDFIUM_AVAILABLE: Lazy<bool> = Lazy::new(|| match bind_pdfium() {
    Ok(_) => {
        info!("pdfium library bound successfully");
        true
    }
    Err(e) => {
        warn!("pdfium library not available: {}", e);
        false
    }
});

fn bind_pdfium() -> AppResult<Pdfium> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./lib"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| AppError::internal(format!("Failed to load pdfium: {}", e)))?;
    Ok(Pdfium::new(bindings))
}

impl PdfiumRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, pdf: &[u8], page_index: u16) -> AppResult<RgbaImage> {
        let pdfium = bind_pdfium()?;

        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| AppError::decode("PDF", e.to_string()))?;

        let page = document
            .pages()
            .get(page_index)
            .map_err(|e| AppError::decode("PDF", format!("page {} unavailable: {}", page_index + 1, e)))?;

        let render_config = PdfRenderConfig::new()
            .set_target_width(RENDER_WIDTH)
            .set_maximum_height(MAX_RENDER_HEIGHT);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| AppError::decode("PDF", format!("failed to render page {}: {}", page_index + 1, e)))?;

        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        debug!(page = page_index + 1, width, height, "Rendered PDF page");

        RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes())
            .ok_or_else(|| AppError::internal("Rendered bitmap has an unexpected size"))
    }

    fn is_available(&self) -> bool {
        *PDFIUM_AVAILABLE
    }
}
