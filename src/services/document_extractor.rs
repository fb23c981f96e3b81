use std::sync::Arc;
use std::time::Instant;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{codecs::jpeg::JpegEncoder, ColorType, DynamicImage, RgbaImage};
use lopdf::Document;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{DocumentKind, InputContent, UploadedFile};
use crate::services::docx_reader;
use crate::services::pdf_renderer::{PageRasterizer, PdfiumRasterizer};

pub const IMAGE_MIME: &str = "image/jpeg";
const JPEG_QUALITY: u8 = 85;

/// Result of turning an upload into model input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Content(InputContent),
    /// The declared type is neither PDF nor DOCX.
    Unsupported { declared_type: String },
}

pub struct DocumentExtractor {
    rasterizer: Arc<dyn PageRasterizer>,
}

impl DocumentExtractor {
    pub fn new() -> Self {
        Self::with_rasterizer(Arc::new(PdfiumRasterizer::new()))
    }

    pub fn with_rasterizer(rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self { rasterizer }
    }

    pub async fn extract(&self, file: UploadedFile) -> AppResult<Extraction> {
        let start = Instant::now();

        let kind = match file.kind() {
            Some(kind) => kind,
            None => {
                let declared_type = file.declared_type();
                info!(file_name = %file.name, declared_type = %declared_type, "Unsupported upload type");
                return Ok(Extraction::Unsupported { declared_type });
            }
        };

        info!(
            "Starting {} extraction for file: {} ({} bytes)",
            kind.name(),
            file.name,
            file.size
        );

        let content = match kind {
            DocumentKind::Pdf => self.extract_pdf(file).await?,
            DocumentKind::Docx => {
                let text = tokio::task::spawn_blocking(move || docx_reader::read_paragraphs(&file.content)).await??;
                InputContent::ExtractedText(text)
            }
        };

        info!(
            content_kind = content.kind(),
            content_bytes = content.len(),
            processing_time_ms = start.elapsed().as_millis() as u64,
            "Extraction completed"
        );

        Ok(Extraction::Content(content))
    }

    async fn extract_pdf(&self, file: UploadedFile) -> AppResult<InputContent> {
        let rasterizer = Arc::clone(&self.rasterizer);
        let data = tokio::task::spawn_blocking(move || -> AppResult<String> {
            let pages = count_pages(&file.content)?;
            if pages > 1 {
                debug!(pages, "Only the first page of the PDF is analyzed");
            }

            let page = rasterizer.rasterize(&file.content, 0)?;
            let jpeg = encode_jpeg(page)?;
            Ok(BASE64.encode(jpeg))
        })
        .await??;

        Ok(InputContent::ImagePayload {
            mime_type: IMAGE_MIME.to_string(),
            data,
        })
    }

    pub fn is_available(&self) -> bool {
        self.rasterizer.is_available()
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses the PDF structure and returns its page count.
pub fn count_pages(pdf: &[u8]) -> AppResult<usize> {
    let document = Document::load_mem(pdf).map_err(|e| {
        warn!("PDF structure validation failed: {}", e);
        AppError::decode("PDF", e.to_string())
    })?;

    match document.get_pages().len() {
        0 => Err(AppError::decode("PDF", "document has no pages")),
        n => Ok(n),
    }
}

fn encode_jpeg(page: RgbaImage) -> AppResult<Vec<u8>> {
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgba8(page).to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
        .map_err(|e| AppError::internal(format!("JPEG encoding failed: {}", e)))?;
    Ok(buffer)
}
