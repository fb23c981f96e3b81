pub mod detection_client;
pub mod document_extractor;
pub mod docx_reader;
pub mod pdf_renderer;
pub mod score_parser;

pub use detection_client::{DetectionClient, GeminiClient, DETECTION_PROMPT};
pub use document_extractor::{DocumentExtractor, Extraction};
pub use pdf_renderer::{PageRasterizer, PdfiumRasterizer};
pub use score_parser::parse_score;
