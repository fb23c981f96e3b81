//! Fixtures shared by the unit and integration suites.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use docx_rs::{Docx, Paragraph, Run};
use image::{Rgba, RgbaImage};
use lopdf::{dictionary, Document, Object};

use detection_meter::config::Config;
use detection_meter::error::{AppError, AppResult};
use detection_meter::models::InputContent;
use detection_meter::services::{DetectionClient, DocumentExtractor, PageRasterizer};

pub fn config_with(vars: &[(&str, &str)]) -> AppResult<Config> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|name| vars.get(name).cloned())
}

pub fn test_config() -> Config {
    config_with(&[("GOOGLE_API_KEY", "test-key")]).unwrap()
}

/// Detection client that records every call and answers with a canned reply.
pub struct FakeDetector {
    reply: Result<String, String>,
    delay: Duration,
    calls: Mutex<Vec<InputContent>>,
}

impl FakeDetector {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(reply: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            delay,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<InputContent> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DetectionClient for FakeDetector {
    async fn detect(&self, content: &InputContent) -> AppResult<String> {
        self.calls.lock().unwrap().push(content.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(message) => Err(AppError::service(message.clone())),
        }
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

/// Rasterizer that remembers which pages were requested.
#[derive(Default)]
pub struct RecordingRasterizer {
    pages: Mutex<Vec<u16>>,
}

impl RecordingRasterizer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pages(&self) -> Vec<u16> {
        self.pages.lock().unwrap().clone()
    }
}

impl PageRasterizer for RecordingRasterizer {
    fn rasterize(&self, _pdf: &[u8], page_index: u16) -> AppResult<RgbaImage> {
        self.pages.lock().unwrap().push(page_index);
        Ok(RgbaImage::from_pixel(16, 16, Rgba([200, 30, 30, 255])))
    }

    fn is_available(&self) -> bool {
        true
    }
}

pub fn extractor_with(rasterizer: Arc<RecordingRasterizer>) -> Arc<DocumentExtractor> {
    Arc::new(DocumentExtractor::with_rasterizer(rasterizer))
}

/// A structurally valid PDF with `count` blank A4 pages.
pub fn pdf_with_pages(count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..count)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            })
            .into()
        })
        .collect();

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// A DOCX whose body is exactly `paragraphs`; empty strings become empty paragraphs.
pub fn docx_with(paragraphs: &[&str]) -> Vec<u8> {
    let docx = paragraphs.iter().fold(Docx::new(), |docx, text| {
        let paragraph = if text.is_empty() {
            Paragraph::new()
        } else {
            Paragraph::new().add_run(Run::new().add_text(*text))
        };
        docx.add_paragraph(paragraph)
    });

    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).unwrap();
    buffer.into_inner()
}
