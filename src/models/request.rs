use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const GENERIC_MIME: &str = "application/octet-stream";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TextDetectionRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub size: usize,
    pub content: Bytes,
    pub mime_type: Option<String>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len(),
            content,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Declared type as reported to the user, falling back to the file name.
    pub fn declared_type(&self) -> String {
        self.mime_type
            .clone()
            .unwrap_or_else(|| self.name.clone())
    }

    /// Resolves the document kind from the declared MIME type. A missing or
    /// generic type defers to the file extension.
    pub fn kind(&self) -> Option<DocumentKind> {
        let declared = self
            .mime_type
            .as_deref()
            .map(|mt| mt.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .filter(|mt| !mt.is_empty() && mt != GENERIC_MIME);

        match declared.as_deref() {
            Some(PDF_MIME) => Some(DocumentKind::Pdf),
            Some(DOCX_MIME) => Some(DocumentKind::Docx),
            Some(_) => None,
            None => {
                let name = self.name.to_lowercase();
                if name.ends_with(".pdf") {
                    Some(DocumentKind::Pdf)
                } else if name.ends_with(".docx") {
                    Some(DocumentKind::Docx)
                } else {
                    None
                }
            }
        }
    }
}
