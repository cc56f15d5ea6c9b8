//! PDF text extraction.
//!
//! Page text is concatenated in page order. A page that yields no text adds
//! nothing; a load error or a failing page read fails the whole document.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use clausola_core::{Error, Result};

/// Pulls the full text out of a document on disk.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String>;
}

/// `lopdf`-backed extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from an in-memory PDF.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<String> {
        let doc = Document::load_mem(bytes).map_err(|e| {
            warn!("Failed to load PDF from memory: {}", e);
            Error::Extraction(format!("Failed to load PDF: {}", e))
        })?;
        extract_document(&doc)
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let doc = Document::load(path).map_err(|e| {
            warn!("Failed to load PDF {}: {}", path.display(), e);
            Error::Extraction(format!("Failed to load PDF {}: {}", path.display(), e))
        })?;
        let text = extract_document(&doc)?;
        debug!(
            "Extracted {} chars from {}",
            text.chars().count(),
            path.display()
        );
        Ok(text)
    }
}

/// Concatenate every page's text, in page order.
fn extract_document(doc: &Document) -> Result<String> {
    let mut full_text = String::new();
    // `get_pages` is a BTreeMap keyed by 1-based page number.
    for page_num in doc.get_pages().keys() {
        let page_text = doc.extract_text(&[*page_num]).map_err(|e| {
            warn!("Text extraction failed on page {}: {}", page_num, e);
            Error::Extraction(format!("Page {}: {}", page_num, e))
        })?;
        full_text.push_str(&page_text);
    }
    Ok(full_text)
}
