//! Text extraction from uploaded files.
//!
//! Detects the upload format by byte signature, delegates to the matching
//! engine (embedded text layer for PDFs, OCR for raster images), then
//! chunks the recovered text for the generation stage.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;

use deckgen_core::chunk::chunk_words;
use deckgen_core::detect::detect;
use deckgen_core::error::DetectError;
use deckgen_core::types::FileKind;

/// Extraction failures.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("empty file provided")]
    EmptyInput,

    #[error("unsupported file type: only PDF, PNG, JPEG and GIF files are supported")]
    UnsupportedFormat,

    #[error("invalid or corrupted file: {0}")]
    CorruptInput(String),

    #[error("required dependency unavailable: {0}")]
    DependencyUnavailable(String),
}

impl From<DetectError> for ExtractError {
    fn from(err: DetectError) -> Self {
        match err {
            DetectError::Empty => Self::EmptyInput,
            DetectError::Unknown => Self::UnsupportedFormat,
        }
    }
}

/// Extracts the embedded text layer of a PDF.
#[async_trait]
pub trait PdfTextEngine: Send + Sync {
    /// Verify the engine's native dependency is present and responsive.
    async fn check(&self) -> Result<(), ExtractError>;

    /// Extract visible text from every page, in order, one entry per page.
    async fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError>;
}

/// Runs optical character recognition over a normalized PNG image.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Verify the engine's native dependency is present and responsive.
    async fn check(&self) -> Result<(), ExtractError>;

    async fn recognize(&self, png: &[u8]) -> Result<String, ExtractError>;
}

/// Extraction backend: format detection, engine dispatch and chunking.
pub struct ExtractionService {
    pdf: Arc<dyn PdfTextEngine>,
    ocr: Arc<dyn OcrEngine>,
    chunk_size: usize,
    // Dependency probes run once before first use of each path; a failed
    // probe is not cached, so the next call re-probes.
    pdf_ready: OnceCell<()>,
    ocr_ready: OnceCell<()>,
}

impl ExtractionService {
    pub fn new(pdf: Arc<dyn PdfTextEngine>, ocr: Arc<dyn OcrEngine>, chunk_size: usize) -> Self {
        Self {
            pdf,
            ocr,
            chunk_size,
            pdf_ready: OnceCell::new(),
            ocr_ready: OnceCell::new(),
        }
    }

    /// Extract text from `bytes` and split it into word chunks.
    ///
    /// A supported file that yields no text at all produces a single
    /// sentinel chunk rather than an empty sequence, so downstream stages
    /// always receive at least one unit of work.
    pub async fn extract(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        let kind = detect(bytes)?;
        tracing::info!(?kind, size = bytes.len(), "detected upload format");

        let text = match kind {
            FileKind::Pdf => self.pdf_text(bytes).await?,
            FileKind::Png | FileKind::Jpeg | FileKind::Gif => self.image_text(bytes).await?,
        };

        if text.trim().is_empty() {
            tracing::warn!(?kind, "no text recovered from upload");
            let sentinel = if kind == FileKind::Pdf {
                "No text found in PDF file"
            } else {
                "No text found in image"
            };
            return Ok(vec![sentinel.to_string()]);
        }

        Ok(chunk_words(&text, self.chunk_size))
    }

    async fn pdf_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        self.pdf_ready
            .get_or_try_init(|| self.pdf.check())
            .await?;

        let pages = self.pdf.extract_pages(bytes).await?;
        let mut full_text = String::new();
        for (index, page) in pages.iter().enumerate() {
            if page.trim().is_empty() {
                tracing::warn!(page = index + 1, "no text extracted from PDF page");
                continue;
            }
            full_text.push_str(page);
            full_text.push('\n');
        }
        Ok(full_text)
    }

    async fn image_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        self.ocr_ready
            .get_or_try_init(|| self.ocr.check())
            .await?;

        let png = normalize_image(bytes)?;
        self.ocr.recognize(&png).await
    }
}

/// Decode an image, flatten any alpha channel onto a white background and
/// re-encode it as PNG for the OCR engine.
fn normalize_image(bytes: &[u8]) -> Result<Vec<u8>, ExtractError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ExtractError::CorruptInput(format!("failed to decode image: {}", e)))?;

    let rgba = decoded.to_rgba8();
    let mut flattened = image::RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let blend = |channel: u8| (channel as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        flattened.put_pixel(x, y, image::Rgb([blend(r), blend(g), blend(b)]));
    }

    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(flattened)
        .write_to(
            &mut std::io::Cursor::new(&mut png),
            image::ImageOutputFormat::Png,
        )
        .map_err(|e| ExtractError::CorruptInput(format!("failed to re-encode image: {}", e)))?;
    Ok(png)
}
