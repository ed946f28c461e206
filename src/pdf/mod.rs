//! PDF decoding and page rendering.
//!
//! [`PdfEngine`] is the seam between the reader and the rendering library.
//! [`PdfiumEngine`] implements it with PDFium; [`RenderWorker`] drives any
//! engine on a background thread so the UI never blocks on a render.

mod pdfium;
mod worker;

pub use pdfium::PdfiumEngine;
pub use worker::{RenderEvent, RenderWorker};

use image::DynamicImage;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("PDF engine unavailable: {0}")]
    Unavailable(String),
    #[error("failed to open PDF: {0}")]
    Load(String),
    #[error("no document is open")]
    NoDocument,
    #[error("page {page} out of range (document has {page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },
    #[error("failed to render page {page}: {message}")]
    Page { page: usize, message: String },
}

/// A PDF rendering backend holding at most one open document.
pub trait PdfEngine {
    /// Open `bytes` as the current document, replacing any previous one.
    /// Returns the page count.
    ///
    /// # Errors
    ///
    /// Fails when the bytes are not a readable PDF.
    fn load_document(&mut self, bytes: Vec<u8>) -> Result<usize, RenderError>;

    /// Render 1-based `page` at `scale` (1.0 is the reader's actual size).
    ///
    /// # Errors
    ///
    /// Fails when no document is open, the page does not exist, or the
    /// backend cannot rasterize it.
    fn render_page(&mut self, page: usize, scale: f32) -> Result<DynamicImage, RenderError>;
}

impl<E: PdfEngine + ?Sized> PdfEngine for Box<E> {
    fn load_document(&mut self, bytes: Vec<u8>) -> Result<usize, RenderError> {
        (**self).load_document(bytes)
    }

    fn render_page(&mut self, page: usize, scale: f32) -> Result<DynamicImage, RenderError> {
        (**self).render_page(page, scale)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashSet;

    use image::{DynamicImage, Rgba, RgbaImage};

    use super::{PdfEngine, RenderError};

    /// In-memory engine: "documents" are a page count encoded in the bytes.
    #[derive(Debug, Default)]
    pub struct FakeEngine {
        pub page_count: Option<usize>,
        pub failing_pages: HashSet<usize>,
        pub rendered: Vec<(usize, f32)>,
    }

    impl FakeEngine {
        pub fn failing_on(pages: &[usize]) -> Self {
            Self {
                failing_pages: pages.iter().copied().collect(),
                ..Self::default()
            }
        }

        /// Bytes that load as a document with `pages` pages.
        pub fn document(pages: usize) -> Vec<u8> {
            format!("fake-pdf:{pages}").into_bytes()
        }
    }

    impl PdfEngine for FakeEngine {
        fn load_document(&mut self, bytes: Vec<u8>) -> Result<usize, RenderError> {
            let text = String::from_utf8(bytes).map_err(|e| RenderError::Load(e.to_string()))?;
            let count = text
                .strip_prefix("fake-pdf:")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| RenderError::Load("not a PDF".to_string()))?;
            self.page_count = Some(count);
            Ok(count)
        }

        fn render_page(&mut self, page: usize, scale: f32) -> Result<DynamicImage, RenderError> {
            let page_count = self.page_count.ok_or(RenderError::NoDocument)?;
            if page == 0 || page > page_count {
                return Err(RenderError::PageOutOfRange { page, page_count });
            }
            if self.failing_pages.contains(&page) {
                return Err(RenderError::Page {
                    page,
                    message: "corrupt content stream".to_string(),
                });
            }
            self.rendered.push((page, scale));
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                4,
                6,
                Rgba([255, 255, 255, 255]),
            )))
        }
    }
}
