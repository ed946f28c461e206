use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use pdfium_render::prelude::*;

use super::{PdfEngine, RenderError};

/// Pixels rendered per PDF point at zoom 1.0.
///
/// Terminal graphics protocols downscale to the cell grid, so a little
/// oversampling keeps small print legible.
const RENDER_DENSITY: f32 = 2.0;

/// [`PdfEngine`] backed by the PDFium shared library.
pub struct PdfiumEngine {
    pdfium: &'static Pdfium,
    document: Option<PdfDocument<'static>>,
}

impl std::fmt::Debug for PdfiumEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfiumEngine")
            .field("document_open", &self.document.is_some())
            .finish_non_exhaustive()
    }
}

impl PdfiumEngine {
    /// Bind PDFium and create an engine.
    ///
    /// Search order: `library_dir` when given, the executable's directory,
    /// the working directory, then system library paths.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Unavailable`] when no PDFium library loads.
    pub fn new(library_dir: Option<&Path>) -> Result<Self, RenderError> {
        let bindings = bind_pdfium(library_dir)?;
        // One binding per process, living as long as the render thread.
        let pdfium: &'static Pdfium = Box::leak(Box::new(Pdfium::new(bindings)));
        Ok(Self {
            pdfium,
            document: None,
        })
    }

    fn page(&self, page: usize) -> Result<PdfPage<'_>, RenderError> {
        let document = self.document.as_ref().ok_or(RenderError::NoDocument)?;
        let page_count = usize::try_from(document.pages().len()).unwrap_or(0);
        if page == 0 || page > page_count {
            return Err(RenderError::PageOutOfRange { page, page_count });
        }
        let index = (page - 1)
            .try_into()
            .map_err(|_| RenderError::PageOutOfRange { page, page_count })?;
        document
            .pages()
            .get(index)
            .map_err(|err| RenderError::Page {
                page,
                message: err.to_string(),
            })
    }
}

fn bind_pdfium(library_dir: Option<&Path>) -> Result<Box<dyn PdfiumLibraryBindings>, RenderError> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    let candidates: Vec<PathBuf> = library_dir
        .map(Path::to_path_buf)
        .into_iter()
        .chain(exe_dir)
        .chain(std::iter::once(PathBuf::from("./")))
        .collect();

    for dir in &candidates {
        if let Ok(bindings) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
        {
            crate::perf::log_event("pdfium.bind", format!("dir={}", dir.display()));
            return Ok(bindings);
        }
    }

    Pdfium::bind_to_system_library()
        .inspect(|_| crate::perf::log_event("pdfium.bind", "system library"))
        .map_err(|err| RenderError::Unavailable(err.to_string()))
}

impl PdfEngine for PdfiumEngine {
    fn load_document(&mut self, bytes: Vec<u8>) -> Result<usize, RenderError> {
        self.document = None;
        let document = self
            .pdfium
            .load_pdf_from_byte_vec(bytes, None)
            .map_err(|err| RenderError::Load(err.to_string()))?;
        let page_count = usize::try_from(document.pages().len()).unwrap_or(0);
        self.document = Some(document);
        Ok(page_count)
    }

    fn render_page(&mut self, page: usize, scale: f32) -> Result<DynamicImage, RenderError> {
        let _scope = crate::perf::scope("pdfium.render_page");
        let pdf_page = self.page(page)?;
        let config = PdfRenderConfig::new().scale_page_by_factor(scale * RENDER_DENSITY);
        let bitmap = pdf_page
            .render_with_config(&config)
            .map_err(|err| RenderError::Page {
                page,
                message: err.to_string(),
            })?;
        let failed = |message: &str| RenderError::Page {
            page,
            message: message.to_string(),
        };
        let width = u32::try_from(bitmap.width()).map_err(|_| failed("negative bitmap width"))?;
        let height =
            u32::try_from(bitmap.height()).map_err(|_| failed("negative bitmap height"))?;
        let pixels = bitmap.as_rgba_bytes().to_vec();
        RgbaImage::from_raw(width, height, pixels)
            .map(DynamicImage::ImageRgba8)
            .ok_or_else(|| failed("bitmap size mismatch"))
    }
}
