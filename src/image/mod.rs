//! Terminal graphics for rendered pages.
//!
//! Supports multiple terminal graphics protocols:
//! - Kitty graphics protocol
//! - Sixel
//! - iTerm2
//! - Unicode half-blocks (fallback)

#[cfg(unix)]
use std::time::Duration;

use image::{DynamicImage, Rgba};
use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;
#[cfg(unix)]
use ratatui_image::picker::cap_parser::QueryStdioOptions;

const PICKER_QUERY_TIMEOUT_MS: u64 = 250;

/// Pick the graphics protocol used to draw pages.
///
/// Must run before the terminal enters raw mode: the capability query talks
/// to the terminal over stdio. When the query fails the reader still shows
/// pages, using half-blocks.
pub fn create_picker(force_half_cell: bool) -> Picker {
    if force_half_cell {
        crate::perf::log_event("image.create_picker", "forced protocol=Halfblocks");
        return Picker::halfblocks();
    }
    query_picker().unwrap_or_else(|| {
        crate::perf::log_event("image.create_picker", "query failed protocol=Halfblocks");
        Picker::halfblocks()
    })
}

// Windows consoles can keep an orphaned reader thread on the input buffer
// after the stdio query, which swallows key events.
#[cfg(not(unix))]
fn query_picker() -> Option<Picker> {
    None
}

#[cfg(unix)]
fn query_picker() -> Option<Picker> {
    let picker = Picker::from_query_stdio_with_options(query_options()).ok()?;
    crate::perf::log_event(
        "image.create_picker",
        format!(
            "term_program={} term={} protocol={:?}",
            std::env::var("TERM_PROGRAM").unwrap_or_else(|_| "<unset>".to_string()),
            std::env::var("TERM").unwrap_or_else(|_| "<unset>".to_string()),
            picker.protocol_type()
        ),
    );
    Some(picker)
}

/// Build a resizable protocol for a rendered page.
///
/// Half-block output on terminals without truecolor is quantized to the
/// ANSI-256 palette first so the terminal does not dither it again.
pub fn page_protocol(picker: &Picker, page: DynamicImage) -> StatefulProtocol {
    let halfblocks = matches!(picker.protocol_type(), ProtocolType::Halfblocks);
    let page = if halfblocks && !supports_truecolor_terminal() {
        quantize_to_ansi256(&page)
    } else {
        page
    };
    picker.new_resize_protocol(page)
}

/// Whether terminal output should be treated as truecolor-capable.
pub fn supports_truecolor_terminal() -> bool {
    if let Ok(force) = std::env::var("FOLIO_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    if std::env::var("TERM_PROGRAM")
        .ok()
        .as_deref()
        .is_some_and(|v| v == "Apple_Terminal")
    {
        return false;
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

/// Snap every pixel to the xterm 6x6x6 color cube, keeping alpha.
pub fn quantize_to_ansi256(image: &DynamicImage) -> DynamicImage {
    let mut pixels = image.to_rgba8();
    for pixel in pixels.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        *pixel = Rgba([cube_value(r), cube_value(g), cube_value(b), a]);
    }
    DynamicImage::ImageRgba8(pixels)
}

#[cfg(unix)]
fn query_options() -> QueryStdioOptions {
    let mut options = QueryStdioOptions::default();
    options.timeout = Duration::from_millis(PICKER_QUERY_TIMEOUT_MS);
    options
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    if let Some(ct) = colorterm {
        let lower = ct.to_ascii_lowercase();
        if lower.contains("truecolor") || lower.contains("24bit") {
            return true;
        }
    }
    if let Some(t) = term {
        let lower = t.to_ascii_lowercase();
        if lower.contains("direct") || lower.contains("truecolor") {
            return true;
        }
    }
    false
}

/// Nearest-below xterm cube level for one channel: 0, 95, 135, 175, 215, 255.
fn cube_value(channel: u8) -> u8 {
    let level = u16::from(channel) * 5 / 255;
    if level == 0 {
        0
    } else {
        u8::try_from(55 + level * 40).unwrap_or(u8::MAX)
    }
}
