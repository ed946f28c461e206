//! Folio - a terminal reader for the school library's books.
//!
//! # Usage
//!
//! ```bash
//! folio 42
//! folio --api-url https://biblioteca.escola.br/api --token "$TOKEN" 42
//! folio --page 12 --zoom 125 livro.pdf
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use folio::app::{App, ReaderTarget};
use folio::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use folio::library::{DEFAULT_API_URL, LibraryClient, Session};
use folio::perf;

/// A terminal reader for the school library's books
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
struct Cli {
    /// Book id on the library server, or a path to a PDF file
    #[arg(value_name = "TARGET")]
    target: String,

    /// Library API base URL
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Session token sent as a bearer token (never saved)
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Initial zoom percentage: 50, 75, 100, 125 or 150
    #[arg(long, value_name = "PERCENT")]
    zoom: Option<u16>,

    /// Open on the spread that shows this page
    #[arg(long, value_name = "N")]
    page: Option<usize>,

    /// Start in fullscreen
    #[arg(long)]
    fullscreen: bool,

    /// Disable page images (show placeholders only)
    #[arg(long)]
    no_images: bool,

    /// Force image rendering to use half-cell fallback mode
    #[arg(long)]
    force_half_cell: bool,

    /// Directory containing the PDFium shared library
    #[arg(long, value_name = "PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Write detailed render/navigation debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn looks_like_pdf(target: &str) -> bool {
    Path::new(target)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn resolve_target(target: &str, api_url: &str, session: Session) -> Result<ReaderTarget> {
    let path = PathBuf::from(target);
    if path.is_file() {
        return Ok(ReaderTarget::Local(path));
    }
    if looks_like_pdf(target) {
        anyhow::bail!("File not found: {}", path.display());
    }
    let client = LibraryClient::new(api_url, session)
        .with_context(|| format!("Failed to create library client for {api_url}"))?;
    Ok(ReaderTarget::Remote {
        client,
        book_id: target.to_string(),
    })
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    perf::set_enabled(effective.perf);
    let render_debug_log_path = effective
        .render_debug_log
        .clone()
        .or_else(|| std::env::var_os("FOLIO_RENDER_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_debug_log_path(render_debug_log_path.as_deref()) {
        tracing::warn!(
            "Failed to initialize render debug log {}: {err}",
            render_debug_log_path
                .as_ref()
                .map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
        );
    }

    // Command line beats environment beats saved defaults.
    let api_url = cli_flags
        .api_url
        .clone()
        .or_else(|| std::env::var("FOLIO_API_URL").ok())
        .or_else(|| file_flags.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let session = Session::begin(cli.token.or_else(|| std::env::var("FOLIO_TOKEN").ok()));
    let target = resolve_target(&cli.target, &api_url, session)?;

    // Run the application
    let mut app = App::new(target)
        .with_zoom_percent(effective.zoom)
        .with_initial_page(cli.page)
        .with_fullscreen(effective.fullscreen)
        .with_images_enabled(!effective.no_images)
        .with_force_half_cell(effective.force_half_cell)
        .with_pdfium_lib(effective.pdfium_lib)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
