//! Opt-in timing scopes and a structured render/event debug log.
//!
//! The reader owns the terminal while it runs, so nothing here writes to
//! stdout or stderr. Timings go to the debug log file (when one is set) and
//! to `tracing` at debug level.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);
static DEBUG_LOGGER: LazyLock<Mutex<DebugLogger>> =
    LazyLock::new(|| Mutex::new(DebugLogger::new()));

#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        tracing::debug!(scope = self.name, elapsed_ms, "perf");
        log_event("perf.scope", format!("{} {elapsed_ms:.2} ms", self.name));
    }
}

#[derive(Debug)]
struct DebugLogger {
    enabled: bool,
    start: Instant,
    writer: Option<BufWriter<File>>,
}

impl DebugLogger {
    fn new() -> Self {
        Self {
            enabled: false,
            start: Instant::now(),
            writer: None,
        }
    }
}

fn debug_logger() -> MutexGuard<'static, DebugLogger> {
    match DEBUG_LOGGER.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Time a region until the returned guard drops.
pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

/// Start (or with `None`, stop) writing the debug log to `path`.
///
/// # Errors
///
/// Fails when the file cannot be created or the header cannot be written.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut logger = debug_logger();
    let Some(path) = path else {
        logger.enabled = false;
        logger.writer = None;
        return Ok(());
    };
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "folio render debug log start")?;
    writer.flush()?;
    logger.enabled = true;
    logger.start = Instant::now();
    logger.writer = Some(writer);
    Ok(())
}

pub fn is_debug_log_enabled() -> bool {
    debug_logger().enabled
}

/// Append `name: detail` with a millisecond timestamp.
pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut logger = debug_logger();
    if !logger.enabled {
        return;
    }
    let elapsed_ms = logger.start.elapsed().as_secs_f64() * 1000.0;
    if let Some(writer) = logger.writer.as_mut() {
        let _ = writeln!(writer, "[{elapsed_ms:>10.3} ms] {name}: {}", detail.as_ref());
        let _ = writer.flush();
    }
}
