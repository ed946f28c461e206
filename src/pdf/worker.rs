use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use image::DynamicImage;

use super::{PdfEngine, RenderError};
use crate::reader::PageKey;

enum RenderCommand {
    Open(Vec<u8>),
    Render { key: PageKey, scale: f32 },
    Shutdown,
}

/// Results reported by the render thread, in completion order.
#[derive(Debug)]
pub enum RenderEvent {
    DocumentLoaded { page_count: usize },
    DocumentFailed(RenderError),
    PageRendered { key: PageKey, image: DynamicImage },
    PageFailed { key: PageKey, error: RenderError },
}

/// Handle to a background thread that owns a [`PdfEngine`].
///
/// Requests are processed in the order sent. Nothing is cancelled: a page
/// requested for a spread the reader has since left is still rendered and
/// reported. Dropping the handle stops the thread.
pub struct RenderWorker {
    commands: Sender<RenderCommand>,
    events: Receiver<RenderEvent>,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for RenderWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderWorker")
            .field("running", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

impl RenderWorker {
    /// Spawn the render thread. The engine is built on that thread, so it
    /// does not need to be `Send`.
    pub fn spawn<E, F>(make_engine: F) -> Self
    where
        E: PdfEngine + 'static,
        F: FnOnce() -> Result<E, RenderError> + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("folio-render".to_string())
            .spawn(move || run(make_engine(), &command_rx, &event_tx))
            .map_err(|err| tracing::error!("failed to spawn render thread: {err}"))
            .ok();
        Self {
            commands: command_tx,
            events: event_rx,
            handle,
        }
    }

    /// Open a document; answered by `DocumentLoaded` or `DocumentFailed`.
    pub fn open(&self, bytes: Vec<u8>) {
        self.send(RenderCommand::Open(bytes));
    }

    /// Queue a page render; answered by `PageRendered` or `PageFailed`.
    pub fn request(&self, key: PageKey, scale: f32) {
        crate::perf::log_event(
            "render.request",
            format!("page={} zoom={} scale={scale}", key.page, key.zoom),
        );
        self.send(RenderCommand::Render { key, scale });
    }

    /// Next finished event, if any, without blocking.
    pub fn try_recv(&self) -> Option<RenderEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Wait up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RenderEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    fn send(&self, command: RenderCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("render thread is gone; request dropped");
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        let _ = self.commands.send(RenderCommand::Shutdown);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("render thread panicked");
        }
    }
}

fn run<E: PdfEngine>(
    mut engine: Result<E, RenderError>,
    commands: &Receiver<RenderCommand>,
    events: &Sender<RenderEvent>,
) {
    if let Err(err) = &engine {
        tracing::debug!("PDF engine unavailable: {err}");
    }

    while let Ok(command) = commands.recv() {
        let event = match command {
            RenderCommand::Shutdown => break,
            RenderCommand::Open(bytes) => match engine.as_mut() {
                Ok(engine) => match engine.load_document(bytes) {
                    Ok(page_count) => RenderEvent::DocumentLoaded { page_count },
                    Err(err) => RenderEvent::DocumentFailed(err),
                },
                Err(err) => RenderEvent::DocumentFailed(err.clone()),
            },
            RenderCommand::Render { key, scale } => {
                let result = match engine.as_mut() {
                    Ok(engine) => engine.render_page(key.page, scale),
                    Err(err) => Err(err.clone()),
                };
                match result {
                    Ok(image) => RenderEvent::PageRendered { key, image },
                    Err(error) => {
                        tracing::debug!(page = key.page, %error, "page render failed");
                        RenderEvent::PageFailed { key, error }
                    }
                }
            }
        };
        if events.send(event).is_err() {
            break;
        }
    }
}
