use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use ratatui_image::picker::Picker;

use crate::app::{App, Message, Model, ReaderTarget, ToastLevel, update};
use crate::library::Book;
use crate::pdf::{RenderEvent, RenderWorker};

/// Progress reported by the book loader thread.
#[derive(Debug)]
pub(super) enum LoadEvent {
    Book(Book),
    Document(Vec<u8>),
    Failed(String),
}

impl App {
    pub(super) fn initial_model(&self, picker: Option<Picker>, terminal_size: (u16, u16)) -> Model {
        let mut model = Model::new(terminal_size).with_picker(picker);
        if let Some(percent) = self.zoom_percent
            && !model.zoom.set_scale(f32::from(percent) / 100.0)
        {
            tracing::debug!(percent, "zoom is not one of the available levels");
            model.show_toast(
                ToastLevel::Info,
                format!("Zoom {percent}% indisponível; usando {}%", model.zoom.percent()),
            );
        }
        model.initial_page = self.initial_page;
        model.fullscreen = self.fullscreen;
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model
    }

    /// Fetch the book record and its PDF bytes off the UI thread.
    pub(super) fn spawn_loader(&self) -> Receiver<LoadEvent> {
        let (tx, rx) = mpsc::channel();
        let target = self.target.clone();
        let thread_tx = tx.clone();
        if let Err(err) = thread::Builder::new()
            .name("folio-loader".to_string())
            .spawn(move || load_book(&target, &thread_tx))
        {
            let _ = tx.send(LoadEvent::Failed(format!("Erro ao carregar o livro: {err}")));
        }
        rx
    }
}

pub(super) fn load_book(target: &ReaderTarget, events: &Sender<LoadEvent>) {
    let _scope = crate::perf::scope("loader.total");
    // Send failures mean the reader already closed.
    match target {
        ReaderTarget::Local(path) => {
            let _ = events.send(LoadEvent::Book(Book::local(path)));
            let event = match std::fs::read(path) {
                Ok(bytes) => LoadEvent::Document(bytes),
                Err(err) => LoadEvent::Failed(format!(
                    "Erro ao carregar o livro: {}: {err}",
                    path.display()
                )),
            };
            let _ = events.send(event);
        }
        ReaderTarget::Remote { client, book_id } => {
            let book = match client.get_book_by_id(book_id) {
                Ok(book) => book,
                Err(err) => {
                    let _ = events.send(LoadEvent::Failed(err.to_string()));
                    return;
                }
            };
            let pdf_url = book.pdf_path().map(|path| client.resolve_pdf_url(path));
            let _ = events.send(LoadEvent::Book(book));
            let Some(url) = pdf_url else {
                return;
            };
            crate::perf::log_event("loader.fetch", format!("url={url}"));
            let event = match client.fetch_pdf(&url) {
                Ok(bytes) => LoadEvent::Document(bytes),
                Err(err) => LoadEvent::Failed(err.to_string()),
            };
            let _ = events.send(event);
        }
    }
}

pub(super) fn apply_load_event(model: &mut Model, worker: &RenderWorker, event: LoadEvent) {
    match event {
        LoadEvent::Book(book) => {
            *model = update(std::mem::take(model), Message::BookLoaded(book));
        }
        LoadEvent::Document(bytes) => {
            crate::perf::log_event("loader.document", format!("bytes={}", bytes.len()));
            worker.open(bytes);
        }
        LoadEvent::Failed(reason) => {
            *model = update(std::mem::take(model), Message::LoadFailed(reason));
        }
    }
}

pub(super) fn apply_render_event(model: &mut Model, event: RenderEvent) {
    match event {
        RenderEvent::DocumentLoaded { page_count } => {
            *model = update(std::mem::take(model), Message::DocumentLoaded(page_count));
        }
        RenderEvent::DocumentFailed(err) => {
            let reason = format!("Erro ao carregar o livro: {err}");
            *model = update(std::mem::take(model), Message::LoadFailed(reason));
        }
        RenderEvent::PageRendered { key, image } => model.accept_rendered_page(key, image),
        RenderEvent::PageFailed { key, error } => model.reject_page(key, &error),
    }
}

/// Apply an input message at the time its event was read, so a flip is
/// timed from the key press rather than from the last loop tick.
pub(super) fn apply_input(model: &mut Model, msg: Message, event_ms: u64) {
    *model = update(std::mem::take(model), Message::Tick(event_ms));
    *model = update(std::mem::take(model), msg);
}

/// Send the renders the current spread needs. Returns how many were sent.
pub(super) fn dispatch_renders(model: &mut Model, worker: &RenderWorker) -> usize {
    let requests = model.plan_renders();
    for (key, scale) in &requests {
        worker.request(*key, *scale);
    }
    requests.len()
}
