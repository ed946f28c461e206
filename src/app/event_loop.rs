use std::io::stdout;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::pdf::{PdfiumEngine, RenderWorker};

use super::effects::{self, LoadEvent};

/// Frame interval while a flip is animating.
const FLIP_FRAME_MS: u64 = 33;
/// Poll interval while waiting on the loader or render thread.
const BACKGROUND_POLL_MS: u64 = 50;
const IDLE_POLL_MS: u64 = 250;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the reader until the user leaves.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure. Problems opening the book are shown in the
    /// reader rather than returned.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        // Create image picker BEFORE initializing terminal (queries stdio)
        let picker = if self.images_enabled {
            let _picker_scope = crate::perf::scope("app.create_picker");
            Some(crate::image::create_picker(self.force_half_cell))
        } else {
            None
        };

        let pdfium_lib: Option<PathBuf> = self.pdfium_lib.clone();
        let worker = RenderWorker::spawn(move || PdfiumEngine::new(pdfium_lib.as_deref()));
        let loads = self.spawn_loader();

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; folio requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let mut model = self.initial_model(picker, (size.width, size.height));
        crate::perf::log_event(
            "init.layout",
            format!(
                "terminal={}x{} zoom={} fullscreen={}",
                size.width,
                size.height,
                model.zoom.percent(),
                model.fullscreen
            ),
        );

        let result = execute!(stdout(), EnableMouseCapture)
            .context("Failed to enable mouse capture")
            .and_then(|()| self.event_loop(&mut terminal, &mut model, &worker, &loads));

        // Restore terminal
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(
        &self,
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        worker: &RenderWorker,
        loads: &Receiver<LoadEvent>,
    ) -> Result<()> {
        let start = Instant::now();
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            let now_ms = elapsed_ms();

            // Advance the clock: toasts expire and flips turn or settle.
            let was_flipping = !model.flip.is_idle();
            let had_toast = model.active_toast().is_some();
            *model = update(std::mem::take(model), Message::Tick(now_ms));
            let animating = was_flipping || !model.flip.is_idle();
            if had_toast != model.active_toast().is_some() {
                needs_render = true;
            }

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            while let Ok(load) = loads.try_recv() {
                effects::apply_load_event(model, worker, load);
                needs_render = true;
            }
            while let Some(rendered) = worker.try_recv() {
                effects::apply_render_event(model, rendered);
                needs_render = true;
            }
            let sent = effects::dispatch_renders(model, worker);
            if sent > 0 {
                crate::perf::log_event(
                    "render.dispatch",
                    format!("frame={frame_idx} sent={sent} spread={}", model.spread_index),
                );
            }

            // Handle events
            let poll_ms = if needs_render {
                0
            } else if animating {
                model
                    .flip
                    .next_deadline()
                    .map_or(0, |deadline| deadline.saturating_sub(now_ms).clamp(1, FLIP_FRAME_MS))
            } else if resize_debouncer.is_pending() {
                10
            } else if !model.is_ready() || model.has_pending_renders() {
                BACKGROUND_POLL_MS
            } else {
                IDLE_POLL_MS
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers use accurate times.
                let event_ms = elapsed_ms();
                let msg = self.handle_event(event::read()?, model, event_ms, &mut resize_debouncer);
                if let Some(msg) = msg {
                    crate::perf::log_event(
                        "event.message",
                        format!("frame={frame_idx} msg={msg:?}"),
                    );
                    effects::apply_input(model, msg, event_ms);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                let mut drained = 0_u32;
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = elapsed_ms();
                    let msg =
                        self.handle_event(event::read()?, model, drain_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        drained += 1;
                        effects::apply_input(model, msg, drain_ms);
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} drained={drained}"),
                    );
                }
            }

            if model.should_quit {
                break;
            }

            if needs_render || animating {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| self.view(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3} spread={} ready={}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0,
                        model.spread_index,
                        model.is_spread_ready()
                    ),
                );
                needs_render = false;
            }
        }
        Ok(())
    }
}
