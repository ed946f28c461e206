use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use image::{DynamicImage, RgbaImage};
use tempfile::tempdir;

use crate::library::{Book, BookType};
use crate::pdf::testing::FakeEngine;
use crate::pdf::{RenderError, RenderEvent, RenderWorker};
use crate::reader::{FLIP_PHASE_MS, FlipPhase, PageKey};

use super::effects::{self, LoadEvent};
use super::event_loop::ResizeDebouncer;
use super::{App, Message, Model, ReaderPhase, ReaderTarget, ToastLevel, update};

const WAIT: Duration = Duration::from_secs(5);

fn test_app() -> App {
    App::new(ReaderTarget::Local(PathBuf::from("livro.pdf")))
}

fn sample_book() -> Book {
    Book {
        id: "42".to_string(),
        title: "Geografia".to_string(),
        book_type: BookType::Student,
        pdf_url: Some("/uploads/geografia.pdf".to_string()),
        ..Book::local(std::path::Path::new("geografia.pdf"))
    }
}

fn ready_model(page_count: usize) -> Model {
    let model = update(Model::new((80, 24)), Message::BookLoaded(sample_book()));
    update(model, Message::DocumentLoaded(page_count))
}

fn key(code: KeyCode) -> event::KeyEvent {
    event::KeyEvent::new(code, KeyModifiers::NONE)
}

fn click(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn blank_page() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::new(4, 6))
}

// Loading

#[test]
fn test_book_with_pdf_moves_to_loading_document() {
    let model = update(Model::default(), Message::BookLoaded(sample_book()));
    assert_eq!(model.phase, ReaderPhase::LoadingDocument);
    assert_eq!(model.book.as_ref().map(|b| b.id.as_str()), Some("42"));
}

#[test]
fn test_book_without_pdf_shows_no_pdf() {
    for pdf_url in [None, Some(String::new()), Some("  ".to_string())] {
        let book = Book {
            pdf_url,
            ..sample_book()
        };
        let model = update(Model::default(), Message::BookLoaded(book));
        assert_eq!(model.phase, ReaderPhase::NoPdf);
        assert!(model.current_spread().is_none());
    }
}

#[test]
fn test_document_loaded_opens_cover() {
    let model = ready_model(48);
    assert!(model.is_ready());
    assert_eq!(model.spread_index, 0);
    assert_eq!(model.total_spreads(), 25);
    assert_eq!(model.page_label().as_deref(), Some("Capa (Página 1) de 48"));
}

#[test]
fn test_document_loaded_opens_initial_page() {
    let mut model = update(Model::default(), Message::BookLoaded(sample_book()));
    model.initial_page = Some(7);
    let model = update(model, Message::DocumentLoaded(48));
    assert_eq!(model.spread_index, 3);
    assert_eq!(model.page_label().as_deref(), Some("Páginas 6 - 7 de 48"));
}

#[test]
fn test_empty_document_fails() {
    let model = update(Model::default(), Message::DocumentLoaded(0));
    assert!(matches!(model.phase, ReaderPhase::Failed(_)));
    assert!(model.current_spread().is_none());
}

#[test]
fn test_load_failure_is_terminal() {
    let model = update(
        Model::default(),
        Message::LoadFailed("Livro não encontrado".to_string()),
    );
    assert_eq!(
        model.phase,
        ReaderPhase::Failed("Livro não encontrado".to_string())
    );
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Error));
    let model = update(model, Message::NextSpread);
    assert_eq!(model.spread_index, 0);
}

// Navigation

#[test]
fn test_next_spread_turns_after_leaving_phase() {
    let model = ready_model(10);
    let model = update(model, Message::NextSpread);
    assert_eq!(model.spread_index, 0);
    assert!(matches!(model.flip.phase(), FlipPhase::Leaving(_)));

    let model = update(model, Message::Tick(FLIP_PHASE_MS - 1));
    assert_eq!(model.spread_index, 0);

    let model = update(model, Message::Tick(FLIP_PHASE_MS));
    assert_eq!(model.spread_index, 1);
    assert!(matches!(model.flip.phase(), FlipPhase::Entering(_)));

    let model = update(model, Message::Tick(2 * FLIP_PHASE_MS));
    assert!(model.flip.is_idle());
    assert_eq!(model.spread_index, 1);
}

#[test]
fn test_navigation_during_flip_is_dropped() {
    let model = ready_model(10);
    let model = update(model, Message::NextSpread);
    let model = update(model, Message::Tick(100));
    let model = update(model, Message::NextSpread);
    let model = update(model, Message::Tick(10_000));
    assert_eq!(model.spread_index, 1);
}

#[test]
fn test_late_tick_applies_whole_flip() {
    let model = ready_model(10);
    let model = update(model, Message::NextSpread);
    let model = update(model, Message::Tick(5_000));
    assert_eq!(model.spread_index, 1);
    assert!(model.flip.is_idle());
}

#[test]
fn test_flip_is_timed_from_key_press_after_idle_gap() {
    let mut model = update(ready_model(10), Message::Tick(1_000));
    let key_ms = 1_240;
    effects::apply_input(&mut model, Message::NextSpread, key_ms);

    model = update(model, Message::Tick(key_ms + FLIP_PHASE_MS - 1));
    assert!(matches!(model.flip.phase(), FlipPhase::Leaving(_)));
    assert_eq!(model.spread_index, 0);

    model = update(model, Message::Tick(key_ms + FLIP_PHASE_MS));
    assert!(matches!(model.flip.phase(), FlipPhase::Entering(_)));
    assert_eq!(model.spread_index, 1);
}

#[test]
fn test_prev_spread_at_cover_is_noop() {
    let model = update(ready_model(10), Message::PrevSpread);
    assert!(model.flip.is_idle());
    assert_eq!(model.spread_index, 0);
}

#[test]
fn test_next_spread_at_end_is_noop() {
    let mut model = ready_model(10);
    model.spread_index = model.total_spreads() - 1;
    let model = update(model, Message::NextSpread);
    assert!(model.flip.is_idle());
}

#[test]
fn test_first_and_last_jump_and_cancel_flip() {
    let model = update(ready_model(10), Message::NextSpread);
    let model = update(model, Message::LastSpread);
    assert!(model.flip.is_idle());
    assert_eq!(model.spread_index, 5);
    assert_eq!(model.page_label().as_deref(), Some("Página 10 de 10"));

    let model = update(model, Message::FirstSpread);
    assert_eq!(model.spread_index, 0);
}

#[test]
fn test_navigation_ignored_before_ready() {
    let model = update(Model::default(), Message::NextSpread);
    assert!(model.flip.is_idle());
    let model = update(model, Message::LastSpread);
    assert_eq!(model.spread_index, 0);
}

// Zoom and view

#[test]
fn test_zoom_steps_and_clamps() {
    let model = ready_model(10);
    assert_eq!(model.zoom.percent(), 100);
    let model = update(model, Message::ZoomIn);
    let model = update(model, Message::ZoomIn);
    let model = update(model, Message::ZoomIn);
    assert_eq!(model.zoom.percent(), 150);
    let model = update(model, Message::ZoomReset);
    assert_eq!(model.zoom.percent(), 100);
    let model = update(model, Message::ZoomOut);
    let model = update(model, Message::ZoomOut);
    let model = update(model, Message::ZoomOut);
    assert_eq!(model.zoom.percent(), 50);
}

#[test]
fn test_zoom_and_fullscreen_work_mid_flip() {
    let model = update(ready_model(10), Message::NextSpread);
    let model = update(model, Message::ZoomIn);
    let model = update(model, Message::ToggleFullscreen);
    assert!(!model.flip.is_idle());
    assert_eq!(model.zoom.percent(), 125);
    assert!(model.fullscreen);
}

#[test]
fn test_zoom_change_makes_spread_not_ready() {
    let mut model = ready_model(10);
    model.accept_rendered_page(PageKey::new(1, model.zoom.index()), blank_page());
    assert!(model.is_spread_ready());
    let model = update(model, Message::ZoomIn);
    assert!(!model.is_spread_ready());
}

#[test]
fn test_toast_lifecycle() {
    let mut model = Model::default();
    model.show_toast(ToastLevel::Warning, "Falha ao renderizar página 3");
    let (msg, level) = model.active_toast().expect("toast should be set");
    assert_eq!(msg, "Falha ao renderizar página 3");
    assert_eq!(level, ToastLevel::Warning);
    let model = update(model, Message::Tick(1_000));
    assert!(model.active_toast().is_some());
    let model = update(model, Message::Tick(5_000));
    assert!(model.active_toast().is_none());
}

#[test]
fn test_resize_updates_terminal_size() {
    let model = update(Model::default(), Message::Resize(120, 40));
    assert_eq!(model.terminal_size, (120, 40));
}

// Render planning

#[test]
fn test_plan_renders_covers_current_and_next_spread() {
    let mut model = ready_model(10);
    let planned = model.plan_renders();
    let pages: Vec<usize> = planned.iter().map(|(key, _)| key.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
    assert!(planned.iter().all(|(_, scale)| (*scale - 1.0).abs() < f32::EPSILON));
    assert!(model.plan_renders().is_empty());
    assert!(model.has_pending_renders());
}

#[test]
fn test_plan_renders_uses_zoom_scale() {
    let mut model = update(ready_model(10), Message::ZoomOut);
    let planned = model.plan_renders();
    assert!(planned.iter().all(|(key, scale)| {
        key.zoom == 1 && (*scale - 0.75).abs() < f32::EPSILON
    }));
}

#[test]
fn test_failed_page_is_not_requested_again() {
    let mut model = ready_model(10);
    model.plan_renders();
    let key = PageKey::new(1, model.zoom.index());
    model.reject_page(
        key,
        &RenderError::Page {
            page: 1,
            message: "broken".to_string(),
        },
    );
    assert!(model.is_page_failed(1));
    assert!(!model.is_spread_ready());
    assert!(model.plan_renders().iter().all(|(k, _)| *k != key));
}

#[test]
fn test_stale_render_is_kept_for_later() {
    let mut model = ready_model(10);
    model.plan_renders();
    model.spread_index = 3;
    model.accept_rendered_page(PageKey::new(2, model.zoom.index()), blank_page());
    assert!(model.is_page_rendered(2));
    assert!(!model.is_spread_ready());
}

// Input

#[test]
fn test_arrow_keys_navigate() {
    let app = test_app();
    let model = ready_model(10);
    for code in [KeyCode::Right, KeyCode::PageDown, KeyCode::Char(' '), KeyCode::Char('l')] {
        assert_eq!(app.handle_key(key(code), &model), Some(Message::NextSpread));
    }
    for code in [KeyCode::Left, KeyCode::PageUp, KeyCode::Char('h')] {
        assert_eq!(app.handle_key(key(code), &model), Some(Message::PrevSpread));
    }
    assert_eq!(app.handle_key(key(KeyCode::Home), &model), Some(Message::FirstSpread));
    assert_eq!(app.handle_key(key(KeyCode::End), &model), Some(Message::LastSpread));
}

#[test]
fn test_zoom_and_view_keys() {
    let app = test_app();
    let model = ready_model(10);
    assert_eq!(app.handle_key(key(KeyCode::Char('+')), &model), Some(Message::ZoomIn));
    assert_eq!(app.handle_key(key(KeyCode::Char('=')), &model), Some(Message::ZoomIn));
    assert_eq!(app.handle_key(key(KeyCode::Char('-')), &model), Some(Message::ZoomOut));
    assert_eq!(app.handle_key(key(KeyCode::Char('0')), &model), Some(Message::ZoomReset));
    assert_eq!(
        app.handle_key(key(KeyCode::F(11)), &model),
        Some(Message::ToggleFullscreen)
    );
    assert_eq!(app.handle_key(key(KeyCode::Char('?')), &model), Some(Message::ToggleHelp));
}

#[test]
fn test_escape_leaves_fullscreen_before_quitting() {
    let app = test_app();
    let model = update(ready_model(10), Message::ToggleFullscreen);
    assert_eq!(app.handle_key(key(KeyCode::Esc), &model), Some(Message::ExitFullscreen));
    let model = update(model, Message::ExitFullscreen);
    assert_eq!(app.handle_key(key(KeyCode::Esc), &model), Some(Message::Quit));
}

#[test]
fn test_save_and_print_shortcuts_are_swallowed() {
    let app = test_app();
    let model = ready_model(10);
    for modifiers in [KeyModifiers::CONTROL, KeyModifiers::SUPER] {
        for c in ['s', 'p'] {
            let key = event::KeyEvent::new(KeyCode::Char(c), modifiers);
            assert_eq!(app.handle_key(key, &model), None);
        }
    }
    let ctrl_c = event::KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(app.handle_key(ctrl_c, &model), Some(Message::Quit));
}

#[test]
fn test_key_release_is_ignored() {
    let app = test_app();
    let model = ready_model(10);
    let mut release = key(KeyCode::Right);
    release.kind = KeyEventKind::Release;
    assert_eq!(app.handle_key(release, &model), None);
}

#[test]
fn test_any_key_closes_help() {
    let app = test_app();
    let model = update(ready_model(10), Message::ToggleHelp);
    assert_eq!(app.handle_key(key(KeyCode::Right), &model), Some(Message::HideHelp));
}

#[test]
fn test_only_quit_and_help_before_ready() {
    let app = test_app();
    let model = Model::default();
    assert_eq!(app.handle_key(key(KeyCode::Right), &model), None);
    assert_eq!(app.handle_key(key(KeyCode::Char('+')), &model), None);
    assert_eq!(app.handle_key(key(KeyCode::Char('q')), &model), Some(Message::Quit));
    assert_eq!(app.handle_key(key(KeyCode::Esc), &model), Some(Message::Quit));
}

#[test]
fn test_click_halves_navigate() {
    let app = test_app();
    let model = ready_model(10);
    let right = click(MouseEventKind::Up(MouseButton::Left), 60, 10);
    let left = click(MouseEventKind::Up(MouseButton::Left), 10, 10);
    assert_eq!(app.handle_mouse(right, &model), Some(Message::NextSpread));
    assert_eq!(app.handle_mouse(left, &model), Some(Message::PrevSpread));
}

#[test]
fn test_click_on_chrome_is_ignored() {
    let app = test_app();
    let model = ready_model(10);
    let header = click(MouseEventKind::Up(MouseButton::Left), 60, 0);
    let footer = click(MouseEventKind::Up(MouseButton::Left), 60, 23);
    assert_eq!(app.handle_mouse(header, &model), None);
    assert_eq!(app.handle_mouse(footer, &model), None);
}

#[test]
fn test_right_click_is_swallowed() {
    let app = test_app();
    let model = ready_model(10);
    let down = click(MouseEventKind::Down(MouseButton::Right), 60, 10);
    let up = click(MouseEventKind::Up(MouseButton::Right), 60, 10);
    assert_eq!(app.handle_mouse(down, &model), None);
    assert_eq!(app.handle_mouse(up, &model), None);
}

#[test]
fn test_scroll_wheel_navigates() {
    let app = test_app();
    let model = ready_model(10);
    let down = click(MouseEventKind::ScrollDown, 40, 10);
    let up = click(MouseEventKind::ScrollUp, 40, 10);
    assert_eq!(app.handle_mouse(down, &model), Some(Message::NextSpread));
    assert_eq!(app.handle_mouse(up, &model), Some(Message::PrevSpread));
}

#[test]
fn test_resize_debouncer_waits_for_quiet_period() {
    let mut debouncer = ResizeDebouncer::new(100);
    debouncer.queue(100, 30, 0);
    assert!(debouncer.is_pending());
    assert_eq!(debouncer.take_ready(50), None);
    debouncer.queue(120, 40, 60);
    assert_eq!(debouncer.take_ready(150), None);
    assert_eq!(debouncer.take_ready(160), Some((120, 40)));
    assert!(!debouncer.is_pending());
}

// Effects

#[test]
fn test_initial_model_applies_app_options() {
    let app = test_app()
        .with_zoom_percent(Some(125))
        .with_initial_page(Some(9))
        .with_fullscreen(true)
        .with_config_paths(Some(PathBuf::from("/etc/folio")), None);
    let model = app.initial_model(None, (100, 30));
    assert_eq!(model.zoom.percent(), 125);
    assert_eq!(model.initial_page, Some(9));
    assert!(model.fullscreen);
    assert_eq!(model.terminal_size, (100, 30));
    assert_eq!(model.config_global_path, Some(PathBuf::from("/etc/folio")));
}

#[test]
fn test_initial_model_ignores_unknown_zoom() {
    let model = test_app()
        .with_zoom_percent(Some(333))
        .initial_model(None, (80, 24));
    assert_eq!(model.zoom.percent(), 100);
}

#[test]
fn test_local_loader_reads_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("historia.pdf");
    std::fs::write(&path, FakeEngine::document(6)).unwrap();

    let (tx, rx) = mpsc::channel();
    effects::load_book(&ReaderTarget::Local(path), &tx);
    match rx.recv_timeout(WAIT) {
        Ok(LoadEvent::Book(book)) => assert_eq!(book.title, "historia"),
        other => panic!("unexpected event: {other:?}"),
    }
    match rx.recv_timeout(WAIT) {
        Ok(LoadEvent::Document(bytes)) => assert_eq!(bytes, FakeEngine::document(6)),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn test_local_loader_reports_missing_file() {
    let dir = tempdir().unwrap();
    let (tx, rx) = mpsc::channel();
    effects::load_book(&ReaderTarget::Local(dir.path().join("nada.pdf")), &tx);
    assert!(matches!(rx.recv_timeout(WAIT), Ok(LoadEvent::Book(_))));
    assert!(matches!(rx.recv_timeout(WAIT), Ok(LoadEvent::Failed(_))));
}

#[test]
fn test_render_events_drive_model() {
    let mut model = update(Model::default(), Message::BookLoaded(sample_book()));
    effects::apply_render_event(&mut model, RenderEvent::DocumentLoaded { page_count: 5 });
    assert!(model.is_ready());

    let key = PageKey::new(1, model.zoom.index());
    effects::apply_render_event(
        &mut model,
        RenderEvent::PageRendered {
            key,
            image: blank_page(),
        },
    );
    assert!(model.is_spread_ready());

    effects::apply_render_event(
        &mut model,
        RenderEvent::PageFailed {
            key: PageKey::new(2, key.zoom),
            error: RenderError::NoDocument,
        },
    );
    assert!(model.is_page_failed(2));
    assert!(model.active_toast().is_some());
}

#[test]
fn test_document_failure_shows_error() {
    let mut model = Model::default();
    effects::apply_render_event(
        &mut model,
        RenderEvent::DocumentFailed(RenderError::Load("corrupt".to_string())),
    );
    assert!(matches!(&model.phase, ReaderPhase::Failed(reason) if reason.contains("corrupt")));
}

#[test]
fn test_worker_round_trip_makes_spread_ready() {
    let worker = RenderWorker::spawn(|| Ok(FakeEngine::default()));
    let mut model = Model::default();
    effects::apply_load_event(&mut model, &worker, LoadEvent::Book(sample_book()));
    effects::apply_load_event(&mut model, &worker, LoadEvent::Document(FakeEngine::document(9)));

    let loaded = worker.recv_timeout(WAIT).expect("document event");
    effects::apply_render_event(&mut model, loaded);
    assert!(model.is_ready());

    let sent = effects::dispatch_renders(&mut model, &worker);
    assert_eq!(sent, 3);
    assert_eq!(effects::dispatch_renders(&mut model, &worker), 0);
    for _ in 0..sent {
        let event = worker.recv_timeout(WAIT).expect("render event");
        effects::apply_render_event(&mut model, event);
    }
    assert!(model.is_spread_ready());
    assert!(!model.has_pending_renders());
    assert!(model.is_page_rendered(3));
}
