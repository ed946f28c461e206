use super::*;
use crate::app::{Message, Model, update};
use crate::library::{Book, BookType};
use crate::pdf::RenderError;
use crate::reader::PageKey;
use image::{DynamicImage, RgbaImage};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui_image::picker::Picker;
use std::path::Path;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 40);
    Terminal::new(backend).unwrap()
}

fn sample_book() -> Book {
    Book {
        title: "Ciências da Natureza".to_string(),
        author: "Ana Souza".to_string(),
        curriculum_component: "Ciências".to_string(),
        class_groups: vec!["6º ANO".to_string(), "7º ANO".to_string()],
        book_type: BookType::Professor,
        ..Book::local(Path::new("ciencias.pdf"))
    }
}

fn ready_model(page_count: usize) -> Model {
    let model = Model::new((80, 40));
    let model = update(model, Message::BookLoaded(sample_book()));
    update(model, Message::DocumentLoaded(page_count))
}

fn page_image() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        60,
        80,
        image::Rgba([255, 255, 255, 255]),
    ))
}

fn draw(model: &mut Model) -> String {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|c| c.symbol()).collect()
}

#[test]
fn test_render_shows_header_and_footer_chrome() {
    let mut model = ready_model(10);
    model.spread_index = 1;
    let content = draw(&mut model);
    assert!(content.contains("Ciências da Natureza"));
    assert!(content.contains("Ana Souza"));
    assert!(content.contains("Livro do Professor"));
    assert!(content.contains("Zoom 100%"));
    assert!(content.contains("Páginas 2 - 3 de 10"));
    assert!(content.contains("[Ciências]"));
    assert!(content.contains("6º ANO, 7º ANO"));
    assert!(content.contains("?:ajuda"));
}

#[test]
fn test_unrendered_spread_shows_placeholders_under_loading_overlay() {
    let mut model = ready_model(10);
    model.spread_index = 1;
    let content = draw(&mut model);
    assert!(content.contains("Página 2"));
    assert!(content.contains("Página 3"));
    assert!(content.contains("Carregando..."));
}

#[test]
fn test_rendered_cover_hides_loading_overlay() {
    let mut model = ready_model(10);
    model.accept_rendered_page(PageKey::new(1, model.zoom.index()), page_image());
    assert!(model.is_spread_ready());
    let content = draw(&mut model);
    assert!(content.contains("Capa (Página 1) de 10"));
    assert!(!content.contains("Carregando..."));
}

#[test]
fn test_rendered_page_draws_with_halfblocks() {
    let mut model = ready_model(10).with_picker(Some(Picker::halfblocks()));
    model.accept_rendered_page(PageKey::new(1, model.zoom.index()), page_image());
    let content = draw(&mut model);
    assert!(!content.contains("\u{250c}Página 1"));
    assert!(content.contains("Capa (Página 1) de 10"));
}

#[test]
fn test_zoom_change_keeps_previous_render_under_loading_overlay() {
    let mut model = ready_model(10).with_picker(Some(Picker::halfblocks()));
    model.accept_rendered_page(PageKey::new(1, model.zoom.index()), page_image());
    let mut model = update(model, Message::ZoomIn);
    assert!(!model.is_spread_ready());
    let content = draw(&mut model);
    assert!(!content.contains("\u{250c}Página 1"));
    assert!(content.contains("Carregando..."));
    assert!(content.contains("Zoom 125%"));
}

#[test]
fn test_fullscreen_hides_header_and_footer() {
    let mut model = ready_model(10);
    model = update(model, Message::ToggleFullscreen);
    let content = draw(&mut model);
    assert!(!content.contains("Ciências da Natureza"));
    assert!(!content.contains("?:ajuda"));
    assert!(content.contains("Página 1"));
}

#[test]
fn test_loading_book_shows_loading_message() {
    let mut model = Model::new((80, 40));
    let content = draw(&mut model);
    assert!(content.contains("Carregando livro..."));
}

#[test]
fn test_book_without_pdf_shows_unavailable_view() {
    let book = Book {
        pdf_url: None,
        ..sample_book()
    };
    let mut model = update(Model::new((80, 40)), Message::BookLoaded(book));
    let content = draw(&mut model);
    assert!(content.contains("PDF não disponível"));
    assert!(content.contains("Este livro ainda não possui um arquivo PDF associado."));
    assert!(content.contains("Voltar"));
}

#[test]
fn test_load_failure_shows_error_view() {
    let mut model = update(
        Model::new((80, 40)),
        Message::LoadFailed("Livro não encontrado".to_string()),
    );
    let content = draw(&mut model);
    assert!(content.contains("Erro ao carregar"));
    assert!(content.contains("Livro não encontrado"));
}

#[test]
fn test_help_overlay_lists_reader_keys() {
    let mut model = update(ready_model(10), Message::ToggleHelp);
    let content = draw(&mut model);
    assert!(content.contains("Ajuda"));
    assert!(content.contains("Tela cheia"));
    assert!(content.contains("Próximas páginas"));
}

#[test]
fn test_render_failure_toast_is_shown() {
    let mut model = ready_model(10);
    model.reject_page(
        PageKey::new(3, model.zoom.index()),
        &RenderError::Page {
            page: 3,
            message: "bad stream".to_string(),
        },
    );
    let content = draw(&mut model);
    assert!(content.contains("[aviso] Falha ao renderizar página 3"));
}

#[test]
fn test_flip_draws_turning_leaf() {
    let mut model = ready_model(10);
    model.spread_index = 1;
    model = update(model, Message::NextSpread);
    model = update(model, Message::Tick(250));
    let content = draw(&mut model);
    assert!(content.contains('\u{2591}'));
}

#[test]
fn test_idle_spread_has_no_leaf() {
    let mut model = ready_model(10);
    let content = draw(&mut model);
    assert!(!content.contains('\u{2591}'));
}

#[test]
fn test_reader_layout_regions() {
    let area = Rect::new(0, 0, 80, 24);
    let layout = reader_layout(area, false, false);
    assert_eq!(layout.header, Some(Rect::new(0, 0, 80, 1)));
    assert_eq!(layout.footer, Some(Rect::new(0, 23, 80, 1)));
    assert_eq!(layout.spread, Rect::new(1, 1, 78, 22));
    assert!(layout.toast.is_none());

    let full = reader_layout(area, true, true);
    assert!(full.header.is_none());
    assert!(full.footer.is_none());
    assert_eq!(full.toast, Some(Rect::new(0, 23, 80, 1)));
    assert_eq!(full.spread, Rect::new(1, 0, 78, 23));
}
