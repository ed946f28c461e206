//! School library records and the REST API that serves them.
//!
//! Only the pieces the reader needs are modelled here: the [`Book`]
//! record, how stored upload paths become fetchable URLs, the session
//! token, and a blocking [`LibraryClient`].

mod client;
mod session;

pub use client::{LibraryClient, LibraryError};
pub use session::Session;

use std::path::Path;

use serde::{Deserialize, Serialize};

/// API base used when neither the CLI nor the environment provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Path prefix of files stored by the upload service.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Which edition of a title a book record is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookType {
    Student,
    Professor,
}

impl BookType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Livro do Aluno",
            Self::Professor => "Livro do Professor",
        }
    }
}

/// A book record as returned by `GET /books/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_url: String,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub curriculum_component: String,
    pub book_type: BookType,
    #[serde(default)]
    pub class_groups: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Book {
    /// Record for a PDF opened straight from disk.
    pub fn local(path: &Path) -> Self {
        let title = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().to_string());
        Self {
            id: path.display().to_string(),
            title,
            author: String::new(),
            description: String::new(),
            cover_url: String::new(),
            pdf_url: Some(path.display().to_string()),
            curriculum_component: String::new(),
            book_type: BookType::Student,
            class_groups: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// The PDF location, treating an empty string as absent.
    pub fn pdf_path(&self) -> Option<&str> {
        self.pdf_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Class groups joined for display, e.g. `1º ANO, 2º ANO`.
    pub fn class_groups_label(&self) -> String {
        self.class_groups.join(", ")
    }
}

/// Origin that serves uploads: the API base without a trailing `/api`.
pub fn server_root(api_base: &str) -> &str {
    api_base
        .strip_suffix("/api/")
        .or_else(|| api_base.strip_suffix("/api"))
        .unwrap_or(api_base)
}

/// Turn a stored PDF path into a fetchable URL.
///
/// Upload paths get the server root prepended; anything else is already a
/// full URL and is returned unchanged.
pub fn resolve_pdf_url(server_root: &str, path: &str) -> String {
    if path.starts_with(UPLOADS_PREFIX) {
        format!("{server_root}{path}")
    } else {
        path.to_string()
    }
}
