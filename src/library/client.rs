use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use thiserror::Error;

use super::{Book, Session, resolve_pdf_url, server_root};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Livro não encontrado")]
    NotFound { id: String },
    #[error("Sessão expirada ou não autorizada")]
    Unauthorized,
    #[error("Resposta inesperada do servidor ({status}) para {url}")]
    Status { status: u16, url: String },
    #[error("URL inválida {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Arquivo PDF vazio em {url}")]
    EmptyPdf { url: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Blocking client for the library REST API.
#[derive(Debug, Clone)]
pub struct LibraryClient {
    http: Client,
    api_base: String,
    session: Session,
}

impl LibraryClient {
    /// Build a client for `api_base`, e.g. `http://localhost:3001/api`.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be constructed.
    pub fn new(api_base: &str, session: Session) -> Result<Self, LibraryError> {
        let api_base = api_base.trim_end_matches('/').to_string();
        let mut builder = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")));
        if api_base.starts_with("http://127.0.0.1") || api_base.starts_with("http://localhost") {
            builder = builder.no_proxy();
        }
        Ok(Self {
            http: builder.build()?,
            api_base,
            session,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn server_root(&self) -> &str {
        server_root(&self.api_base)
    }

    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Resolve a book's stored PDF path against this server.
    pub fn resolve_pdf_url(&self, path: &str) -> String {
        resolve_pdf_url(self.server_root(), path)
    }

    /// Fetch one book record.
    ///
    /// # Errors
    ///
    /// [`LibraryError::NotFound`] for a 404, [`LibraryError::Unauthorized`]
    /// for a 401 (which also ends the session), and transport or decoding
    /// failures otherwise.
    pub fn get_book_by_id(&self, id: &str) -> Result<Book, LibraryError> {
        let url = self.book_url(id)?;
        tracing::debug!(%url, "fetching book record");
        let response = self.authorized(self.http.get(url.as_str())).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(LibraryError::NotFound { id: id.to_string() }),
            StatusCode::UNAUTHORIZED => {
                self.session.end();
                Err(LibraryError::Unauthorized)
            }
            status if !status.is_success() => Err(LibraryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
            _ => Ok(response.json::<Book>()?),
        }
    }

    /// Download the PDF at `url`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-success statuses and empty bodies.
    pub fn fetch_pdf(&self, url: &str) -> Result<Vec<u8>, LibraryError> {
        tracing::debug!(url, "fetching pdf");
        let response = self.authorized(self.http.get(url)).send()?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.end();
            return Err(LibraryError::Unauthorized);
        }
        if !response.status().is_success() {
            return Err(LibraryError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = response.bytes()?;
        if bytes.is_empty() {
            return Err(LibraryError::EmptyPdf {
                url: url.to_string(),
            });
        }
        Ok(bytes.to_vec())
    }

    fn book_url(&self, id: &str) -> Result<reqwest::Url, LibraryError> {
        let invalid = |reason: String| LibraryError::InvalidUrl {
            url: self.api_base.clone(),
            reason,
        };
        let mut url = reqwest::Url::parse(&self.api_base).map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .push("books")
            .push(id);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}
