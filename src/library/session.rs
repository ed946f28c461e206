use std::sync::{Arc, Mutex, MutexGuard};

/// Bearer token shared by every request of one reader run.
///
/// Created once at startup with [`Session::begin`] and cleared with
/// [`Session::end`] when the server rejects the token. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<Mutex<Option<String>>>,
}

impl Session {
    /// Start a session. Blank tokens are treated as anonymous.
    pub fn begin(token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self {
            token: Arc::new(Mutex::new(token)),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    /// Drop the token; later requests go out anonymous.
    pub fn end(&self) {
        if self.lock().take().is_some() {
            tracing::debug!("library session ended");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        match self.token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
