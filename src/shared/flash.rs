//! Session-scoped flash state.
//!
//! A flash is written while handling one request (usually right before a
//! redirect) and shown by the next page render. Reading removes it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shared::validation::FieldErrors;

/// One-time messages and form state carried to the next page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Flash {
    pub success_message: Option<String>,
    pub error_message: Option<String>,
    pub errors: FieldErrors,
    pub old_input: HashMap<String, String>,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn invalid(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            error_message: Some(message.into()),
            errors,
            ..Self::default()
        }
    }

    pub fn with_input(mut self, old_input: HashMap<String, String>) -> Self {
        self.old_input = old_input;
        self
    }
}

struct StoredFlash {
    flash: Flash,
    stored_at: Instant,
}

/// In-process flash storage keyed by session id.
pub struct FlashStore {
    entries: RwLock<HashMap<Uuid, StoredFlash>>,
    ttl: Duration,
}

impl FlashStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Replace the pending flash of a session.
    pub async fn put(&self, session_id: Uuid, flash: Flash) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, stored| stored.stored_at.elapsed() < self.ttl);
        entries.insert(
            session_id,
            StoredFlash {
                flash,
                stored_at: Instant::now(),
            },
        );
    }

    /// Remove and return the pending flash of a session.
    pub async fn take(&self, session_id: Uuid) -> Option<Flash> {
        let stored = self.entries.write().await.remove(&session_id)?;
        if stored.stored_at.elapsed() < self.ttl {
            Some(stored.flash)
        } else {
            None
        }
    }
}

/// Flash access for the current request's session.
///
/// Inserted into request extensions by `core::middleware::session_middleware`.
#[derive(Clone)]
pub struct FlashSession {
    pub id: Uuid,
    store: Arc<FlashStore>,
}

impl FlashSession {
    pub fn new(id: Uuid, store: Arc<FlashStore>) -> Self {
        Self { id, store }
    }

    pub async fn put(&self, flash: Flash) {
        self.store.put(self.id, flash).await;
    }

    /// Pending flash, or an empty one when nothing was flashed
    pub async fn take(&self) -> Flash {
        self.store.take(self.id).await.unwrap_or_default()
    }
}
