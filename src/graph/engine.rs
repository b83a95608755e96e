//! TracerEngine: documents and their trace sessions

use super::document::{Document, DocumentError, DocumentId};
use crate::config::ConfigError;
use crate::query::Direction;
use crate::trace::{TraceError, TraceHost, TraceReport, TraceSession};
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Errors that can occur in engine operations
#[derive(Debug, Error)]
pub enum TracerError {
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for engine operations
pub type TracerResult<T> = Result<T, TracerError>;

/// The main tracer engine
///
/// Owns the loaded documents and at most one trace session per document.
/// A document with no entry in `sessions` is idle.
///
/// `trace` and `clear` run the host callbacks with no map guard held, so a
/// host may call back into the engine (for example `upsert_document` from
/// `refresh_view`). Calls for one document are serialized on its session
/// slot: a host must not call `trace`, `clear` or `session` for the document
/// being traced from inside a callback.
#[derive(Debug, Default)]
pub struct TracerEngine {
    documents: DashMap<DocumentId, Arc<Document>>,
    sessions: DashMap<DocumentId, Arc<Mutex<TraceSession>>>,
}

impl TracerEngine {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
            sessions: DashMap::new(),
        }
    }

    /// Create or replace a document
    ///
    /// Replacing a document keeps its session; lookups against elements the
    /// new version no longer has come back empty.
    pub fn upsert_document(&self, document: Document) -> DocumentId {
        let id = document.id.clone();
        self.documents.insert(id.clone(), Arc::new(document));
        id
    }

    pub fn get_document(&self, id: &DocumentId) -> Option<Document> {
        self.documents.get(id).map(|r| r.as_ref().clone())
    }

    /// Remove a document and discard its session
    pub fn remove_document(&self, id: &DocumentId) -> Option<Document> {
        self.sessions.remove(id);
        self.documents.remove(id).map(|(_, doc)| Arc::unwrap_or_clone(doc))
    }

    pub fn list_documents(&self) -> Vec<DocumentId> {
        self.documents.iter().map(|r| r.key().clone()).collect()
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Current session for a document (`Idle` if none)
    pub fn session(&self, id: &DocumentId) -> TraceSession {
        let Some(slot) = self.sessions.get(id).map(|r| Arc::clone(r.value())) else {
            return TraceSession::Idle;
        };
        let session = lock(&slot).clone();
        session
    }

    fn snapshot(&self, id: &DocumentId) -> TracerResult<Arc<Document>> {
        self.documents
            .get(id)
            .map(|r| Arc::clone(r.value()))
            .ok_or_else(|| TracerError::DocumentNotFound(id.clone()))
    }

    fn session_slot(&self, id: &DocumentId) -> Arc<Mutex<TraceSession>> {
        Arc::clone(self.sessions.entry(id.clone()).or_default().value())
    }

    /// Run one trace step against a document and keep the resulting session.
    ///
    /// The step reads a snapshot of the document taken when the call starts.
    /// On error the stored session is left as it was.
    pub fn trace<H: TraceHost + ?Sized>(
        &self,
        id: &DocumentId,
        direction: Direction,
        host: &mut H,
    ) -> TracerResult<TraceReport> {
        let document = self.snapshot(id)?;
        let slot = self.session_slot(id);
        let mut session = lock(&slot);
        let step = session.trace(direction, &*document, host)?;
        *session = step.session;
        Ok(step.report)
    }

    pub fn find_precedents<H: TraceHost + ?Sized>(
        &self,
        id: &DocumentId,
        host: &mut H,
    ) -> TracerResult<TraceReport> {
        self.trace(id, Direction::Precedents, host)
    }

    pub fn find_dependents<H: TraceHost + ?Sized>(
        &self,
        id: &DocumentId,
        host: &mut H,
    ) -> TracerResult<TraceReport> {
        self.trace(id, Direction::Dependents, host)
    }

    /// End the document's trace session. Idempotent.
    pub fn clear<H: TraceHost + ?Sized>(&self, id: &DocumentId, host: &mut H) -> TracerResult<()> {
        if !self.documents.contains_key(id) {
            return Err(TracerError::DocumentNotFound(id.clone()));
        }
        let slot = self.session_slot(id);
        let mut session = lock(&slot);
        *session = session.clear(host);
        Ok(())
    }
}

/// A poisoned slot still holds the last committed session: a panicking host
/// interrupts a step before its result is stored.
fn lock(slot: &Mutex<TraceSession>) -> MutexGuard<'_, TraceSession> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
