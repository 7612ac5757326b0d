//! Host-facing discovery service
//!
//! Wraps the engine, a document library, and one session's memory
//! behind a small API. Initialize once per user session, call
//! `discover` per keystroke or transcription update.
//!
//! History recording is deferred to a spawned task so it can never
//! delay a discovery call or surface a failure to the caller; the
//! result the user sees is computed and returned before the session
//! store is touched.

use crate::engine::DiscoveryEngine;
use crate::library::DocumentLibrary;
use crate::session::{SessionStore, SessionSummary};
use crate::types::{DiscoveryRequest, DiscoveryResult, Locale};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One user session's discovery surface.
pub struct DiscoveryService {
    engine: DiscoveryEngine,
    library: DocumentLibrary,
    session: Arc<Mutex<SessionStore>>,
}

impl DiscoveryService {
    pub fn new(library: DocumentLibrary) -> Self {
        Self {
            engine: DiscoveryEngine::new(),
            library,
            session: Arc::new(Mutex::new(SessionStore::new())),
        }
    }

    /// Service backed by the built-in starter corpus.
    pub fn with_starter_corpus() -> Self {
        Self::new(DocumentLibrary::starter())
    }

    /// Run a discovery call and schedule the history recording.
    pub async fn discover(&self, text: &str, locale: Locale) -> Result<DiscoveryResult> {
        let request = DiscoveryRequest::with_locale(text, locale);

        let result = {
            let session = self.session.lock().await;
            self.engine
                .discover(&request, &session, self.library.candidates())
        };

        // Deferred recording: the caller gets the batch now; the session
        // store absorbs it on the next scheduling turn. A recording
        // failure is logged and dropped, never returned.
        if !result.ranked.is_empty() {
            let session = Arc::clone(&self.session);
            let recorded = result.clone();
            tokio::spawn(async move {
                let mut store = session.lock().await;
                if let Err(err) = store.record_search(&request, &recorded) {
                    tracing::warn!(error = %err, "failed to record search history");
                }
            });
        }

        Ok(result)
    }

    /// Feedback hook: the user opened or chose a result.
    pub async fn record_selection(&self, document_id: &str) {
        let mut store = self.session.lock().await;
        store.record_selection(document_id);
    }

    /// Aggregate session view for the host UI.
    pub async fn summary(&self) -> SessionSummary {
        self.session.lock().await.summary()
    }
}
