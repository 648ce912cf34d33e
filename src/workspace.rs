//! # Document Workspace Module
//!
//! ## Purpose
//! Client-side state for the search view: the cached document list, at
//! most one open document, and the current match set. All mutation happens
//! on the single-threaded event flow; the only discipline needed is "last
//! write wins per slot".
//!
//! ## Stale Completions
//! Selecting a new document does not cancel an in-flight fetch, so a slow
//! earlier response can arrive after a faster later one. Every open is
//! tagged with a monotonically increasing ticket and completions whose
//! ticket is not the latest issued are discarded, so a stale response
//! never clobbers newer state.

use crate::api::documents::{DocumentSummary, DocumentUpload};
use crate::matcher::MatchSet;

/// Ticket identifying one issued open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

/// The currently open document.
#[derive(Debug, Clone)]
pub struct OpenDocument {
    pub id: i64,
    pub file_name: String,
    pub text: String,
}

/// Search-view state: document list, open document, active matches.
#[derive(Default)]
pub struct Workspace {
    documents: Vec<DocumentSummary>,
    open: Option<OpenDocument>,
    matches: Option<MatchSet>,
    latest_ticket: u64,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached document list.
    pub fn set_documents(&mut self, documents: Vec<DocumentSummary>) {
        self.documents = documents;
    }

    pub fn documents(&self) -> &[DocumentSummary] {
        &self.documents
    }

    /// Issue a ticket for an open request about to be sent. Any ticket
    /// issued earlier becomes stale immediately.
    pub fn begin_open(&mut self) -> RequestTicket {
        self.latest_ticket += 1;
        RequestTicket(self.latest_ticket)
    }

    /// Apply a completed open. Returns `false` (and changes nothing) when
    /// the ticket is stale, i.e. a newer open has been issued since.
    pub fn finish_open(&mut self, ticket: RequestTicket, document: DocumentUpload) -> bool {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(
                document_id = document.document_id,
                "discarding stale open completion"
            );
            return false;
        }
        self.open = Some(OpenDocument {
            id: document.document_id,
            file_name: document.file_name,
            text: document.text,
        });
        self.matches = None;
        true
    }

    pub fn open_document(&self) -> Option<&OpenDocument> {
        self.open.as_ref()
    }

    /// Run a whole-word search over the open document. Returns `None` when
    /// no document is open. A new search always resets navigation.
    pub fn search_word(&mut self, term: &str) -> Option<&MatchSet> {
        let text = &self.open.as_ref()?.text;
        self.matches = Some(MatchSet::for_term(text, term));
        self.matches.as_ref()
    }

    /// Highlight the union of letter-search candidate words over the open
    /// document. Returns `None` when no document is open.
    pub fn apply_letter_results(&mut self, words: &[String]) -> Option<&MatchSet> {
        let text = &self.open.as_ref()?.text;
        self.matches = Some(MatchSet::for_words(text, words));
        self.matches.as_ref()
    }

    pub fn matches(&self) -> Option<&MatchSet> {
        self.matches.as_ref()
    }

    pub fn next_match(&mut self) {
        if let Some(matches) = self.matches.as_mut() {
            matches.next();
        }
    }

    pub fn previous_match(&mut self) {
        if let Some(matches) = self.matches.as_mut() {
            matches.previous();
        }
    }

    /// Drop search state, keeping the open document.
    pub fn reset_search(&mut self) {
        self.matches = None;
    }
}
