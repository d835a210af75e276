//! High-level pipeline: aggregate → render → store.
//!
//! [`export`] takes the complete, already-fetched quote list and turns it into
//! one stored document per work.
//!
//! # Responsibilities
//! - Fail fast: every document is rendered before the first write, so a
//!   malformed record leaves the store untouched.
//! - Write documents in first-occurrence order of their works.
//! - Report what was written for the caller to surface.
//!
//! Storage failures are returned with the filename and not retried.

use chrono::TimeZone;
use tracing::{error, info};

use crate::aggregate::aggregate;
use crate::contract::DocumentStore;
use crate::error::{ExportError, Result};
use crate::model::Quote;
use crate::render::DocumentRenderer;
use crate::store::{plan_filenames, TitleCollision};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub documents: Vec<DocumentReport>,
}

impl ExportReport {
    pub fn quotes(&self) -> usize {
        self.documents.iter().map(|d| d.quotes).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    pub work_id: String,
    pub title: String,
    pub filename: String,
    pub path: std::path::PathBuf,
    pub quotes: usize,
}

struct PendingDocument {
    work_id: String,
    title: String,
    filename: String,
    contents: String,
    quotes: usize,
}

pub async fn export<S, Tz>(
    quotes: &[Quote],
    renderer: &DocumentRenderer<Tz>,
    store: &S,
    collision: TitleCollision,
) -> Result<ExportReport>
where
    S: DocumentStore + ?Sized,
    Tz: TimeZone,
{
    info!(quotes = quotes.len(), "[EXPORT] Starting export");
    let aggregation = aggregate(quotes)?;
    let filenames = plan_filenames(&aggregation.works, collision);

    let pending = aggregation
        .works
        .iter()
        .zip(filenames)
        .map(|(work, filename)| -> Result<PendingDocument> {
            let work_quotes = aggregation.quotes_for(work);
            let contents = renderer.render(work, work_quotes)?;
            Ok(PendingDocument {
                work_id: work.uuid.clone(),
                title: work.title.clone(),
                filename,
                contents,
                quotes: work_quotes.len(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    info!(documents = pending.len(), "[EXPORT] Rendered all documents");

    let mut documents = Vec::with_capacity(pending.len());
    for doc in pending {
        let path = store
            .write_document(&doc.filename, &doc.contents)
            .await
            .map_err(|source| {
                error!(filename = %doc.filename, error = %source, "[EXPORT][ERROR] Storing document failed");
                ExportError::Storage {
                    filename: doc.filename.clone(),
                    source,
                }
            })?;
        info!(work_id = %doc.work_id, path = %path.display(), quotes = doc.quotes, "[EXPORT] Stored document");
        documents.push(DocumentReport {
            work_id: doc.work_id,
            title: doc.title,
            filename: doc.filename,
            path,
            quotes: doc.quotes,
        });
    }

    Ok(ExportReport { documents })
}
