//! # contract: seams between the export pipeline and its collaborators
//!
//! The pipeline itself is pure: it aggregates quotes and renders text. Getting
//! quotes in and documents out happens behind two traits:
//!
//! - [`QuoteSource`] serves one page of quotes at a time (HTTP API, JSON dump, mock).
//! - [`DocumentStore`] persists one rendered document under a filename.
//!
//! ## Mocking & Testing
//! Both traits are annotated for `mockall`; with the default `test-export-mocks`
//! feature the generated `MockQuoteSource` and `MockDocumentStore` are exported
//! so integration tests can drive the pipeline deterministically.

use async_trait::async_trait;
use std::path::PathBuf;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::{FetchError, StoreError};
use crate::model::Quote;

/// Largest page size the data source accepts.
pub const MAX_PER_PAGE: u32 = 50;

/// Request for a single page of quotes. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub per_page: u32,
    pub page: u32,
}

impl PageParams {
    pub fn first(per_page: u32) -> Self {
        PageParams { per_page, page: 1 }
    }

    pub fn next(self) -> Self {
        PageParams {
            page: self.page + 1,
            ..self
        }
    }
}

/// Trait for fetching quote records page by page.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch one page. A page shorter than `params.per_page` is the last one.
    async fn fetch_page(&self, params: PageParams) -> Result<Vec<Quote>, FetchError>;
}

/// Trait for persisting rendered documents.
///
/// Implementors own directory creation and overwrite semantics. Existing
/// documents are replaced, never merged.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `contents` under `filename`, returning where it ended up.
    async fn write_document(&self, filename: &str, contents: &str)
        -> Result<PathBuf, StoreError>;
}
