//! Quote sources and the pagination driver.
//!
//! [`fetch_all`] walks pages from 1 upward until a page comes back shorter
//! than requested. Two sources are provided: [`BookmateClient`] talks to the
//! remote API and [`JsonFileSource`] replays a JSON dump, page by page, so a
//! run can be reproduced offline.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::contract::{PageParams, QuoteSource, MAX_PER_PAGE};
use crate::error::{ExportError, FetchError, Result};
use crate::model::Quote;

pub const DEFAULT_BASE_URL: &str = "https://bookmate.ru";

const QUOTES_PATH: &str = "/p/api/v5/profile/quotes";

/// Fetches every page from `source` and concatenates them in order.
///
/// `per_page` must be within `1..=MAX_PER_PAGE`; nothing is fetched otherwise.
pub async fn fetch_all<S>(source: &S, per_page: u32) -> Result<Vec<Quote>>
where
    S: QuoteSource + ?Sized,
{
    if per_page == 0 || per_page > MAX_PER_PAGE {
        error!(per_page, "Page size outside accepted range");
        return Err(ExportError::InvalidPageSize {
            per_page,
            max: MAX_PER_PAGE,
        });
    }
    let mut params = PageParams::first(per_page);
    let mut quotes = Vec::new();
    loop {
        info!(page = params.page, "Fetching quotes page");
        let page = source.fetch_page(params).await.map_err(|e| {
            error!(page = params.page, error = %e, "Fetching quotes page failed");
            ExportError::Fetch {
                page: params.page,
                source: e,
            }
        })?;
        let fetched = page.len();
        quotes.extend(page);
        debug!(page = params.page, fetched, total = quotes.len(), "Fetched quotes page");
        if fetched != params.per_page as usize {
            break;
        }
        params = params.next();
    }
    info!(total = quotes.len(), "Fetched all quotes");
    Ok(quotes)
}

/// Session credential for the Bookmate API.
#[derive(Clone)]
pub struct BookmateCredentials {
    pub cookie: String,
}

impl std::fmt::Debug for BookmateCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookmateCredentials")
            .field("cookie", &"<redacted>")
            .finish()
    }
}

/// The API wraps quotes in an object; older dumps are bare arrays.
#[derive(Deserialize)]
#[serde(untagged)]
enum QuotesPage {
    Wrapped { quotes: Vec<Quote> },
    Bare(Vec<Quote>),
}

impl From<QuotesPage> for Vec<Quote> {
    fn from(page: QuotesPage) -> Self {
        match page {
            QuotesPage::Wrapped { quotes } => quotes,
            QuotesPage::Bare(quotes) => quotes,
        }
    }
}

pub struct BookmateClient {
    http: Client,
    base_url: String,
    credentials: BookmateCredentials,
}

impl BookmateClient {
    pub fn new(base_url: impl Into<String>, credentials: BookmateCredentials) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Initialised Bookmate client");
        BookmateClient {
            http: Client::new(),
            base_url,
            credentials,
        }
    }

    pub fn quotes_url(&self, params: PageParams) -> String {
        format!(
            "{}{}?page={}&per_page={}",
            self.base_url, QUOTES_PATH, params.page, params.per_page
        )
    }
}

#[async_trait]
impl QuoteSource for BookmateClient {
    async fn fetch_page(&self, params: PageParams) -> std::result::Result<Vec<Quote>, FetchError> {
        let url = self.quotes_url(params);
        let resp = self
            .http
            .get(&url)
            .header(reqwest::header::COOKIE, &self.credentials.cookie)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            error!(status = %status, url = %url, "Bookmate API returned error");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let page: QuotesPage = serde_json::from_str(&body)?;
        Ok(page.into())
    }
}

/// Serves quotes from a JSON file holding an array of quote records.
#[derive(Debug)]
pub struct JsonFileSource {
    path: PathBuf,
    quotes: Vec<Quote>,
}

impl JsonFileSource {
    pub async fn open(path: impl AsRef<Path>) -> std::result::Result<Self, FetchError> {
        let path = path.as_ref().to_path_buf();
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;
        let quotes: Vec<Quote> = serde_json::from_str::<QuotesPage>(&content)?.into();
        info!(path = %path.display(), quotes = quotes.len(), "Loaded quotes from file");
        Ok(JsonFileSource { path, quotes })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuoteSource for JsonFileSource {
    async fn fetch_page(&self, params: PageParams) -> std::result::Result<Vec<Quote>, FetchError> {
        let per_page = params.per_page as usize;
        let start = (params.page.saturating_sub(1) as usize).saturating_mul(per_page);
        Ok(self
            .quotes
            .iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect())
    }
}
