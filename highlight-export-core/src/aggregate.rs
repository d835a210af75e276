//! Groups a flat quote stream by the work each quote was highlighted from.
//!
//! Both passes are single walks over the input and keep fetch order: works
//! appear in first-occurrence order, quotes within a work in the order they
//! were fetched. A quote without a work fails the whole aggregation rather
//! than being dropped.

use std::collections::{HashMap, HashSet};
use tracing::{debug, error};

use crate::error::{ExportError, MalformedReason, Result};
use crate::model::{Quote, Work};

/// Work identifier to that work's quotes, in fetch order.
pub type GroupedQuotes = HashMap<String, Vec<Quote>>;

/// Unique works in first-occurrence order.
pub type WorkList = Vec<Work>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub works: WorkList,
    pub grouped: GroupedQuotes,
}

impl Aggregation {
    /// Quotes for `work`, empty if the work was not part of this batch.
    pub fn quotes_for(&self, work: &Work) -> &[Quote] {
        self.grouped
            .get(&work.uuid)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn work_of(quote: &Quote) -> Result<&Work> {
    quote.book.as_ref().ok_or_else(|| {
        error!(quote_id = %quote.uuid, "Quote has no source work");
        ExportError::malformed(&quote.uuid, MalformedReason::MissingWork)
    })
}

/// Unique works referenced by `quotes`. The first embedded copy of a work
/// wins; later copies with different metadata are ignored.
pub fn dedup_works(quotes: &[Quote]) -> Result<WorkList> {
    let mut seen = HashSet::new();
    let mut works = Vec::new();
    for quote in quotes {
        let work = work_of(quote)?;
        if seen.insert(work.uuid.as_str()) {
            works.push(work.clone());
        }
    }
    Ok(works)
}

pub fn group_by_work(quotes: &[Quote]) -> Result<GroupedQuotes> {
    let mut grouped = GroupedQuotes::new();
    for quote in quotes {
        let work = work_of(quote)?;
        grouped
            .entry(work.uuid.clone())
            .or_default()
            .push(quote.clone());
    }
    Ok(grouped)
}

pub fn aggregate(quotes: &[Quote]) -> Result<Aggregation> {
    let works = dedup_works(quotes)?;
    let grouped = group_by_work(quotes)?;
    debug!(
        quotes = quotes.len(),
        works = works.len(),
        "Aggregated quotes by work"
    );
    Ok(Aggregation { works, grouped })
}
