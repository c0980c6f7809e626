//! Concurrent web search fan-out.
//!
//! Every term is searched at once on the current task; results are collected
//! in completion order. A failed search only drops its own result.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tracing::Instrument;

use crate::agents::SearchCapability;
use crate::status::Printer;

/// Status item key for the search phase
pub const SEARCH_ITEM: &str = "searching";

/// Result of searching a single term
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search produced a summary
    Found(String),
    /// The search failed; the run carries on without it
    Failed {
        /// Term that was searched
        term: String,
        /// Failure description
        error: String,
    },
}

impl SearchOutcome {
    /// Summary text, if the search succeeded
    pub fn into_text(self) -> Option<String> {
        match self {
            SearchOutcome::Found(text) => Some(text),
            SearchOutcome::Failed { .. } => None,
        }
    }
}

/// Search a single term, converting any failure into [`SearchOutcome::Failed`]
pub async fn search_term(searcher: &dyn SearchCapability, term: &str) -> SearchOutcome {
    let input = format!("Search term: {}", term);
    let span = tracing::info_span!("search", term = %term);

    match searcher.search(&input).instrument(span).await {
        Ok(text) => SearchOutcome::Found(text),
        Err(e) => {
            tracing::warn!(term = %term, error = %e, "Search failed, continuing without it");
            SearchOutcome::Failed {
                term: term.to_string(),
                error: e.to_string(),
            }
        }
    }
}

/// Search all terms concurrently and collect the successful summaries.
///
/// Progress is reported on the [`SEARCH_ITEM`] line as
/// `Searching... N/total completed`, once per finished search, and the item
/// is marked done at the end. The returned summaries are in completion
/// order, not request order.
pub async fn perform_searches(
    terms: &[String],
    searcher: &dyn SearchCapability,
    printer: &mut Printer,
) -> Vec<String> {
    let total = terms.len();
    let span = tracing::info_span!("search_the_web", total);

    async move {
        printer.update_item(SEARCH_ITEM, "Searching...", false, false);

        if total == 0 {
            printer.update_item(SEARCH_ITEM, "Searching... 0/0 completed", false, false);
        }

        let mut pending: FuturesUnordered<_> = terms
            .iter()
            .map(|term| search_term(searcher, term))
            .collect();

        let mut results = Vec::with_capacity(total);
        let mut completed = 0;
        while let Some(outcome) = pending.next().await {
            completed += 1;
            if let Some(text) = outcome.into_text() {
                results.push(text);
            }
            printer.update_item(
                SEARCH_ITEM,
                format!("Searching... {}/{} completed", completed, total),
                false,
                false,
            );
        }

        printer.mark_item_done(SEARCH_ITEM);
        tracing::info!(succeeded = results.len(), total, "Searches finished");
        results
    }
    .instrument(span)
    .await
}
