//! Debounced search box.

use super::catalog::CatalogSnapshot;
use aurum_commerce::catalog::Product;
use aurum_commerce::search::{Page, SearchQuery, DEFAULT_PER_PAGE};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Quiet period before a typed query is searched.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Lets only the latest of a burst of calls through.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the delay. Returns `false` when a newer call (or a
    /// [`cancel`](Self::cancel)) arrived in the meantime.
    pub async fn settle(&self) -> bool {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Supersede whatever is pending.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// What happened to one keystroke's worth of input.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Blank input: results cleared without searching.
    Cleared,
    /// A newer input arrived before the delay ran out.
    Superseded,
    Results(Page<Product>),
}

/// Last completed search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub text: String,
    pub page: Option<Page<Product>>,
}

/// Search-as-you-type over the loaded catalog.
#[derive(Debug)]
pub struct SearchBox {
    debouncer: Debouncer,
    per_page: usize,
    results: Mutex<SearchResults>,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE, DEFAULT_PER_PAGE)
    }
}

impl SearchBox {
    pub fn new(debounce: Duration, per_page: usize) -> Self {
        Self {
            debouncer: Debouncer::new(debounce),
            per_page,
            results: Mutex::new(SearchResults::default()),
        }
    }

    /// Handle new input text.
    pub async fn input(&self, text: &str, catalog: &CatalogSnapshot) -> SearchOutcome {
        let text = text.trim();
        if text.is_empty() {
            self.debouncer.cancel();
            self.store(SearchResults::default());
            return SearchOutcome::Cleared;
        }

        if !self.debouncer.settle().await {
            tracing::trace!(text, "search superseded");
            return SearchOutcome::Superseded;
        }

        let query = SearchQuery::new()
            .with_text(text)
            .with_pagination(1, self.per_page);
        let page = catalog.search(&query);
        tracing::debug!(text, total = page.pagination.total, "search");
        self.store(SearchResults {
            text: text.to_string(),
            page: Some(page.clone()),
        });
        SearchOutcome::Results(page)
    }

    pub fn results(&self) -> SearchResults {
        match self.results.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store(&self, results: SearchResults) {
        let mut guard = match self.results.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = results;
    }
}
