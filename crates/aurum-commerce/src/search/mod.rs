//! Search module.
//!
//! Text search, taxonomy filters, sorting and pagination of product
//! listings.

mod query;
mod results;

pub use query::{SearchQuery, SortOption, DEFAULT_PER_PAGE};
pub use results::{Page, Pagination};
