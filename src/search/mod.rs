pub mod client;
pub mod query;
pub mod traits;

pub use client::{sample_listings, HttpSearchClient};
pub use query::{Filter, FilterKind, FilterValue, SearchRequest, Sort, SortDirection, SortOption};
pub use traits::SearchBackend;
