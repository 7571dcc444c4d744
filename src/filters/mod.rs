pub mod debounce;
pub mod state;
pub mod url;

pub use debounce::{Debouncer, FILTER_DEBOUNCE};
pub use state::{FilterField, FilterPatch, FilterState, FilterStore, Furnished};
pub use url::{InMemorySession, InMemoryUrlBar, QueryState, SessionStore, SyncPhase, UrlBar, UrlSync};
