use std::collections::HashMap;

use tracing::debug;

use super::state::{FilterState, FilterStore, Furnished};

/// Session-storage key for the saved scroll offset
pub const SCROLL_KEY: &str = "scrollPosition";

/// Where the synchronizer reads and writes the page URL
///
/// In a browser this is the location bar; tests and the CLI driver use the
/// in-memory implementation below.
pub trait UrlBar {
    /// Current query string, without the leading `?`
    fn query(&self) -> String;

    /// Soft-replace the query string: no new history entry, no reload
    fn replace_query(&mut self, query: &str);

    /// Navigate to the bare base path, dropping the query string entirely
    fn reset_to_base(&mut self);
}

/// Page-scoped string cache (session storage in a browser)
pub trait SessionStore {
    fn set(&mut self, key: &str, value: String);
    fn get(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Default)]
pub struct InMemoryUrlBar {
    query: String,
    base_navigations: u32,
}

impl InMemoryUrlBar {
    pub fn with_query(query: &str) -> Self {
        Self {
            query: query.to_string(),
            base_navigations: 0,
        }
    }

    /// How many times the bar was reset to the bare base path
    pub fn base_navigations(&self) -> u32 {
        self.base_navigations
    }
}

impl UrlBar for InMemoryUrlBar {
    fn query(&self) -> String {
        self.query.clone()
    }

    fn replace_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    fn reset_to_base(&mut self) {
        self.query.clear();
        self.base_navigations += 1;
    }
}

#[derive(Debug, Default)]
pub struct InMemorySession {
    entries: HashMap<String, String>,
}

impl SessionStore for InMemorySession {
    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi * 16 + lo);
                        i += 3;
                    }
                    // Stray percent sign, keep it as-is
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Serialize ordered key/value pairs into a canonical query string
pub fn serialize_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Parse a query string into a key/value map; duplicate keys keep the last value
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for pair in query.trim_start_matches('?').split('&') {
        if pair.is_empty() {
            continue;
        }
        let mut parts = pair.splitn(2, '=');
        let key = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("");
        map.insert(key.to_string(), decode_component(value));
    }
    map
}

/// Everything the query string carries: filter values plus sort and page tokens
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub filters: FilterState,
    pub sort: Option<String>,
    pub page: u32,
}

/// Parse a query string into filter state, falling back to defaults for
/// absent keys and for numeric values that fail to parse
pub fn parse_query_state(query: &str) -> QueryState {
    let raw = parse_query(query);
    let defaults = FilterState::default();

    let parse_num = |key: &str, default: i64| -> i64 {
        raw.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };

    let filters = FilterState {
        location: raw.get("search").cloned().unwrap_or(defaults.location),
        min_price: parse_num("minPrice", defaults.min_price),
        max_price: parse_num("maxPrice", defaults.max_price),
        property_type: raw
            .get("propertyType")
            .cloned()
            .unwrap_or(defaults.property_type),
        rooms: raw
            .get("rooms")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rooms),
        furnished: raw
            .get("furnished")
            .map(|v| Furnished::parse(v))
            .unwrap_or(defaults.furnished),
    };

    QueryState {
        filters,
        sort: raw.get("sort").cloned(),
        page: raw.get("page").and_then(|v| v.parse().ok()).unwrap_or(1),
    }
}

/// Synchronization phase; store→URL writes are inert until hydration is done
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Hydrating,
    Synced,
}

/// Bidirectional synchronizer between a [`FilterStore`] and the page URL
///
/// Owns the "which side changed" disambiguation: the one-shot hydration
/// transition reads URL→store, and only after it does the steady-state
/// store→URL effect start observing changes. Comparison is over the canonical
/// serialized query, never object identity.
#[derive(Debug)]
pub struct UrlSync {
    phase: SyncPhase,
    /// Filter portion of the last query this instance observed or wrote,
    /// used to decide the page-reset policy
    last_filter_query: String,
    scroll_offset: f64,
}

impl UrlSync {
    pub fn new() -> Self {
        Self {
            phase: SyncPhase::Hydrating,
            last_filter_query: String::new(),
            scroll_offset: 0.0,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// One-time URL→store sync
    ///
    /// Parses the current query string, applies it to the store and moves to
    /// `Synced`. A second call parses again but leaves the store untouched,
    /// so a remount effect can never clobber user edits.
    pub fn hydrate(&mut self, store: &FilterStore, bar: &dyn UrlBar) -> QueryState {
        let parsed = parse_query_state(&bar.query());
        if self.phase == SyncPhase::Synced {
            return parsed;
        }
        debug!("hydrating filter store from URL: {:?}", parsed.filters);
        self.last_filter_query = serialize_query(&parsed.filters.url_params());
        store.set_filters(parsed.filters.clone().into());
        self.phase = SyncPhase::Synced;
        parsed
    }

    /// Record the current vertical scroll offset; persisted to the session
    /// store right before the next URL write
    pub fn record_scroll(&mut self, offset: f64) {
        self.scroll_offset = offset;
    }

    /// Read back the scroll offset saved by a previous URL write
    pub fn restore_scroll(&self, session: &dyn SessionStore) -> Option<f64> {
        session.get(SCROLL_KEY).and_then(|v| v.parse().ok())
    }

    /// Steady-state store→URL effect
    ///
    /// Serializes the state, resets `page` to 1 when the filter portion
    /// changed since the last write, and soft-replaces the URL only when the
    /// serialized query actually differs. Returns the effective page.
    pub fn apply(
        &mut self,
        state: &FilterState,
        sort: Option<&str>,
        page: u32,
        bar: &mut dyn UrlBar,
        session: &mut dyn SessionStore,
    ) -> u32 {
        if self.phase == SyncPhase::Hydrating {
            return page;
        }

        let filter_query = serialize_query(&state.url_params());
        let page = if filter_query != self.last_filter_query {
            1
        } else {
            page
        };

        let mut params = state.url_params();
        if let Some(sort) = sort {
            if !sort.is_empty() {
                params.push(("sort", sort.to_string()));
            }
        }
        if page != 1 {
            params.push(("page", page.to_string()));
        }

        let next = serialize_query(&params);
        if next != bar.query() {
            session.set(SCROLL_KEY, self.scroll_offset.to_string());
            debug!("replacing URL query: {:?} -> {:?}", bar.query(), next);
            bar.replace_query(&next);
        }
        self.last_filter_query = filter_query;
        page
    }

    /// Clear-filters special case: reset the store and navigate to the bare
    /// base path instead of round-tripping default values through the URL
    pub fn clear(&mut self, store: &FilterStore, bar: &mut dyn UrlBar) {
        store.clear_filters();
        self.last_filter_query.clear();
        bar.reset_to_base();
    }
}

impl Default for UrlSync {
    fn default() -> Self {
        Self::new()
    }
}
