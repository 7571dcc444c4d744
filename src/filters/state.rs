use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Default price bounds; a bound equal to its default is omitted from the URL
pub const DEFAULT_MIN_PRICE: i64 = 0;
pub const DEFAULT_MAX_PRICE: i64 = 5000;

/// Sentinel property type meaning "no restriction"
pub const ANY_PROPERTY_TYPE: &str = "any";

/// Furnishing requirement for a rental search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Furnished {
    #[default]
    Any,
    Furnished,
    Unfurnished,
    SemiFurnished,
}

impl Furnished {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Furnished => "furnished",
            Self::Unfurnished => "unfurnished",
            Self::SemiFurnished => "semi-furnished",
        }
    }

    /// Unknown tokens fall back to `Any` rather than erroring
    pub fn parse(s: &str) -> Self {
        match s {
            "furnished" => Self::Furnished,
            "unfurnished" => Self::Unfurnished,
            "semi-furnished" => Self::SemiFurnished,
            _ => Self::Any,
        }
    }
}

/// Active search filter values
///
/// Defaults double as the "absent from URL" values: a field is written to the
/// query string only when it differs from its default.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Free-text location query
    pub location: String,
    /// Inclusive monthly rent bounds
    pub min_price: i64,
    pub max_price: i64,
    /// Property type identifier, or the `"any"` sentinel
    pub property_type: String,
    /// Minimum room count, 0 meaning "any"
    pub rooms: u32,
    pub furnished: Furnished,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            location: String::new(),
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
            property_type: ANY_PROPERTY_TYPE.to_string(),
            rooms: 0,
            furnished: Furnished::Any,
        }
    }
}

impl FilterState {
    /// Project the state onto URL query parameters, omitting defaults
    ///
    /// Pairs come back in a fixed field order so the serialized form is
    /// canonical and can be compared as a plain string.
    pub fn url_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.location.is_empty() {
            params.push(("search", self.location.clone()));
        }
        if self.min_price != DEFAULT_MIN_PRICE {
            params.push(("minPrice", self.min_price.to_string()));
        }
        if self.max_price != DEFAULT_MAX_PRICE {
            params.push(("maxPrice", self.max_price.to_string()));
        }
        if self.property_type != ANY_PROPERTY_TYPE {
            params.push(("propertyType", self.property_type.clone()));
        }
        if self.rooms != 0 {
            params.push(("rooms", self.rooms.to_string()));
        }
        if self.furnished != Furnished::Any {
            params.push(("furnished", self.furnished.as_str().to_string()));
        }
        params
    }
}

/// Single-field update for [`FilterStore::set_filter`]
#[derive(Debug, Clone)]
pub enum FilterField {
    Location(String),
    MinPrice(i64),
    MaxPrice(i64),
    PropertyType(String),
    Rooms(u32),
    Furnished(Furnished),
}

impl FilterField {
    fn apply(self, state: &mut FilterState) {
        match self {
            Self::Location(v) => state.location = v,
            Self::MinPrice(v) => state.min_price = v,
            Self::MaxPrice(v) => state.max_price = v,
            Self::PropertyType(v) => state.property_type = v,
            Self::Rooms(v) => state.rooms = v,
            Self::Furnished(v) => state.furnished = v,
        }
    }
}

/// Partial update for [`FilterStore::set_filters`]; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
    pub location: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub property_type: Option<String>,
    pub rooms: Option<u32>,
    pub furnished: Option<Furnished>,
}

impl From<FilterState> for FilterPatch {
    fn from(state: FilterState) -> Self {
        Self {
            location: Some(state.location),
            min_price: Some(state.min_price),
            max_price: Some(state.max_price),
            property_type: Some(state.property_type),
            rooms: Some(state.rooms),
            furnished: Some(state.furnished),
        }
    }
}

impl FilterPatch {
    fn apply(self, state: &mut FilterState) {
        if let Some(v) = self.location {
            state.location = v;
        }
        if let Some(v) = self.min_price {
            state.min_price = v;
        }
        if let Some(v) = self.max_price {
            state.max_price = v;
        }
        if let Some(v) = self.property_type {
            state.property_type = v;
        }
        if let Some(v) = self.rooms {
            state.rooms = v;
        }
        if let Some(v) = self.furnished {
            state.furnished = v;
        }
    }
}

/// Single-writer observable container for [`FilterState`]
///
/// Every mutation replaces the whole state value and notifies subscribers
/// through a watch channel. Setters are total; no validation is performed.
#[derive(Debug)]
pub struct FilterStore {
    tx: watch::Sender<FilterState>,
}

impl FilterStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(FilterState::default());
        Self { tx }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FilterState {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every state replacement
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.tx.subscribe()
    }

    /// Replace a single field
    pub fn set_filter(&self, field: FilterField) {
        self.tx.send_modify(|state| field.apply(state));
    }

    /// Shallow-merge a partial update
    pub fn set_filters(&self, patch: FilterPatch) {
        self.tx.send_modify(|state| patch.apply(state));
    }

    /// Reset every field to its default
    pub fn clear_filters(&self) {
        self.tx.send_modify(|state| *state = FilterState::default());
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_produces_no_url_params() {
        assert!(FilterState::default().url_params().is_empty());
    }

    #[test]
    fn non_default_fields_are_projected_in_order() {
        let state = FilterState {
            location: "stockholm".to_string(),
            min_price: 200,
            rooms: 2,
            ..FilterState::default()
        };
        assert_eq!(
            state.url_params(),
            vec![
                ("search", "stockholm".to_string()),
                ("minPrice", "200".to_string()),
                ("rooms", "2".to_string()),
            ]
        );
    }

    #[test]
    fn set_filter_replaces_one_field_and_notifies() {
        let store = FilterStore::new();
        let rx = store.subscribe();
        store.set_filter(FilterField::Rooms(3));
        assert_eq!(store.state().rooms, 3);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn set_filters_merges_only_given_fields() {
        let store = FilterStore::new();
        store.set_filter(FilterField::Location("uppsala".to_string()));
        store.set_filters(FilterPatch {
            min_price: Some(100),
            max_price: Some(900),
            ..FilterPatch::default()
        });
        let state = store.state();
        assert_eq!(state.location, "uppsala");
        assert_eq!(state.min_price, 100);
        assert_eq!(state.max_price, 900);
    }

    #[test]
    fn clear_filters_restores_defaults() {
        let store = FilterStore::new();
        store.set_filters(FilterPatch {
            location: Some("malmö".to_string()),
            rooms: Some(4),
            furnished: Some(Furnished::Furnished),
            ..FilterPatch::default()
        });
        store.clear_filters();
        assert_eq!(store.state(), FilterState::default());
    }

    #[test]
    fn furnished_tokens_round_trip_and_unknown_falls_back() {
        for f in [
            Furnished::Any,
            Furnished::Furnished,
            Furnished::Unfurnished,
            Furnished::SemiFurnished,
        ] {
            assert_eq!(Furnished::parse(f.as_str()), f);
        }
        assert_eq!(Furnished::parse("half-furnished"), Furnished::Any);
    }
}
