use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::filters::state::{ANY_PROPERTY_TYPE, DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE};
use crate::filters::{FilterState, Furnished};

/// Predicate kind understood by the search API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterKind {
    Term,
    Range,
    GeoDistance,
    Contains,
}

/// Typed value carried by a predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    Scalar(Value),
    Range {
        #[serde(skip_serializing_if = "Option::is_none")]
        gte: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        lte: Option<Value>,
    },
    Geo {
        distance: f64,
        unit: String,
        coordinates: [f64; 2],
    },
}

/// A single backend-facing filter condition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: FilterKind,
    pub value: FilterValue,
}

impl Filter {
    /// Exact match on a field
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            kind: FilterKind::Term,
            value: FilterValue::Scalar(value.into()),
        }
    }

    /// Substring containment on a text field
    pub fn contains(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: FilterKind::Contains,
            value: FilterValue::Scalar(Value::String(text.into())),
        }
    }

    /// Inclusive numeric range; `None` when neither bound is given, since an
    /// unbounded range filters nothing and must not be added
    pub fn range(field: impl Into<String>, gte: Option<f64>, lte: Option<f64>) -> Option<Self> {
        if gte.is_none() && lte.is_none() {
            return None;
        }
        Some(Self {
            field: field.into(),
            kind: FilterKind::Range,
            value: FilterValue::Range {
                gte: gte.map(Value::from),
                lte: lte.map(Value::from),
            },
        })
    }

    /// Inclusive date range, serialized as RFC 3339 strings; same no-op rule
    /// as [`Filter::range`]
    pub fn date_range(
        field: impl Into<String>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        if from.is_none() && to.is_none() {
            return None;
        }
        Some(Self {
            field: field.into(),
            kind: FilterKind::Range,
            value: FilterValue::Range {
                gte: from.map(|d| Value::String(d.to_rfc3339())),
                lte: to.map(|d| Value::String(d.to_rfc3339())),
            },
        })
    }

    /// Distance-from-point match on a geo field
    pub fn geo_distance(
        field: impl Into<String>,
        distance: f64,
        unit: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            field: field.into(),
            kind: FilterKind::GeoDistance,
            value: FilterValue::Geo {
                distance,
                unit: unit.into(),
                coordinates: [latitude, longitude],
            },
        }
    }
}

/// Sort option tokens as they appear in the URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOption {
    PriceAsc,
    PriceDesc,
    CreatedAsc,
    #[default]
    CreatedDesc,
    UpdatedAsc,
    UpdatedDesc,
}

impl SortOption {
    /// Unrecognized tokens fall back to newest-first
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "created-asc" => Self::CreatedAsc,
            "created-desc" => Self::CreatedDesc,
            "updated-asc" => Self::UpdatedAsc,
            "updated-desc" => Self::UpdatedDesc,
            _ => Self::CreatedDesc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::CreatedAsc => "created-asc",
            Self::CreatedDesc => "created-desc",
            Self::UpdatedAsc => "updated-asc",
            Self::UpdatedDesc => "updated-desc",
        }
    }

    pub fn to_sort(self) -> Sort {
        let (field, direction) = match self {
            Self::PriceAsc => ("rentPricePerMonth", SortDirection::Asc),
            Self::PriceDesc => ("rentPricePerMonth", SortDirection::Desc),
            Self::CreatedAsc => ("createdAt", SortDirection::Asc),
            Self::CreatedDesc => ("createdAt", SortDirection::Desc),
            Self::UpdatedAsc => ("updatedAt", SortDirection::Asc),
            Self::UpdatedDesc => ("updatedAt", SortDirection::Desc),
        };
        Sort {
            field: field.to_string(),
            direction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Field + direction pair sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

/// Search request sent to the remote search API
///
/// Constructed fresh per call; never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub filters: Vec<Filter>,
    pub sort: Sort,
    pub page: u32,
    pub size: u32,
}

impl SearchRequest {
    pub fn new(sort: SortOption, page: u32, size: u32) -> Self {
        Self {
            search: None,
            filters: Vec::new(),
            sort: sort.to_sort(),
            page,
            size,
        }
    }

    /// Build the request for the current filter state, one predicate per
    /// active (non-default) field
    pub fn from_state(state: &FilterState, sort: SortOption, page: u32, size: u32) -> Self {
        let mut request = Self::new(sort, page, size);

        if !state.location.is_empty() {
            request.search = Some(state.location.clone());
        }
        let gte = (state.min_price != DEFAULT_MIN_PRICE).then_some(state.min_price as f64);
        let lte = (state.max_price != DEFAULT_MAX_PRICE).then_some(state.max_price as f64);
        if let Some(price) = Filter::range("rentPricePerMonth", gte, lte) {
            request.push_filter(price);
        }
        if state.property_type != ANY_PROPERTY_TYPE {
            request.push_filter(Filter::term("propertyType", state.property_type.as_str()));
        }
        if let Some(rooms) = Filter::range("rooms", (state.rooms > 0).then_some(state.rooms as f64), None) {
            request.push_filter(rooms);
        }
        if state.furnished != Furnished::Any {
            request.push_filter(Filter::term("furnished", state.furnished.as_str()));
        }
        request
    }

    /// Add a predicate, replacing any existing one with the same field and
    /// kind so that re-applying a filter stays idempotent
    pub fn push_filter(&mut self, filter: Filter) {
        self.filters
            .retain(|f| !(f.field == filter.field && f.kind == filter.kind));
        self.filters.push(filter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reapplying_the_same_filter_keeps_a_single_predicate() {
        let mut request = SearchRequest::new(SortOption::default(), 1, 20);
        request.push_filter(Filter::range("rooms", Some(2.0), None).unwrap());
        request.push_filter(Filter::range("rooms", Some(2.0), None).unwrap());
        assert_eq!(request.filters.len(), 1);

        // A different kind on the same field is a distinct predicate
        request.push_filter(Filter::term("rooms", 2));
        assert_eq!(request.filters.len(), 2);
    }

    #[test]
    fn unbounded_range_is_a_no_op() {
        assert!(Filter::range("rentPricePerMonth", None, None).is_none());
        assert!(Filter::date_range("createdAt", None, None).is_none());
    }

    #[test]
    fn date_range_carries_rfc3339_bounds() {
        use chrono::TimeZone;
        let from = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let filter = Filter::date_range("createdAt", Some(from), None).unwrap();
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "field": "createdAt",
                "type": "RANGE",
                "value": { "gte": "2026-01-01T00:00:00+00:00" }
            })
        );
    }

    #[test]
    fn default_state_builds_an_empty_request() {
        let request = SearchRequest::from_state(&FilterState::default(), SortOption::default(), 1, 20);
        assert!(request.search.is_none());
        assert!(request.filters.is_empty());
    }

    #[test]
    fn active_fields_each_become_one_predicate() {
        let state = FilterState {
            location: "söderort".to_string(),
            min_price: 400,
            max_price: 2500,
            property_type: "apartment".to_string(),
            rooms: 2,
            furnished: Furnished::Furnished,
        };
        let request = SearchRequest::from_state(&state, SortOption::PriceAsc, 3, 20);

        assert_eq!(request.search.as_deref(), Some("söderort"));
        assert_eq!(request.filters.len(), 4);
        assert_eq!(
            request.filters[0],
            Filter::range("rentPricePerMonth", Some(400.0), Some(2500.0)).unwrap()
        );
        assert_eq!(request.filters[1], Filter::term("propertyType", "apartment"));
        assert_eq!(request.filters[2], Filter::range("rooms", Some(2.0), None).unwrap());
        assert_eq!(request.filters[3], Filter::term("furnished", "furnished"));
        assert_eq!(request.sort.field, "rentPricePerMonth");
        assert_eq!(request.page, 3);
    }

    #[test]
    fn only_the_active_price_bound_is_emitted() {
        let state = FilterState {
            min_price: 200,
            ..FilterState::default()
        };
        let request = SearchRequest::from_state(&state, SortOption::default(), 1, 20);
        assert_eq!(
            serde_json::to_value(&request.filters[0]).unwrap(),
            json!({
                "field": "rentPricePerMonth",
                "type": "RANGE",
                "value": { "gte": 200.0 }
            })
        );
    }

    #[test]
    fn sort_tokens_map_to_field_and_direction() {
        assert_eq!(SortOption::parse("price-desc").to_sort().field, "rentPricePerMonth");
        assert_eq!(
            SortOption::parse("updated-asc").to_sort().direction,
            SortDirection::Asc
        );
        // Unknown token defaults to newest-first
        let fallback = SortOption::parse("alphabetical").to_sort();
        assert_eq!(fallback.field, "createdAt");
        assert_eq!(fallback.direction, SortDirection::Desc);
    }

    #[test]
    fn geo_predicate_serializes_with_coordinates() {
        let filter = Filter::geo_distance("location", 5.0, "km", 59.31, 18.07);
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "field": "location",
                "type": "GEO_DISTANCE",
                "value": { "distance": 5.0, "unit": "km", "coordinates": [59.31, 18.07] }
            })
        );
    }
}
