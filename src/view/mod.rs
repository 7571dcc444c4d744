use std::fmt::Write as _;

use crate::models::Property;
use crate::search::{Filter, SearchRequest, SortOption};

/// Presentation strategy for a page of search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Card,
    List,
    Map,
}

impl ViewMode {
    /// Unknown tokens fall back to the card grid
    pub fn parse(s: &str) -> Self {
        match s {
            "list" => Self::List,
            "map" => Self::Map,
            _ => Self::Card,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

/// Visible map area; the map view fetches by this viewport independently of
/// the page-level filter results
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl MapViewport {
    /// Translate the viewport into a geo-distance search request
    pub fn to_request(&self, size: u32) -> SearchRequest {
        let mut request = SearchRequest::new(SortOption::default(), 1, size);
        request.push_filter(Filter::geo_distance(
            "location",
            self.radius_km,
            "km",
            self.latitude,
            self.longitude,
        ));
        request
    }
}

/// Render one result set in the selected mode
///
/// Switching modes never refetches: all three renderers consume the same
/// collection. `is_favorite` supplies the like state for each card.
pub fn render(
    mode: ViewMode,
    properties: &[Property],
    is_favorite: &dyn Fn(&str) -> bool,
) -> String {
    match mode {
        ViewMode::Card => render_cards(properties, is_favorite),
        ViewMode::List => render_list(properties, is_favorite),
        ViewMode::Map => render_map(properties),
    }
}

fn render_cards(properties: &[Property], is_favorite: &dyn Fn(&str) -> bool) -> String {
    let mut out = String::new();
    for (i, property) in properties.iter().enumerate() {
        let heart = if is_favorite(&property.id) { " ❤️" } else { "" };
        let _ = writeln!(out, "{}. {} ({} kr/mån){}", i + 1, property.title, property.rent_price_per_month, heart);
        let _ = writeln!(out, "   {} rum, {} kvm, {}", property.rooms, property.sqm, property.property_type);
        let _ = writeln!(out, "   {}", property.address);
        if let Some(area) = &property.location.area {
            let _ = writeln!(out, "   Area: {}", area);
        }
        if !property.features.is_empty() {
            let _ = writeln!(out, "   Features: {}", property.features.join(", "));
        }
        let _ = writeln!(out);
    }
    out
}

fn render_list(properties: &[Property], is_favorite: &dyn Fn(&str) -> bool) -> String {
    let mut out = String::new();
    for property in properties {
        let marker = if is_favorite(&property.id) { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} {:<30} {:>8} kr/mån  {} rum  {}",
            marker, property.title, property.rent_price_per_month, property.rooms, property.address
        );
    }
    out
}

fn render_map(properties: &[Property]) -> String {
    let mut out = String::new();
    for property in properties {
        match (property.location.latitude, property.location.longitude) {
            (Some(lat), Some(lng)) => {
                let _ = writeln!(out, "📍 ({:.4}, {:.4}) {} — {} kr/mån", lat, lng, property.address, property.rent_price_per_month);
            }
            _ => {
                let _ = writeln!(out, "   (no coordinates) {}", property.address);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{sample_listings, FilterKind};

    #[test]
    fn mode_tokens_parse_with_card_fallback() {
        assert_eq!(ViewMode::parse("list"), ViewMode::List);
        assert_eq!(ViewMode::parse("map"), ViewMode::Map);
        assert_eq!(ViewMode::parse("grid"), ViewMode::Card);
    }

    #[test]
    fn every_mode_renders_the_same_result_set() {
        let listings = sample_listings();
        let none = |_: &str| false;
        for mode in [ViewMode::Card, ViewMode::List, ViewMode::Map] {
            let rendered = render(mode, &listings, &none);
            assert!(rendered.contains("Götgatan 120"), "{:?} dropped a listing", mode);
        }
    }

    #[test]
    fn card_view_marks_favorites() {
        let listings = sample_listings();
        let liked = listings[0].id.clone();
        let rendered = render(ViewMode::Card, &listings, &|id: &str| id == liked);
        assert!(rendered.contains("❤️"));
    }

    #[test]
    fn viewport_request_carries_a_geo_predicate() {
        let viewport = MapViewport {
            latitude: 59.3145,
            longitude: 18.0736,
            radius_km: 2.5,
        };
        let request = viewport.to_request(50);
        assert_eq!(request.filters.len(), 1);
        assert_eq!(request.filters[0].kind, FilterKind::GeoDistance);
        assert_eq!(request.page, 1);
    }
}
