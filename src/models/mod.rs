use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filters::Furnished;

/// Location information for a property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub area: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Core rental listing data model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: String,
    pub address: String,
    pub location: Location,
    pub property_type: String,
    pub rent_price_per_month: i64,
    pub rooms: u32,
    pub sqm: i32,
    pub furnished: Furnished,
    pub description: String,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page of search results as returned by the search API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub data: Vec<Property>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}
