use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, warn};

use crate::filters::Furnished;
use crate::models::{Location, Property, SearchResponse};
use crate::search::query::SearchRequest;
use crate::search::traits::SearchBackend;

/// Search client talking to the remote rental API
pub struct HttpSearchClient {
    client: Client,
    base_url: String,
}

impl HttpSearchClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl SearchBackend for HttpSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let url = format!("{}/properties/search", self.base_url);
        debug!("POST {} page={} size={}", url, request.page, request.size);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .context("Failed to reach search API")?;

        if !response.status().is_success() {
            warn!("Search API returned status: {}", response.status());
            anyhow::bail!("Search request failed: {}", response.status());
        }

        let page: SearchResponse = response
            .json()
            .await
            .context("Failed to decode search response")?;

        debug!("Received {} of {} listings", page.data.len(), page.total);
        Ok(page)
    }

    fn backend_name(&self) -> &'static str {
        "rental-api"
    }
}

/// Bundled sample listings used when the remote API is unreachable, so the
/// pipeline stays demonstrable offline
pub fn sample_listings() -> Vec<Property> {
    let now = Utc::now();
    vec![
        Property {
            id: "rental_sodermalm_1".to_string(),
            title: "2 rum på Götgatan".to_string(),
            address: "Götgatan 120".to_string(),
            location: Location {
                city: "Stockholm".to_string(),
                area: Some("Södermalm".to_string()),
                latitude: Some(59.3145),
                longitude: Some(18.0736),
            },
            property_type: "apartment".to_string(),
            rent_price_per_month: 14_500,
            rooms: 2,
            sqm: 58,
            furnished: Furnished::Furnished,
            description: "Möblerad lägenhet på Södermalm. Hiss och balkong.".to_string(),
            features: vec!["Hiss".to_string(), "Balkong".to_string()],
            images: vec![],
            url: "https://example.com/rentals/sodermalm1".to_string(),
            created_at: now,
            updated_at: now,
        },
        Property {
            id: "rental_sodermalm_2".to_string(),
            title: "Etta vid Ringvägen".to_string(),
            address: "Ringvägen 11A".to_string(),
            location: Location {
                city: "Stockholm".to_string(),
                area: Some("Södermalm".to_string()),
                latitude: Some(59.3129),
                longitude: Some(18.0530),
            },
            property_type: "studio".to_string(),
            rent_price_per_month: 9_800,
            rooms: 1,
            sqm: 28,
            furnished: Furnished::Unfurnished,
            description: "Ljus etta nära Zinkensdamm.".to_string(),
            features: vec!["Hiss".to_string()],
            images: vec![],
            url: "https://example.com/rentals/sodermalm2".to_string(),
            created_at: now,
            updated_at: now,
        },
        Property {
            id: "rental_katarina_3".to_string(),
            title: "4 rum i Katarina".to_string(),
            address: "Tjustgatan 4".to_string(),
            location: Location {
                city: "Stockholm".to_string(),
                area: Some("Katarina".to_string()),
                latitude: Some(59.3112),
                longitude: Some(18.0842),
            },
            property_type: "apartment".to_string(),
            rent_price_per_month: 24_000,
            rooms: 4,
            sqm: 102,
            furnished: Furnished::SemiFurnished,
            description: "Rymlig familjelägenhet med eldstad.".to_string(),
            features: vec!["Balkong".to_string(), "Eldstad".to_string()],
            images: vec![],
            url: "https://example.com/rentals/katarina3".to_string(),
            created_at: now,
            updated_at: now,
        },
    ]
}
