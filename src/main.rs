mod favorites;
mod filters;
mod models;
mod search;
mod view;

use favorites::{FavoritesCoordinator, HttpFavoritesClient};
use filters::{Debouncer, FilterStore, InMemorySession, InMemoryUrlBar, UrlBar, UrlSync, FILTER_DEBOUNCE};
use search::{sample_listings, HttpSearchClient, SearchBackend, SearchRequest, SortOption};
use tracing::{info, warn, Level};
use tracing_subscriber;
use view::{MapViewport, ViewMode};

const PAGE_SIZE: u32 = 20;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 Rental Scout - Marketplace Search");
    info!("====================================");
    info!("");

    let base_url =
        std::env::var("RENTAL_SCOUT_API").unwrap_or_else(|_| "http://localhost:8080/api".to_string());

    // Optional initial query string and view mode from the command line,
    // e.g. `rental-scout "minPrice=200&rooms=2" map`
    let mut args = std::env::args().skip(1);
    let initial_query = args.next().unwrap_or_default();
    let mode = ViewMode::parse(&args.next().unwrap_or_default());

    // Hydrate the filter store from the URL, then keep them in sync
    let store = FilterStore::new();
    let mut bar = InMemoryUrlBar::with_query(&initial_query);
    let mut session = InMemorySession::default();
    let mut sync = UrlSync::new();
    let parsed = sync.hydrate(&store, &bar);

    let sort = parsed.sort.as_deref().map(SortOption::parse).unwrap_or_default();
    info!("Filters: {:?}", store.state());
    info!("Sort: {}  Page: {}  View: {}", sort.as_str(), parsed.page, mode.as_str());
    info!("");

    // Fetch the page of results for the current view
    let client = HttpSearchClient::new(&base_url)?;
    let request = match mode {
        ViewMode::Map => {
            // The map view fetches by visible bounding box, debounced so a
            // moving viewport doesn't spam the API
            let debouncer: Debouncer<MapViewport> = Debouncer::new(FILTER_DEBOUNCE);
            let mut debounced = debouncer.subscribe();
            debouncer.update(MapViewport {
                latitude: 59.3293,
                longitude: 18.0686,
                radius_km: 10.0,
            });
            debouncer.update(MapViewport {
                latitude: 59.3145,
                longitude: 18.0736,
                radius_km: 2.5,
            });
            debounced.changed().await?;
            let viewport = (*debounced.borrow()).unwrap_or(MapViewport {
                latitude: 59.3293,
                longitude: 18.0686,
                radius_km: 10.0,
            });
            info!("Map viewport: ({:.4}, {:.4}) r={} km", viewport.latitude, viewport.longitude, viewport.radius_km);
            viewport.to_request(PAGE_SIZE)
        }
        _ => SearchRequest::from_state(&store.state(), sort, parsed.page, PAGE_SIZE),
    };

    info!("Searching {} ...", client.backend_name());
    let (properties, total) = match client.search(&request).await {
        Ok(page) => (page.data, page.total),
        Err(e) => {
            warn!("Search failed: {:#}", e);
            info!("Falling back to bundled sample listings...");
            let samples = sample_listings();
            let total = samples.len() as u64;
            (samples, total)
        }
    };
    info!("✅ Showing {} of {} listings", properties.len(), total);
    info!("");

    // Enrich cards with like state; a favorites outage is never fatal
    let mut coordinator = FavoritesCoordinator::new(HttpFavoritesClient::new(&base_url)?);
    if let Err(e) = coordinator.load().await {
        warn!("Favorites unavailable: {:#}", e);
    }

    println!("{}", view::render(mode, &properties, &|id: &str| coordinator.is_favorite(id)));

    // Write the canonical query back to the URL bar
    let sort_param = parsed.sort.is_some().then(|| sort.as_str());
    let page = sync.apply(&store.state(), sort_param, parsed.page, &mut bar, &mut session);
    info!("🔗 Synced URL query: \"?{}\" (page {})", bar.query(), page);

    Ok(())
}
