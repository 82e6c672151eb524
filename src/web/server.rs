use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::predict::ForecastSettings;
use crate::tle::{CatalogCache, CatalogSource, TleSet};

use super::api::passes as pass_handlers;
use super::api_doc::ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<ForecastSettings>,
    pub satellites: Arc<RwLock<Vec<TleSet>>>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/passes", get(pass_handlers::list_passes))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Swap in a freshly loaded catalog; an empty load keeps the current one
async fn refresh_catalog(
    satellites: &RwLock<Vec<TleSet>>,
    cache: &CatalogCache,
    sources: &[CatalogSource],
) -> usize {
    let loaded = cache.load_all(sources).await;
    if loaded.is_empty() {
        log::warn!(
            "Catalog refresh found no satellites, keeping {} loaded",
            satellites.read().await.len()
        );
        return 0;
    }

    let count = loaded.len();
    *satellites.write().await = loaded;
    log::info!("Catalog refreshed: {} satellites", count);
    count
}

pub fn spawn_catalog_refresh(
    satellites: Arc<RwLock<Vec<TleSet>>>,
    cache: CatalogCache,
    sources: Vec<CatalogSource>,
    every: Duration,
) -> JoinHandle<()> {
    let every = every.max(MIN_REFRESH_INTERVAL);
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(every).await;
            refresh_catalog(&satellites, &cache, &sources).await;
        }
    })
}

pub async fn run_server(
    bind_addr: &str,
    settings: ForecastSettings,
    cache: CatalogCache,
    sources: Vec<CatalogSource>,
    refresh_every: Duration,
) -> std::io::Result<()> {
    let satellites = Arc::new(RwLock::new(Vec::new()));
    refresh_catalog(&satellites, &cache, &sources).await;
    spawn_catalog_refresh(satellites.clone(), cache, sources, refresh_every);

    let state = AppState {
        settings: Arc::new(settings),
        satellites,
    };

    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;

    const FEED: &str = "\
ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
";

    fn source() -> CatalogSource {
        CatalogSource {
            name: "stations".into(),
            url: "http://127.0.0.1:9/stations.txt".into(),
            keywords: Vec::new(),
        }
    }

    fn cache(dir: &std::path::Path) -> CatalogCache {
        CatalogCache::new(&CatalogConfig {
            cache_dir: dir.to_path_buf(),
            max_age: Duration::from_secs(24 * 3600),
            retries: 1,
            retry_delay: Duration::from_millis(1),
            timeout: Duration::from_secs(2),
            sources: vec![source()],
        })
        .unwrap()
    }

    fn stale_entry() -> TleSet {
        TleSet {
            name: "OLD".into(),
            line1: String::new(),
            line2: String::new(),
        }
    }

    #[tokio::test]
    async fn refresh_replaces_the_loaded_catalog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stations.txt"), FEED).unwrap();
        std::fs::write(
            dir.path().join("stations_timestamp.txt"),
            chrono::Utc::now().to_rfc3339(),
        )
        .unwrap();

        let satellites = RwLock::new(vec![stale_entry()]);
        let count = refresh_catalog(&satellites, &cache(dir.path()), &[source()]).await;

        assert_eq!(count, 1);
        let loaded = satellites.read().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "ISS (ZARYA)");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_current_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let satellites = RwLock::new(vec![stale_entry()]);

        let count = refresh_catalog(&satellites, &cache(dir.path()), &[source()]).await;

        assert_eq!(count, 0);
        assert_eq!(satellites.read().await[0].name, "OLD");
    }
}
