use bus_lookup::acquire::{AcquisitionConfig, BusLookup, Sources};
use bus_lookup::cache::{AnyStore, CacheConfig, ExpiringCache, FileStore, MemoryStore};
use bus_lookup::config::{AppConfig, ConfigError, RouteBackend};
use bus_lookup::fallback::{FallbackDataset, FallbackError};
use bus_lookup::retry::RetryPolicy;
use bus_lookup::sources::{
    AnyRouteSource, HtmlRouteClient, HtmlRouteConfig, OverpassClient, OverpassConfig, RouteClient,
    RouteClientConfig, SourceError,
};
use bus_lookup::web::{AppLookup, AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("upstream client: {0}")]
    Source(#[from] SourceError),

    #[error("fallback data: {0}")]
    Fallback(#[from] FallbackError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

fn build_lookup(config: &AppConfig) -> Result<AppLookup, StartupError> {
    let mut overpass_config = OverpassConfig::new().with_base_url(&config.overpass_url);
    if let Some(secs) = config.http_timeout_secs {
        overpass_config = overpass_config.with_timeout(secs);
    }
    let operator = overpass_config.operator.clone();
    let overpass = OverpassClient::new(overpass_config)?;

    let routes = match config.route_backend {
        RouteBackend::Json => {
            let mut route_config = RouteClientConfig::new().with_base_url(&config.routes_url);
            if let Some(secs) = config.http_timeout_secs {
                route_config = route_config.with_timeout(secs);
            }
            AnyRouteSource::Json(RouteClient::new(route_config)?)
        }
        RouteBackend::Html => {
            let mut route_config = HtmlRouteConfig::new(&config.routes_url);
            if let Some(secs) = config.http_timeout_secs {
                route_config = route_config.with_timeout(secs);
            }
            AnyRouteSource::Html(HtmlRouteClient::new(route_config)?)
        }
    };

    let store = match &config.cache_file {
        Some(path) => AnyStore::File(FileStore::new(path.clone())),
        None => AnyStore::Memory(MemoryStore::new()),
    };

    let core_config = AcquisitionConfig::new(RetryPolicy::default())
        .with_fallback_radius(config.enforce_fallback_radius)
        .with_operator(operator);

    let mut lookup = BusLookup::new(
        Sources {
            stops: overpass.clone(),
            routes,
            depots: overpass,
        },
        ExpiringCache::new(store, &CacheConfig::default()),
        core_config,
    );

    if let Some(path) = &config.fallback_file {
        lookup = lookup.with_fallback(FallbackDataset::from_json_file(path)?);
        info!(path = %path.display(), "Loaded fallback data");
    }

    Ok(lookup)
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;
    let lookup = build_lookup(&config)?;
    let app = create_router(AppState::new(lookup));

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    info!(
        addr = %config.listen,
        overpass = %config.overpass_url,
        routes = %config.routes_url,
        backend = ?config.route_backend,
        "Bus lookup listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,bus_lookup=debug".into()),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Startup failed");
        std::process::exit(1);
    }
}
