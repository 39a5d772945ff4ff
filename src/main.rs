use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use billiards_matchmaker::config::{Settings, StorageBackend};
use billiards_matchmaker::core::Matcher;
use billiards_matchmaker::routes::{self, AppState};
use billiards_matchmaker::services::{CacheManager, MatchmakingService, PostgresStore};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

async fn build_cache(settings: &Settings) -> Option<Arc<CacheManager>> {
    if !settings.cache.enabled {
        return None;
    }

    let ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match &settings.cache.redis_url {
        Some(url) => match CacheManager::new(url, l1_size, ttl).await {
            Ok(cache) => cache,
            Err(e) => {
                warn!("Failed to connect to Redis ({}), using in-process cache only", e);
                CacheManager::in_memory(l1_size, ttl)
            }
        },
        None => CacheManager::in_memory(l1_size, ttl),
    };

    info!(
        "Cache manager initialized (L1: {} entries, TTL: {}s, redis: {})",
        l1_size,
        ttl,
        cache.has_redis()
    );
    Some(Arc::new(cache))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    init_tracing(&settings.logging.level, &settings.logging.format);

    info!("Starting Billiards Hub matchmaker...");

    let weights = settings.scoring.to_weights();
    let matcher = Matcher::new(weights);
    info!("Matcher initialized with weights: {:?}", weights);

    let (service, postgres) = match settings.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory store");
            (MatchmakingService::in_memory(matcher), None)
        }
        StorageBackend::Postgres => {
            let postgres = match PostgresStore::from_settings(
                &settings.database.url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    error!("Failed to connect to PostgreSQL: {}", e);
                    return Err(std::io::Error::new(std::io::ErrorKind::Other, e));
                }
            };
            info!("PostgreSQL store initialized");

            let service = MatchmakingService::new(
                postgres.clone(),
                postgres.clone(),
                postgres.clone(),
                matcher,
            );
            (service, Some(postgres))
        }
    };

    let mut service = service.with_default_limit(settings.matching.default_limit);
    if let Some(cache) = build_cache(&settings).await {
        service = service.with_cache(cache);
    }

    let mut app_state = AppState::new(service);
    if let Some(postgres) = postgres {
        app_state = app_state.with_postgres(postgres);
    }

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
