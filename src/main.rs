//! campus-notify server binary.
//!
//! Wires configuration, storage, the event bus and the live connection
//! registry together, then serves `/ws`, `/health` and `POST /events`.
//!
//! The bus built here is the only one in the process. Producers in other
//! processes reach it through `POST /events`; anything added to this binary
//! should take the same `Arc<InProcessEventBus>`.

use std::sync::Arc;
use axum::http::HeaderValue;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_notify::adapters::cache::{InMemoryCacheBackend, RedisCacheBackend};
use campus_notify::adapters::directory::PostgresEnrollmentDirectory;
use campus_notify::adapters::events::InProcessEventBus;
use campus_notify::adapters::http::{events_router, EventIngestState};
use campus_notify::adapters::notifications::PostgresNotificationStore;
use campus_notify::adapters::realtime::{
    realtime_router, ConnectionRegistry, RealtimeState, WebSocketTransport,
};
use campus_notify::application::{
    CacheInvalidationHandler, CacheLayer, EnrollmentRecipientResolver, NotificationDispatcher,
};
use campus_notify::config::{AppConfig, OriginPolicy, RedisConfig, ServerConfig};
use campus_notify::ports::CacheBackend;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        "Starting campus-notify"
    );

    info!(database = %config.database.redacted_url(), "Connecting to database");
    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.migrate_on_start {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    let backend = cache_backend(&config.redis).await;
    let cache = Arc::new(CacheLayer::new(backend, &config.cache));

    let bus = Arc::new(InProcessEventBus::from_config(&config.events));
    let transport = Arc::new(WebSocketTransport::new());
    let registry = Arc::new(ConnectionRegistry::new(transport.clone()));

    register_handlers(&bus, &pool, &registry, &cache);

    let app = realtime_router()
        .with_state(RealtimeState::new(registry, transport))
        .merge(events_router().with_state(EventIngestState::new(bus)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server))
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    let addr = config.server.listen_addr()?;
    info!(%addr, "Listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.log_filter.as_str().into());

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Redis when configured and reachable, otherwise an in-process store.
async fn cache_backend(redis: &RedisConfig) -> Arc<dyn CacheBackend> {
    if !redis.is_configured() {
        info!("No Redis URL configured, using in-memory cache");
        return Arc::new(InMemoryCacheBackend::new());
    }

    let connect = RedisCacheBackend::connect(&redis.url, redis.key_prefix.clone());
    match tokio::time::timeout(redis.timeout(), connect).await {
        Ok(Ok(backend)) => {
            info!("Connected to Redis cache");
            Arc::new(backend)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Redis unavailable, falling back to in-memory cache");
            Arc::new(InMemoryCacheBackend::new())
        }
        Err(_) => {
            warn!(
                timeout_secs = redis.timeout_secs,
                "Redis connect timed out, falling back to in-memory cache"
            );
            Arc::new(InMemoryCacheBackend::new())
        }
    }
}

fn register_handlers(
    bus: &InProcessEventBus,
    pool: &PgPool,
    registry: &Arc<ConnectionRegistry>,
    cache: &Arc<CacheLayer>,
) {
    let directory = Arc::new(PostgresEnrollmentDirectory::new(pool.clone()));
    let dispatcher = Arc::new(
        NotificationDispatcher::new(
            Arc::new(EnrollmentRecipientResolver::new(directory)),
            Arc::new(PostgresNotificationStore::new(pool.clone())),
            registry.clone(),
        )
        .with_cache(cache.clone()),
    );
    dispatcher.register(bus);

    Arc::new(CacheInvalidationHandler::new(cache.clone())).register(bus);
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    match server.origin_policy() {
        OriginPolicy::SameOrigin => CorsLayer::new(),
        OriginPolicy::Any => CorsLayer::permissive(),
        OriginPolicy::List(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(%origin, "Ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new().allow_origin(AllowOrigin::list(origins))
        }
    }
}
