pub mod auth;
pub mod collection;
pub mod error;
pub mod extract;
pub mod settings;
pub mod todo;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Extension;
use http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ErrorKind;
use crate::{config, Achievement, Config, Database, Gate, GalleryImage, Result, TributeImage};

pub type Router = axum::Router;

pub type DbExt = Extension<Database>;
pub type GateExt = Extension<Arc<Gate>>;

/// Builds all api routes, nested under the configured prefix.
///
/// Resource routes are put behind the session guard if `auth.guard` is set.
/// Auth routes are never guarded.
pub fn router(config: &Config) -> Router {
    let mut resources = Router::new()
        .merge(collection::router::<GalleryImage>("/gallery"))
        .merge(collection::router::<Achievement>("/achievements"))
        .merge(collection::router::<TributeImage>("/tribute"))
        .merge(todo::router())
        .merge(settings::router());

    if config.auth.guard {
        resources = resources.route_layer(axum::middleware::from_fn(extract::session::guard));
    }

    let api = auth::router().merge(resources);

    match config.prefix.trim_matches('/') {
        "" => api,
        prefix => Router::new().nest(&format!("/{prefix}"), api),
    }
}

/// Builds the complete application: routes plus state extensions and the
/// http middleware stack.
pub fn app(db: Database, config: Config) -> Result<Router> {
    let gate = Gate::from_config(&config.auth)?;
    let cors = cors_layer(&config.cors);
    let body_limit = config.limits.body_bytes;

    Ok(router(&config)
        .layer(Extension(Arc::new(gate)))
        .layer(Extension(db))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        ))
}

/// Initializes tracing, opens the configured database and starts the web
/// server.
pub async fn start(config: Config) -> Result<()> {
    match crate::tracing::init(&config) {
        Ok(()) => (),
        Err(e) if matches!(e.kind, ErrorKind::Misconfigured(_)) => return Err(e),
        // no subscriber of ours is installed, so don't go through it
        Err(e) => eprintln!("failed to initialize tracing (perhaps it was already initialized?): {e}"),
    }

    let db = Database::new(&config.db)?;
    start_with(db, config).await
}

/// Starts the web server on top of an already opened database. Runs until
/// ctrl-c is received.
pub async fn start_with(db: Database, config: Config) -> Result<()> {
    let addr = config.address;
    let app = app(db, config)?;

    tracing::info!("starting server at {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| e.into())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("initiating graceful shutdown"),
        Err(e) => tracing::error!("failed listening for shutdown signal: {e}"),
    }
}

fn cors_layer(config: &config::Cors) -> CorsLayer {
    if config.allows_any() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins = config
        .origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("ignoring invalid cors origin '{origin}': {e}");
                None
            }
        })
        .collect::<Vec<_>>();

    // credentials can't be combined with wildcards, so mirror the request
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Runs blocking storage work off the async runtime threads.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ErrorKind::Other(format!("storage task failed: {e}")))?
}
