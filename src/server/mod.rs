//! HTTP surface
//!
//! Composes the recipe store and the upstream gateway into the REST routes
//! the browser client consumes. One task per request, no cross-request
//! locking; the only shared state is the store and the gateway's response
//! cache, both safe under concurrent access.

mod error;
mod routes;

pub use error::ApiError;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::store::RecipeStore;
use crate::upstream::SpoonacularClient;

/// Shared per-request state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecipeStore>,
    pub upstream: Arc<SpoonacularClient>,
}

/// Builds the application router over the given state
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(routes::root))
        .route(
            "/api/recipes",
            get(routes::list_recipes).post(routes::create_recipe),
        )
        // Static segment first so "favorites" is never parsed as an id
        .route("/api/recipes/favorites", post(routes::resolve_favorites))
        .route(
            "/api/recipes/{id}",
            get(routes::get_recipe)
                .put(routes::update_recipe)
                .delete(routes::delete_recipe),
        )
        .route("/api/search-recipes", get(routes::search_recipes))
        .route("/api/recipe/{id}", get(routes::recipe_information))
        .route("/api/recipe/{id}/nutrition", get(routes::recipe_nutrition))
        .route(
            "/api/ingredient-substitutes",
            get(routes::ingredient_substitutes),
        )
        .layer(cors)
        .with_state(state)
}

/// Binds the listener and serves until SIGINT/SIGTERM
pub async fn serve(state: AppState, port: u16) -> std::io::Result<()> {
    let address = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let interrupt = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            // No handler means no signal will ever arrive; don't shut down
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {},
        _ = terminate => {},
    }
}
