use anyhow::Result;
use axum::{Router, routing::get};
use std::{net::SocketAddr, sync::Arc};
use storage_backend::ObjectStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::{handlers, state::AppState};

pub fn router(storage: Arc<dyn ObjectStore>) -> Router {
    let app_state = Arc::new(AppState { storage });

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Object operations; keys may contain '/'
        .route(
            "/objects/:container/*key",
            get(handlers::get_object)
                .put(handlers::put_object)
                .delete(handlers::delete_object),
        )
        .with_state(app_state)
        // Add middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server(storage: Arc<dyn ObjectStore>, bind_address: SocketAddr) -> Result<()> {
    let app = router(storage);

    info!("Server listening on {}", bind_address);

    // Run the server
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
