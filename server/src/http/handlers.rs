use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use shared_types::{ObjectAddress, StoreResult};
use std::sync::Arc;
use storage_backend::StorageError;
use tracing::{info, instrument};

use super::{dto::DeleteResponse, error::ApiResult, state::AppState};

/// PUT /objects/:container/*key
/// Create or overwrite an object with the request body
#[instrument(skip(state, body))]
pub async fn put_object(
    State(state): State<Arc<AppState>>,
    Path((container, key)): Path<(String, String)>,
    body: Body,
) -> ApiResult<(StatusCode, Json<StoreResult>)> {
    info!("Putting object: {}/{}", container, key);

    let address = ObjectAddress::new(&container, &key).to_path();
    let data = body
        .into_data_stream()
        .map(move |chunk| {
            chunk.map_err(|e| StorageError::StreamAborted {
                address: address.clone(),
                reason: e.to_string(),
            })
        })
        .boxed();

    let result = state.storage.store(&container, &key, data).await?;

    let status = if result.was_update {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(result)))
}

/// GET /objects/:container/*key
/// Stream an object back to the client
#[instrument(skip(state))]
pub async fn get_object(
    State(state): State<Arc<AppState>>,
    Path((container, key)): Path<(String, String)>,
) -> ApiResult<Response> {
    info!("Getting object: {}/{}", container, key);

    let stream = state.storage.get(&container, &key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        Body::from_stream(stream),
    )
        .into_response())
}

/// DELETE /objects/:container/*key
/// Delete an object if it exists
#[instrument(skip(state))]
pub async fn delete_object(
    State(state): State<Arc<AppState>>,
    Path((container, key)): Path<(String, String)>,
) -> ApiResult<Json<DeleteResponse>> {
    info!("Deleting object: {}/{}", container, key);

    let deleted = state.storage.delete(&container, &key).await?;

    Ok(Json(DeleteResponse { deleted }))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "blob-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
