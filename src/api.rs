//! HTTP API endpoints for the pack store.
//!
//! These back the pack creator and theme picker; gameplay itself runs over the
//! WebSocket.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::GameError;
use crate::pack::{sanitize_pack_name, ContentPack};
use crate::state::AppState;
use crate::types::PackName;

#[derive(Debug, Clone, Serialize)]
pub struct PackListResponse {
    pub packs: Vec<PackName>,
}

/// Pack creator form
#[derive(Debug, Clone, Deserialize)]
pub struct SavePackRequest {
    pub name: String,
    #[serde(default)]
    pub prompts: Vec<String>,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default)]
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavePackResponse {
    pub name: PackName,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub violations: Vec<String>,
}

/// List available packs.
///
/// GET /api/packs
pub async fn list_packs(State(state): State<Arc<AppState>>) -> Json<PackListResponse> {
    Json(PackListResponse {
        packs: state.packs.list_packs(),
    })
}

/// Load a pack with built-in fallbacks applied.
///
/// GET /api/packs/{name}
pub async fn get_pack(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Json<ContentPack> {
    Json(state.packs.load_pack(&name))
}

/// Validate and persist a pack.
///
/// POST /api/packs
///
/// Returns 201 with the sanitized name, or 422 listing every violated rule.
pub async fn save_pack(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SavePackRequest>,
) -> Response {
    match state
        .packs
        .save_pack(&req.name, req.prompts, req.concepts, req.constraints)
    {
        Ok(name) => (StatusCode::CREATED, Json(SavePackResponse { name })).into_response(),
        Err(GameError::PackValidation(violations)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorResponse { violations }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Pack save failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Download a pack as pretty-printed JSON.
///
/// GET /api/packs/{name}/export
pub async fn export_pack(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let pack = state.packs.load_pack(&name);
    match pack.to_export_json() {
        Ok(json) => {
            let disposition = format!(
                "attachment; filename=\"{}.json\"",
                sanitize_pack_name(&pack.name)
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/json; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                json,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Pack export failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Export failed: {}", e)).into_response()
        }
    }
}
