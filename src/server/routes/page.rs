//! Page Routes
//!
//! - GET / - The dashboard page with the current slot contents
//! - GET /fragments - Every slot as JSON, keyed by element id
//! - GET /fragments/:slot - One slot

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::render::{render_document, Slot, SlotContent};
use crate::server::error::{ServerError, ServerResult};
use crate::server::state::ServerState;

/// One slot with its element id
#[derive(Debug, Serialize)]
pub struct FragmentResponse {
    pub slot: Slot,
    #[serde(flatten)]
    pub content: SlotContent,
}

/// GET /
pub async fn dashboard(State(state): State<Arc<ServerState>>) -> Html<String> {
    Html(render_document(&state.page, state.mode, state.refresh_secs))
}

/// GET /fragments
pub async fn fragments(
    State(state): State<Arc<ServerState>>,
) -> Json<serde_json::Map<String, serde_json::Value>> {
    let fragments = state
        .page
        .snapshot()
        .into_iter()
        .map(|(slot, content)| {
            let value = serde_json::to_value(&content).unwrap_or(serde_json::Value::Null);
            (slot.id().to_string(), value)
        })
        .collect();

    Json(fragments)
}

/// GET /fragments/:slot
pub async fn fragment(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<FragmentResponse>> {
    let slot = Slot::from_id(&id).ok_or_else(|| ServerError::NotFound(format!("slot '{}'", id)))?;

    Ok(Json(FragmentResponse {
        slot,
        content: state.page.get(slot),
    }))
}
