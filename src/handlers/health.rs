use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let connected = {
        let db = state.db.lock().unwrap();
        db.query_row("SELECT 1", [], |_| Ok(())).is_ok()
    };

    Json(serde_json::json!({
        "message": "server is running",
        "database": if connected { "connected" } else { "disconnected" },
    }))
}
