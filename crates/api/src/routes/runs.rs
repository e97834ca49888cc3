//! Route definitions for run status, mounted at `/runs`.

use axum::routing::get;
use axum::Router;

use crate::handlers::runs;
use crate::state::AppState;
use crate::ws;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{run_id}", get(runs::get_run))
        .route("/{run_id}/ws", get(ws::run_stream))
}
