pub mod articles;
pub mod health;
pub mod presets;
pub mod runs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /articles                                        list, submit
/// /articles/{id}                                   status query
/// /articles/sections/suggest                       section suggestions (POST)
///
/// /presets                                         list, create
/// /presets/{id}                                    get, replace, delete
///
/// /runs/{run_id}?token=                            latest snapshot (public token)
/// /runs/{run_id}/ws?token=                         WebSocket snapshot stream
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/articles", articles::router())
        .nest("/presets", presets::router())
        .nest("/runs", runs::router())
}
