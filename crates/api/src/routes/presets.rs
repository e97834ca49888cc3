//! Route definitions for presets, mounted at `/presets`.
//!
//! ```text
//! GET    /        list_presets
//! POST   /        create_preset
//! GET    /{id}    get_preset
//! PUT    /{id}    update_preset
//! DELETE /{id}    delete_preset
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::presets;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(presets::list_presets).post(presets::create_preset),
        )
        .route(
            "/{id}",
            get(presets::get_preset)
                .put(presets::update_preset)
                .delete(presets::delete_preset),
        )
}
