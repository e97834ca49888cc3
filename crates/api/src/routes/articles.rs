//! Route definitions for articles, mounted at `/articles`.
//!
//! ```text
//! GET    /                    list_articles
//! POST   /                    submit_article
//! POST   /sections/suggest    suggest
//! GET    /{id}                get_article
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::articles;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(articles::list_articles).post(articles::submit_article),
        )
        .route("/sections/suggest", post(articles::suggest))
        .route("/{id}", get(articles::get_article))
}
