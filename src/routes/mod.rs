pub mod ingest;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

pub fn ingest_routes() -> Router<SharedState> {
    Router::new()
        .route(
            "/v1/submissions",
            post(ingest::ingest).options(ingest::ingest_options),
        )
}
