mod docs;
pub mod form;
mod health;
mod sounds;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;
use crate::storage::MAX_SOUND_SIZE;

pub use docs::{ApiDoc, OPENAPI_PATH};

/// Room for multipart framing and the base64 expansion of JSON uploads.
const MAX_BODY_SIZE: usize = MAX_SOUND_SIZE * 2;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health::health))
        .route("/version", get(health::version))
        .route(
            "/sounds",
            get(sounds::list_sounds).post(sounds::create_sound),
        )
        .route(
            "/sounds/{sound_id}",
            get(sounds::get_sound)
                .put(sounds::update_sound)
                .delete(sounds::delete_sound),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    if let Some(ref root) = state.cdn_root {
        app = app.nest_service("/cdn", ServeDir::new(root));
    }

    app = app.merge(SwaggerUi::new("/swagger").url(OPENAPI_PATH, ApiDoc::openapi()));

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
