use axum::{routing::get, routing::put, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::feeds::FeedBoard;
use crate::shutdown::Shutdown;
use crate::status::StatusBoard;

use super::api::display as display_handlers;
use super::api::feeds as feed_handlers;
use super::api_doc::ApiDoc;
use super::auth::AppState;
use super::ui::handlers as ui_handlers;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // UI routes
        .route("/", get(ui_handlers::dashboard))
        // Display state
        .route("/api/display/status", get(display_handlers::status))
        .route("/api/display/payload", get(display_handlers::payload))
        .route("/api/display/frame", get(display_handlers::frame))
        // Feed ingestion
        .route(
            "/api/feeds/observations",
            put(feed_handlers::put_observations),
        )
        .route(
            "/api/feeds/aircraft/{identifier}",
            put(feed_handlers::put_aircraft),
        )
        .route("/api/feeds/games", put(feed_handlers::put_games))
        .route("/api/feeds/weather", put(feed_handlers::put_weather))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(
    config: Arc<Config>,
    board: FeedBoard,
    status: StatusBoard,
    mut shutdown: Shutdown,
) -> std::io::Result<()> {
    let Some(bind_addr) = config.web.as_ref().map(|web| web.bind.clone()) else {
        return Ok(());
    };

    let app = router(AppState {
        config,
        board,
        status,
    });

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.triggered().await })
        .await
}
