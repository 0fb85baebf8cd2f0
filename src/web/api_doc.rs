use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

use super::api::display;
use super::api::error::ErrorResponse;
use super::api::feeds::{self, FeedAck, ObservationBatch};

#[derive(OpenApi)]
#[openapi(
    paths(
        display::status,
        display::payload,
        display::frame,
        feeds::put_observations,
        feeds::put_aircraft,
        feeds::put_games,
        feeds::put_weather,
    ),
    components(
        schemas(
            ErrorResponse,
            FeedAck,
            ObservationBatch,
            crate::status::DisplayStatus,
            crate::arbiter::DisplayPayload,
            crate::arbiter::DisplayMode,
            crate::render::Frame,
            crate::render::DrawOp,
            crate::render::Color,
            crate::flight::Observation,
            crate::flight::AircraftDetails,
            crate::sports::GameSummary,
            crate::sports::ColorRule,
            crate::weather::WeatherReport,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Approach Board API",
        description = "Feed ingestion and live state of the approach display",
        version = "0.1.0"
    ),
    tags(
        (name = "display", description = "What the panel is showing"),
        (name = "feeds", description = "Push flight, sports and weather data")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
            components.add_security_scheme(
                "feeder_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-Api-Key"))),
            );
        }
    }
}
