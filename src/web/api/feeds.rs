use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::Permission;
use crate::flight::{AircraftDetails, Observation};
use crate::sports::GameSummary;
use crate::weather::WeatherReport;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::auth::{require_permission, AppState, ApiClient};

/// A complete snapshot from one flight source. Replaces the previous batch
/// from the same source.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ObservationBatch {
    pub source: String,
    pub observations: Vec<Observation>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedAck {
    pub accepted: usize,
}

fn validate_observation(obs: &Observation) -> Result<(), ApiError> {
    if obs.identifier.trim().is_empty() {
        return Err(ApiError::Validation("observation without identifier".into()));
    }
    if !(-90.0..=90.0).contains(&obs.lat) || !(-180.0..=180.0).contains(&obs.lon) {
        return Err(ApiError::Validation(format!(
            "{} has invalid position ({}, {})",
            obs.identifier, obs.lat, obs.lon
        )));
    }
    Ok(())
}

#[utoipa::path(
    put,
    path = "/api/feeds/observations",
    tag = "feeds",
    request_body = ObservationBatch,
    responses(
        (status = 200, description = "Batch stored", body = FeedAck),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions")
    ),
    security(("api_key" = []), ("feeder_key" = []))
)]
pub async fn put_observations(
    State(state): State<AppState>,
    client: ApiClient,
    Json(batch): Json<ObservationBatch>,
) -> ApiResult<Json<FeedAck>> {
    require_permission(&client, Permission::PushFeeds)?;

    if !state.config.flight.sources.contains(&batch.source) {
        return Err(ApiError::Validation(format!(
            "unknown flight source '{}'",
            batch.source
        )));
    }
    batch.observations.iter().try_for_each(validate_observation)?;

    let accepted = batch.observations.len();
    state.board.push_observations(&batch.source, batch.observations);
    Ok(Json(FeedAck { accepted }))
}

#[utoipa::path(
    put,
    path = "/api/feeds/aircraft/{identifier}",
    tag = "feeds",
    params(
        ("identifier" = String, Path, description = "Feed aircraft key")
    ),
    request_body = AircraftDetails,
    responses(
        (status = 204, description = "Details stored"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions")
    ),
    security(("api_key" = []), ("feeder_key" = []))
)]
pub async fn put_aircraft(
    State(state): State<AppState>,
    client: ApiClient,
    Path(identifier): Path<String>,
    Json(details): Json<AircraftDetails>,
) -> ApiResult<StatusCode> {
    require_permission(&client, Permission::PushFeeds)?;
    state.board.push_details(&identifier, details);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/feeds/games",
    tag = "feeds",
    request_body = Vec<GameSummary>,
    responses(
        (status = 200, description = "Game list replaced", body = FeedAck),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions")
    ),
    security(("api_key" = []), ("feeder_key" = []))
)]
pub async fn put_games(
    State(state): State<AppState>,
    client: ApiClient,
    Json(games): Json<Vec<GameSummary>>,
) -> ApiResult<Json<FeedAck>> {
    require_permission(&client, Permission::PushFeeds)?;
    let accepted = games.len();
    state.board.push_games(games);
    Ok(Json(FeedAck { accepted }))
}

#[utoipa::path(
    put,
    path = "/api/feeds/weather",
    tag = "feeds",
    request_body = WeatherReport,
    responses(
        (status = 204, description = "Report stored"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions")
    ),
    security(("api_key" = []), ("feeder_key" = []))
)]
pub async fn put_weather(
    State(state): State<AppState>,
    client: ApiClient,
    Json(report): Json<WeatherReport>,
) -> ApiResult<StatusCode> {
    require_permission(&client, Permission::PushFeeds)?;
    state.board.push_weather(report);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::FlightFeed;
    use crate::geometry::BoundingBox;
    use crate::web::auth::tests::{client, state};

    fn obs(identifier: &str, lat: f64, lon: f64) -> Observation {
        Observation {
            lat,
            lon,
            altitude_ft: Some(1500.0),
            identifier: identifier.to_string(),
            callsign: "SWA1234".to_string(),
            source_id: "feeder".to_string(),
        }
    }

    const WORLD: BoundingBox = BoundingBox {
        north: 90.0,
        south: -90.0,
        west: -180.0,
        east: 180.0,
    };

    #[tokio::test]
    async fn batch_lands_on_the_board() {
        let state = state();
        let batch = ObservationBatch {
            source: "primary".to_string(),
            observations: vec![obs("a1b2c3", 32.70, -117.05)],
        };

        let Json(ack) = put_observations(
            State(state.clone()),
            client(&[Permission::PushFeeds]),
            Json(batch),
        )
        .await
        .ok()
        .unwrap();
        assert_eq!(ack.accepted, 1);

        let seen = state
            .board
            .flight_source("primary")
            .fetch_observations(&WORLD)
            .await
            .unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].identifier, "a1b2c3");
    }

    #[tokio::test]
    async fn bad_positions_and_unknown_sources_are_rejected() {
        let state = state();
        let off_planet = ObservationBatch {
            source: "primary".to_string(),
            observations: vec![obs("a1b2c3", 132.0, -117.05)],
        };
        let result = put_observations(
            State(state.clone()),
            client(&[Permission::PushFeeds]),
            Json(off_planet),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let stranger = ObservationBatch {
            source: "elsewhere".to_string(),
            observations: Vec::new(),
        };
        let result = put_observations(
            State(state.clone()),
            client(&[Permission::PushFeeds]),
            Json(stranger),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn viewers_cannot_push() {
        let state = state();
        let result = put_weather(
            State(state),
            client(&[Permission::ViewDisplay]),
            Json(WeatherReport::default()),
        )
        .await;
        assert!(matches!(result, Err(ApiError::Permission(_))));
    }
}
