use axum::{extract::State, Json};

use crate::arbiter::DisplayPayload;
use crate::config::Permission;
use crate::render::Frame;
use crate::status::DisplayStatus;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::auth::{require_permission, AppState, ApiClient};

#[utoipa::path(
    get,
    path = "/api/display/status",
    tag = "display",
    responses(
        (status = 200, description = "Current payload, last aircraft and frame", body = DisplayStatus),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions")
    ),
    security(("api_key" = []))
)]
pub async fn status(
    State(state): State<AppState>,
    client: ApiClient,
) -> ApiResult<Json<DisplayStatus>> {
    require_permission(&client, Permission::ViewDisplay)?;
    Ok(Json(state.status.snapshot()))
}

#[utoipa::path(
    get,
    path = "/api/display/payload",
    tag = "display",
    responses(
        (status = 200, description = "Payload chosen by the last poll", body = DisplayPayload),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions")
    ),
    security(("api_key" = []))
)]
pub async fn payload(
    State(state): State<AppState>,
    client: ApiClient,
) -> ApiResult<Json<DisplayPayload>> {
    require_permission(&client, Permission::ViewDisplay)?;
    Ok(Json(state.status.snapshot().payload))
}

#[utoipa::path(
    get,
    path = "/api/display/frame",
    tag = "display",
    responses(
        (status = 200, description = "Last presented frame", body = Frame),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions"),
        (status = 404, description = "Nothing presented yet", body = ErrorResponse)
    ),
    security(("api_key" = []))
)]
pub async fn frame(State(state): State<AppState>, client: ApiClient) -> ApiResult<Json<Frame>> {
    require_permission(&client, Permission::ViewDisplay)?;
    state
        .status
        .snapshot()
        .frame
        .map(Json)
        .ok_or(ApiError::NotFound("no_frame_presented"))
}
