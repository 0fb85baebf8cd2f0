use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{Config, Permission};
use crate::feeds::FeedBoard;
use crate::status::StatusBoard;

/// Header scrapers may send instead of a bearer token.
pub const FEEDER_KEY_HEADER: &str = "x-api-key";

/// Everything the handlers share: the loaded config, the board the scrapers
/// push into and the snapshot the display loop publishes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub board: FeedBoard,
    pub status: StatusBoard,
}

/// A configured API key that presented itself: a dashboard viewer, a feed
/// scraper, or both.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub name: String,
    pub permissions: HashSet<Permission>,
}

impl ApiClient {
    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingKey,
    MalformedHeader,
    UnknownKey,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingKey => "No API key: send 'Authorization: Bearer <key>' or X-Api-Key",
            AuthError::MalformedHeader => "Authorization header must be 'Bearer <key>'",
            AuthError::UnknownKey => "API key is not configured on this board",
        };
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

/// The client is known but its key does not grant `0`.
#[derive(Debug)]
pub struct PermissionError(pub Permission);

impl IntoResponse for PermissionError {
    fn into_response(self) -> Response {
        let needed = match self.0 {
            Permission::ViewDisplay => "view_display",
            Permission::PushFeeds => "push_feeds",
        };
        (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": format!("API key lacks the {} permission", needed) })),
        )
            .into_response()
    }
}

fn presented_key(headers: &HeaderMap) -> Result<&str, AuthError> {
    if let Some(value) = headers.get(axum::http::header::AUTHORIZATION) {
        let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
        return value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(AuthError::MalformedHeader);
    }
    match headers.get(FEEDER_KEY_HEADER) {
        Some(value) => value
            .to_str()
            .map(str::trim)
            .map_err(|_| AuthError::MalformedHeader),
        None => Err(AuthError::MissingKey),
    }
}

impl FromRequestParts<AppState> for ApiClient {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = presented_key(&parts.headers)?;
        let api_key = state.config.find_api_key(key).ok_or_else(|| {
            log::warn!("Rejected {} {} with unknown API key", parts.method, parts.uri.path());
            AuthError::UnknownKey
        })?;

        Ok(ApiClient {
            name: api_key.name.clone(),
            permissions: api_key.permissions.clone(),
        })
    }
}

pub fn require_permission(client: &ApiClient, permission: Permission) -> Result<(), PermissionError> {
    if client.can(permission) {
        Ok(())
    } else {
        log::warn!("{} lacks permission {:?}", client.name, permission);
        Err(PermissionError(permission))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::Request;

    pub(crate) fn state() -> AppState {
        let config = Config::from_str(include_str!("../../config.example.yaml")).unwrap();
        AppState {
            config: Arc::new(config),
            board: FeedBoard::default(),
            status: StatusBoard::default(),
        }
    }

    pub(crate) fn client(permissions: &[Permission]) -> ApiClient {
        ApiClient {
            name: "test".to_string(),
            permissions: permissions.iter().copied().collect(),
        }
    }

    async fn authenticate(headers: &[(&str, &str)]) -> Result<ApiClient, AuthError> {
        let mut request = Request::builder().method("PUT").uri("/api/feeds/weather");
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let (mut parts, _) = request.body(()).unwrap().into_parts();
        ApiClient::from_request_parts(&mut parts, &state()).await
    }

    #[tokio::test]
    async fn bearer_key_maps_to_configured_permissions() {
        let viewer = authenticate(&[("Authorization", "Bearer change-me-viewer")])
            .await
            .unwrap();
        assert_eq!(viewer.name, "dashboard");
        assert!(viewer.can(Permission::ViewDisplay));
        assert!(matches!(
            require_permission(&viewer, Permission::PushFeeds),
            Err(PermissionError(Permission::PushFeeds))
        ));
    }

    #[tokio::test]
    async fn scrapers_may_send_the_key_header() {
        let feeder = authenticate(&[("X-Api-Key", "change-me-feeder")]).await.unwrap();
        assert!(require_permission(&feeder, Permission::PushFeeds).is_ok());
    }

    #[tokio::test]
    async fn authorization_header_wins_over_key_header() {
        let result = authenticate(&[
            ("Authorization", "Basic Zm9vOmJhcg=="),
            ("X-Api-Key", "change-me-feeder"),
        ])
        .await;
        assert!(matches!(result, Err(AuthError::MalformedHeader)));
    }

    #[tokio::test]
    async fn missing_or_unknown_keys_are_rejected() {
        assert!(matches!(authenticate(&[]).await, Err(AuthError::MissingKey)));
        assert!(matches!(
            authenticate(&[("Authorization", "change-me-viewer")]).await,
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            authenticate(&[("Authorization", "Bearer ")]).await,
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            authenticate(&[("X-Api-Key", "nope")]).await,
            Err(AuthError::UnknownKey)
        ));
    }
}
