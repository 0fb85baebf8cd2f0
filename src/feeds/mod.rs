mod board;
mod error;
mod fallback;

pub use board::{FeedBoard, DEFAULT_STALE_AFTER};
pub use error::FeedError;
pub use fallback::FallbackFlightFeed;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::flight::{AircraftDetails, Observation};
use crate::geometry::{BoundingBox, GeoPoint};
use crate::sports::GameSummary;
use crate::weather::WeatherReport;

pub type FeedResult<T> = Result<T, FeedError>;

#[async_trait]
pub trait FlightFeed: Send + Sync {
    async fn fetch_observations(&self, region: &BoundingBox) -> FeedResult<Vec<Observation>>;
}

#[async_trait]
pub trait EnrichmentService: Send + Sync {
    async fn fetch_details(&self, identifier: &str) -> FeedResult<AircraftDetails>;
}

#[async_trait]
pub trait SportsFeed: Send + Sync {
    async fn fetch_live_games(&self, date: NaiveDate) -> FeedResult<Vec<GameSummary>>;
}

#[async_trait]
pub trait WeatherFeed: Send + Sync {
    async fn fetch_current(&self, location: GeoPoint) -> FeedResult<WeatherReport>;
}

/// The four collaborators the arbiter polls.
pub struct Feeds {
    pub flight: Box<dyn FlightFeed>,
    pub enrichment: Box<dyn EnrichmentService>,
    pub sports: Box<dyn SportsFeed>,
    pub weather: Box<dyn WeatherFeed>,
}

impl Feeds {
    /// Every source served from the push board, flight batches tried per
    /// source name in the given order with `backend_timeout` for each.
    pub fn from_board<S: AsRef<str>>(
        board: &FeedBoard,
        flight_sources: &[S],
        backend_timeout: Duration,
    ) -> Self {
        let flight = flight_sources.iter().fold(
            FallbackFlightFeed::new().per_backend_timeout(backend_timeout),
            |feed, name| {
                let name = name.as_ref();
                feed.with_backend(name, Box::new(board.flight_source(name)))
            },
        );
        Self {
            flight: Box::new(flight),
            enrichment: Box::new(board.clone()),
            sports: Box::new(board.clone()),
            weather: Box::new(board.clone()),
        }
    }
}

/// Bounds a collaborator call; running out of time counts as a failed fetch.
pub async fn with_timeout<T, F>(limit: Duration, fetch: F) -> FeedResult<T>
where
    F: Future<Output = FeedResult<T>>,
{
    tokio::time::timeout(limit, fetch)
        .await
        .map_err(|_| FeedError::Timeout(limit))?
}
