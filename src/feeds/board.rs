use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::time::Instant;

use crate::flight::{AircraftDetails, EnrichmentCache, Observation};
use crate::geometry::{BoundingBox, GeoPoint};
use crate::sports::GameSummary;
use crate::weather::WeatherReport;

use super::{EnrichmentService, FeedError, FeedResult, FlightFeed, SportsFeed, WeatherFeed};

pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Batch {
    observations: Vec<Observation>,
    received_at: Instant,
}

#[derive(Debug, Default)]
struct Shared {
    batches: HashMap<String, Batch>,
    /// Same bound as the arbiter's details cache.
    details: EnrichmentCache,
    games: Vec<GameSummary>,
    weather: Option<WeatherReport>,
}

/// In-memory drop box that external scrapers push data into. Each flight
/// source is kept separately so the arbiter can fall back from one host to
/// the next.
#[derive(Debug, Clone)]
pub struct FeedBoard {
    stale_after: Duration,
    shared: Arc<RwLock<Shared>>,
}

impl Default for FeedBoard {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER)
    }
}

impl FeedBoard {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            stale_after,
            shared: Arc::new(RwLock::new(Shared::default())),
        }
    }

    pub fn with_details_capacity(self, capacity: usize) -> Self {
        self.write().details = EnrichmentCache::new(capacity);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, Shared> {
        self.shared.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Shared> {
        self.shared.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push_observations(&self, source: &str, observations: Vec<Observation>) {
        log::debug!("{} observations pushed by {}", observations.len(), source);
        self.write().batches.insert(
            source.to_string(),
            Batch {
                observations,
                received_at: Instant::now(),
            },
        );
    }

    pub fn push_details(&self, identifier: &str, details: AircraftDetails) {
        let mut shared = self.write();
        shared.details.insert(identifier, details);
        log::debug!(
            "Details for {} stored ({} held)",
            identifier,
            shared.details.len()
        );
    }

    pub fn push_games(&self, games: Vec<GameSummary>) {
        self.write().games = games;
    }

    pub fn push_weather(&self, report: WeatherReport) {
        self.write().weather = Some(report);
    }

    /// Flight feed reading only the batches pushed under `source`.
    pub fn flight_source(&self, source: &str) -> BoardFlightSource {
        BoardFlightSource {
            board: self.clone(),
            source: source.to_string(),
        }
    }
}

pub struct BoardFlightSource {
    board: FeedBoard,
    source: String,
}

#[async_trait]
impl FlightFeed for BoardFlightSource {
    async fn fetch_observations(&self, region: &BoundingBox) -> FeedResult<Vec<Observation>> {
        let shared = self.board.read();
        let batch = shared
            .batches
            .get(&self.source)
            .ok_or(FeedError::Unavailable)?;

        if batch.received_at.elapsed() > self.board.stale_after {
            return Err(FeedError::Transport(format!(
                "{} has not pushed for {:?}",
                self.source,
                batch.received_at.elapsed()
            )));
        }

        Ok(batch
            .observations
            .iter()
            .filter(|obs| region.contains(&obs.position()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EnrichmentService for FeedBoard {
    async fn fetch_details(&self, identifier: &str) -> FeedResult<AircraftDetails> {
        self.read()
            .details
            .get(identifier)
            .cloned()
            .ok_or(FeedError::Unavailable)
    }
}

#[async_trait]
impl SportsFeed for FeedBoard {
    async fn fetch_live_games(&self, _date: NaiveDate) -> FeedResult<Vec<GameSummary>> {
        Ok(self.read().games.clone())
    }
}

#[async_trait]
impl WeatherFeed for FeedBoard {
    async fn fetch_current(&self, _location: GeoPoint) -> FeedResult<WeatherReport> {
        self.read().weather.clone().ok_or(FeedError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> BoundingBox {
        BoundingBox {
            north: 33.0,
            south: 32.0,
            west: -118.0,
            east: -117.0,
        }
    }

    fn obs(id: &str, lat: f64, lon: f64) -> Observation {
        Observation {
            lat,
            lon,
            altitude_ft: Some(1500.0),
            identifier: id.into(),
            callsign: String::new(),
            source_id: "primary".into(),
        }
    }

    #[tokio::test]
    async fn unknown_source_is_unavailable() {
        let board = FeedBoard::default();
        let err = board
            .flight_source("primary")
            .fetch_observations(&region())
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Unavailable));
    }

    #[tokio::test]
    async fn batch_is_clipped_to_region() {
        let board = FeedBoard::default();
        board.push_observations(
            "primary",
            vec![obs("in", 32.7, -117.1), obs("out", 34.0, -117.1)],
        );

        let observations = board
            .flight_source("primary")
            .fetch_observations(&region())
            .await
            .expect("fresh batch");
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].identifier, "in");
    }

    #[tokio::test(start_paused = true)]
    async fn stale_batch_reads_as_failure() {
        let board = FeedBoard::new(Duration::from_secs(60));
        board.push_observations("primary", vec![obs("in", 32.7, -117.1)]);

        tokio::time::advance(Duration::from_secs(61)).await;

        let result = board.flight_source("primary").fetch_observations(&region()).await;
        assert!(matches!(result, Err(FeedError::Transport(_))));
    }

    #[tokio::test]
    async fn details_store_drops_oldest_aircraft_when_full() {
        let board = FeedBoard::default().with_details_capacity(2);
        for id in ["a", "b", "c"] {
            board.push_details(id, AircraftDetails::default());
        }

        assert!(matches!(
            board.fetch_details("a").await,
            Err(FeedError::Unavailable)
        ));
        assert!(board.fetch_details("b").await.is_ok());
        assert!(board.fetch_details("c").await.is_ok());
    }

    #[tokio::test]
    async fn weather_and_details_unavailable_until_pushed() {
        let board = FeedBoard::default();
        assert!(board.fetch_current(GeoPoint::new(0.0, 0.0)).await.is_err());
        assert!(board.fetch_details("abc").await.is_err());

        board.push_weather(WeatherReport {
            temp_f: Some(70.0),
            ..Default::default()
        });
        board.push_details("abc", AircraftDetails::default());

        assert!(board.fetch_current(GeoPoint::new(0.0, 0.0)).await.is_ok());
        assert!(board.fetch_details("abc").await.is_ok());
    }
}
