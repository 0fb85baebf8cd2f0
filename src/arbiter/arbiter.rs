use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use utoipa::ToSchema;

use crate::feeds::{with_timeout, FeedError, Feeds};
use crate::flight::{pick_best, AircraftDetails, EnrichmentCache, Observation};
use crate::geometry::{corridor_bounding_box, BoundingBox, CorridorSpec, GeoPoint};
use crate::sports::GameSummary;
use crate::weather::WeatherReport;

use super::cache::SourceCache;
use super::payload::DisplayPayload;

pub const DEFAULT_SPORTS_TTL: Duration = Duration::from_secs(30);
pub const DEFAULT_WEATHER_TTL: Duration = Duration::from_secs(900);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Auto,
    Flight,
    Sports,
    Weather,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Flight,
    Sports,
    Weather,
}

impl DisplayMode {
    /// Sources in priority order; the first one producing a payload wins.
    fn chain(&self) -> &'static [Source] {
        match self {
            DisplayMode::Auto => &[Source::Flight, Source::Sports, Source::Weather],
            DisplayMode::Flight => &[Source::Flight],
            DisplayMode::Sports => &[Source::Sports],
            DisplayMode::Weather => &[Source::Weather],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ArbiterSettings {
    pub corridor: CorridorSpec,
    pub mode: DisplayMode,
    pub team: String,
    pub weather_location: GeoPoint,
    pub sports_ttl: Duration,
    pub weather_ttl: Duration,
    pub fetch_timeout: Duration,
    /// Bound on one whole flight fetch, host fallback included.
    pub flight_timeout: Duration,
    pub enrichment_capacity: usize,
    /// IATA code to display name.
    pub airports: HashMap<String, String>,
}

pub struct DataArbiter {
    settings: ArbiterSettings,
    region: BoundingBox,
    feeds: Feeds,
    sports: SourceCache<Option<GameSummary>>,
    weather: SourceCache<WeatherReport>,
    enrichment: EnrichmentCache,
    last_best: Option<Observation>,
}

impl DataArbiter {
    pub fn new(settings: ArbiterSettings, feeds: Feeds) -> Self {
        Self {
            region: corridor_bounding_box(&settings.corridor),
            sports: SourceCache::new("sports", settings.sports_ttl),
            weather: SourceCache::new("weather", settings.weather_ttl),
            enrichment: EnrichmentCache::new(settings.enrichment_capacity),
            settings,
            feeds,
            last_best: None,
        }
    }

    pub fn region(&self) -> &BoundingBox {
        &self.region
    }

    pub fn mode(&self) -> DisplayMode {
        self.settings.mode
    }

    /// Most recent aircraft that won a tick.
    pub fn last_best(&self) -> Option<&Observation> {
        self.last_best.as_ref()
    }

    /// Runs the priority chain once. Never fails: every source error falls
    /// through to the next source and finally to `Idle`.
    pub async fn tick(&mut self, now: Instant, today: NaiveDate) -> DisplayPayload {
        for source in self.settings.mode.chain() {
            let payload = match source {
                Source::Flight => self.flight_payload().await,
                Source::Sports => self.sports_payload(now, today).await,
                Source::Weather => self.weather_payload(now).await,
            };
            if let Some(payload) = payload {
                return payload;
            }
        }
        DisplayPayload::Idle
    }

    async fn flight_payload(&mut self) -> Option<DisplayPayload> {
        let fetch = self.feeds.flight.fetch_observations(&self.region);
        let observations = match with_timeout(self.settings.flight_timeout, fetch).await {
            Ok(observations) => observations,
            Err(e) => {
                log::warn!("Flight feed failed: {}", e);
                Vec::new()
            }
        };

        let best = pick_best(&observations, &self.settings.corridor)?.clone();
        let details = self.enrichment_for(&best.identifier).await;
        let payload = DisplayPayload::flight(&best, details.as_ref(), &self.settings.airports);
        self.last_best = Some(best);
        Some(payload)
    }

    async fn enrichment_for(&mut self, identifier: &str) -> Option<AircraftDetails> {
        if let Some(details) = self.enrichment.get(identifier) {
            return Some(details.clone());
        }

        let fetch = self.feeds.enrichment.fetch_details(identifier);
        match with_timeout(self.settings.fetch_timeout, fetch).await {
            Ok(details) => {
                self.enrichment.insert(identifier, details.clone());
                Some(details)
            }
            Err(e) => {
                log::debug!("No enrichment for {}: {}", identifier, e);
                None
            }
        }
    }

    async fn sports_payload(&mut self, now: Instant, today: NaiveDate) -> Option<DisplayPayload> {
        let Self {
            settings,
            feeds,
            sports,
            ..
        } = self;
        let feeds = &*feeds;
        let team = settings.team.as_str();
        let limit = settings.fetch_timeout;

        let game = sports
            .get_or_fetch(now, move || async move {
                let games = with_timeout(limit, feeds.sports.fetch_live_games(today)).await?;
                Ok::<_, FeedError>(tracked_game(&games, team))
            })
            .await?
            .as_ref()?;

        if !game.is_eligible() {
            log::debug!(
                "{} game not shown ({} {}-{} {})",
                game.team_abbr,
                game.state,
                game.team_score,
                game.opp_score,
                game.opp_abbr
            );
            return None;
        }
        Some(DisplayPayload::sport(game))
    }

    async fn weather_payload(&mut self, now: Instant) -> Option<DisplayPayload> {
        let Self {
            settings,
            feeds,
            weather,
            ..
        } = self;
        let feeds = &*feeds;
        let location = settings.weather_location;
        let limit = settings.fetch_timeout;

        let report = weather
            .get_or_fetch(now, move || async move {
                with_timeout(limit, feeds.weather.fetch_current(location)).await
            })
            .await?;
        Some(DisplayPayload::weather(report))
    }
}

/// The tracked team's game, preferring one that is in progress.
fn tracked_game(games: &[GameSummary], team: &str) -> Option<GameSummary> {
    let mut first = None;
    for game in games.iter().filter_map(|g| g.oriented_for(team)) {
        if game.is_live() {
            return Some(game);
        }
        first.get_or_insert(game);
    }
    first
}
