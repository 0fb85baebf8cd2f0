use std::time::Duration;

use async_trait::async_trait;

use crate::flight::Observation;
use crate::geometry::BoundingBox;

use super::{with_timeout, FeedError, FeedResult, FlightFeed};

/// Tries each backend in order; the first one that answers wins. A backend
/// that outlives its time limit counts as failed and the next one is tried.
pub struct FallbackFlightFeed {
    backends: Vec<(String, Box<dyn FlightFeed>)>,
    backend_timeout: Option<Duration>,
}

impl FallbackFlightFeed {
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
            backend_timeout: None,
        }
    }

    pub fn per_backend_timeout(mut self, limit: Duration) -> Self {
        self.backend_timeout = Some(limit);
        self
    }

    pub fn with_backend(mut self, name: impl Into<String>, feed: Box<dyn FlightFeed>) -> Self {
        self.backends.push((name.into(), feed));
        self
    }
}

impl Default for FallbackFlightFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FlightFeed for FallbackFlightFeed {
    async fn fetch_observations(&self, region: &BoundingBox) -> FeedResult<Vec<Observation>> {
        let mut last_error = FeedError::Unavailable;
        for (name, backend) in &self.backends {
            let fetch = backend.fetch_observations(region);
            let result = match self.backend_timeout {
                Some(limit) => with_timeout(limit, fetch).await,
                None => fetch.await,
            };
            match result {
                Ok(observations) => return Ok(observations),
                Err(e) => {
                    log::warn!("Flight backend {} failed: {}", name, e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Scripted {
        result: Option<Vec<Observation>>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl FlightFeed for Scripted {
        async fn fetch_observations(&self, _region: &BoundingBox) -> FeedResult<Vec<Observation>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .ok_or_else(|| FeedError::Transport("connection refused".into()))
        }
    }

    fn region() -> BoundingBox {
        BoundingBox {
            north: 1.0,
            south: 0.0,
            west: 0.0,
            east: 1.0,
        }
    }

    fn sample(id: &str) -> Observation {
        Observation {
            lat: 0.5,
            lon: 0.5,
            altitude_ft: Some(1000.0),
            identifier: id.into(),
            callsign: String::new(),
            source_id: "scripted".into(),
        }
    }

    #[tokio::test]
    async fn first_success_wins_and_later_hosts_are_skipped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let feed = FallbackFlightFeed::new()
            .with_backend("cloud", Box::new(Scripted { result: None, calls: calls.clone() }))
            .with_backend(
                "live",
                Box::new(Scripted {
                    result: Some(vec![sample("abc")]),
                    calls: calls.clone(),
                }),
            )
            .with_backend(
                "spare",
                Box::new(Scripted {
                    result: Some(vec![sample("never")]),
                    calls: calls.clone(),
                }),
            );

        let observations = feed.fetch_observations(&region()).await.expect("live answers");
        assert_eq!(observations[0].identifier, "abc");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn all_failures_surface_the_last_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let feed = FallbackFlightFeed::new()
            .with_backend("a", Box::new(Scripted { result: None, calls: calls.clone() }))
            .with_backend("b", Box::new(Scripted { result: None, calls: calls.clone() }));

        let err = feed.fetch_observations(&region()).await.unwrap_err();
        assert!(matches!(err, FeedError::Transport(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    struct Hanging;

    #[async_trait]
    impl FlightFeed for Hanging {
        async fn fetch_observations(&self, _region: &BoundingBox) -> FeedResult<Vec<Observation>> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_backend_times_out_and_next_host_answers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let feed = FallbackFlightFeed::new()
            .per_backend_timeout(Duration::from_secs(8))
            .with_backend("stuck", Box::new(Hanging))
            .with_backend(
                "backup",
                Box::new(Scripted {
                    result: Some(vec![sample("abc")]),
                    calls: calls.clone(),
                }),
            );
        let start = tokio::time::Instant::now();

        let observations = feed.fetch_observations(&region()).await.expect("backup answers");

        assert_eq!(observations[0].identifier, "abc");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() >= Duration::from_secs(8));
        assert!(start.elapsed() < Duration::from_secs(9));
    }

    #[tokio::test(start_paused = true)]
    async fn every_host_hung_reports_timeout() {
        let feed = FallbackFlightFeed::new()
            .per_backend_timeout(Duration::from_secs(8))
            .with_backend("a", Box::new(Hanging))
            .with_backend("b", Box::new(Hanging));

        let err = feed.fetch_observations(&region()).await.unwrap_err();
        assert!(matches!(err, FeedError::Timeout(_)));
    }

    #[tokio::test]
    async fn no_backends_is_unavailable() {
        let err = FallbackFlightFeed::new()
            .fetch_observations(&region())
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Unavailable));
    }
}
