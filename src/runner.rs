use std::time::Duration;

use chrono::Local;
use thiserror::Error;
use tokio::time::Instant;

use crate::arbiter::DataArbiter;
use crate::render::{layout, DisplayError, LayoutSpec, ScrollRenderer, TextRenderer};
use crate::shutdown::Shutdown;
use crate::status::StatusBoard;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_ERROR_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("display error: {0}")]
    Display(#[from] DisplayError),
}

/// Polls the arbiter and animates the result until the next poll is due.
pub struct MainLoop<R: TextRenderer> {
    arbiter: DataArbiter,
    renderer: ScrollRenderer,
    target: R,
    layout: LayoutSpec,
    status: StatusBoard,
    poll_interval: Duration,
    error_backoff: Duration,
}

impl<R: TextRenderer> MainLoop<R> {
    pub fn new(
        arbiter: DataArbiter,
        renderer: ScrollRenderer,
        target: R,
        status: StatusBoard,
    ) -> Self {
        Self {
            arbiter,
            renderer,
            target,
            layout: LayoutSpec::default(),
            status,
            poll_interval: DEFAULT_POLL_INTERVAL,
            error_backoff: DEFAULT_ERROR_BACKOFF,
        }
    }

    pub fn with_layout(mut self, layout: LayoutSpec) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_timing(mut self, poll_interval: Duration, error_backoff: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.error_backoff = error_backoff;
        self
    }

    pub async fn run(mut self, mut shutdown: Shutdown) {
        log::info!(
            "Display loop started (mode {:?}, polling every {})",
            self.arbiter.mode(),
            humantime::format_duration(self.poll_interval)
        );

        while !shutdown.is_triggered() {
            if let Err(e) = self.run_once(&mut shutdown).await {
                log::error!("Display iteration failed: {}", e);
                if shutdown.sleep_until(Instant::now() + self.error_backoff).await {
                    break;
                }
            }
        }

        log::info!("Display loop stopped");
    }

    /// One poll: arbitrate, publish, then draw frames until the next poll
    /// deadline or shutdown.
    pub async fn run_once(&mut self, shutdown: &mut Shutdown) -> Result<(), LoopError> {
        let started = Instant::now();
        let next_poll = started + self.poll_interval;

        let payload = tokio::select! {
            payload = self.arbiter.tick(started, Local::now().date_naive()) => payload,
            _ = shutdown.triggered() => return Ok(()),
        };

        if self.status.publish_payload(&payload, self.arbiter.last_best()) {
            log::info!("Showing {} payload", payload.kind());
        }
        let lines = layout(&payload, &self.layout);
        if self.renderer.set_lines(lines, &self.target) {
            log::debug!("Lines changed, scroll cycle restarted");
        }

        loop {
            let wake = match self.renderer.draw_frame(&mut self.target)? {
                Some(hold) => (Instant::now() + hold).min(next_poll),
                None => next_poll,
            };
            if shutdown.sleep_until(wake).await || wake >= next_poll {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbiter::{ArbiterSettings, DisplayMode, DisplayPayload};
    use crate::feeds::{FeedBoard, Feeds};
    use crate::geometry::{CorridorSpec, GeoPoint};
    use crate::render::{Color, ScrollProfile, ViewportSpec, VirtualDisplay};
    use crate::shutdown;
    use crate::weather::WeatherReport;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn settings(mode: DisplayMode) -> ArbiterSettings {
        let corridor = CorridorSpec {
            p1: GeoPoint::new(32.690, -117.008),
            p2: GeoPoint::new(32.726, -117.159),
            half_width_m: 804.672,
            altitude_min_ft: 200.0,
            altitude_max_ft: 4000.0,
            require_altitude: true,
        };
        ArbiterSettings {
            weather_location: corridor.p1.midpoint(&corridor.p2),
            corridor,
            mode,
            team: "SD".to_string(),
            sports_ttl: Duration::from_secs(30),
            weather_ttl: Duration::from_secs(900),
            fetch_timeout: Duration::from_secs(8),
            flight_timeout: Duration::from_secs(8),
            enrichment_capacity: 16,
            airports: HashMap::new(),
        }
    }

    const VIEWPORT: ViewportSpec = ViewportSpec {
        width_px: 64,
        margin_px: 2,
    };

    fn weather_board() -> FeedBoard {
        let board = FeedBoard::default();
        board.push_weather(WeatherReport {
            temp_f: Some(72.0),
            wind_mph: Some(9.0),
            wind_degree: Some(270.0),
        });
        board
    }

    fn display_loop(board: &FeedBoard, status: &StatusBoard) -> MainLoop<VirtualDisplay> {
        let arbiter = DataArbiter::new(
            settings(DisplayMode::Weather),
            Feeds::from_board(board, &["primary"], Duration::from_secs(8)),
        );
        let renderer = ScrollRenderer::new(VIEWPORT, ScrollProfile::Standard.timing());
        let target = VirtualDisplay::new(64, 32, 6, status.clone());
        MainLoop::new(arbiter, renderer, target, status.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn iteration_publishes_payload_and_frame_then_waits_for_poll() {
        let board = weather_board();
        let status = StatusBoard::new(DisplayMode::Weather);
        let mut display = display_loop(&board, &status);
        let (_trigger, mut shutdown) = shutdown::channel();

        let start = Instant::now();
        display.run_once(&mut shutdown).await.unwrap();
        assert!(start.elapsed() >= DEFAULT_POLL_INTERVAL);

        let snapshot = status.snapshot();
        assert!(matches!(
            snapshot.payload,
            DisplayPayload::Weather {
                temp_color: Color::GREEN,
                ..
            }
        ));
        let frame = snapshot.frame.expect("frame presented");
        let texts: Vec<_> = frame.ops.iter().map(|op| op.text.as_str()).collect();
        assert_eq!(texts, vec!["72F", "W 9MPH"]);
        assert_eq!(frame.sequence, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_loop_promptly() {
        let board = weather_board();
        let status = StatusBoard::new(DisplayMode::Weather);
        let display = display_loop(&board, &status);
        let (trigger, shutdown) = shutdown::channel();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(45)).await;
            trigger.trigger("test");
        });

        let start = Instant::now();
        display.run(shutdown).await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(45));
        assert!(elapsed < Duration::from_secs(46));
        assert!(status.snapshot().last_poll.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn loop_ends_when_trigger_is_dropped() {
        let board = weather_board();
        let status = StatusBoard::new(DisplayMode::Weather);
        let display = display_loop(&board, &status);
        let (trigger, shutdown) = shutdown::channel();

        drop(trigger);

        let finished = tokio::time::timeout(Duration::from_secs(120), display.run(shutdown)).await;
        assert!(finished.is_ok());
    }

    struct BrokenPanel {
        presents: Arc<AtomicUsize>,
    }

    impl TextRenderer for BrokenPanel {
        fn measure(&self, text: &str) -> i32 {
            text.len() as i32 * 6
        }

        fn draw_at(&mut self, _: i32, _: i32, _: Color, _: &str) -> Result<(), DisplayError> {
            Ok(())
        }

        fn clear(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }

        fn present(&mut self) -> Result<(), DisplayError> {
            self.presents.fetch_add(1, Ordering::SeqCst);
            Err(DisplayError::Draw("panel unplugged".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn display_errors_back_off_and_retry() {
        let board = weather_board();
        let status = StatusBoard::new(DisplayMode::Weather);
        let presents = Arc::new(AtomicUsize::new(0));
        let display = MainLoop::new(
            DataArbiter::new(
                settings(DisplayMode::Weather),
                Feeds::from_board(&board, &["primary"], Duration::from_secs(8)),
            ),
            ScrollRenderer::new(VIEWPORT, ScrollProfile::Standard.timing()),
            BrokenPanel {
                presents: presents.clone(),
            },
            status.clone(),
        )
        .with_timing(Duration::from_secs(30), Duration::from_secs(2));
        let (trigger, shutdown) = shutdown::channel();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            trigger.trigger("test");
        });
        display.run(shutdown).await;

        // Attempts at 0s, 2s and 4s.
        assert_eq!(presents.load(Ordering::SeqCst), 3);
        assert!(status.snapshot().frame.is_none());
    }
}
