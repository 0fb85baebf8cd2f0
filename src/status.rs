use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::arbiter::{DisplayMode, DisplayPayload};
use crate::flight::Observation;
use crate::render::Frame;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DisplayStatus {
    pub mode: DisplayMode,
    pub payload: DisplayPayload,
    /// When the current payload first appeared.
    pub payload_since: Option<DateTime<Utc>>,
    pub last_poll: Option<DateTime<Utc>>,
    pub last_best: Option<Observation>,
    pub frame: Option<Frame>,
}

#[derive(Debug)]
struct Shared {
    status: DisplayStatus,
}

/// What the panel currently shows, shared with the web server.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    shared: Arc<StdMutex<Shared>>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new(DisplayMode::Auto)
    }
}

impl StatusBoard {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            shared: Arc::new(StdMutex::new(Shared {
                status: DisplayStatus {
                    mode,
                    payload: DisplayPayload::Idle,
                    payload_since: None,
                    last_poll: None,
                    last_best: None,
                    frame: None,
                },
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> DisplayStatus {
        self.lock().status.clone()
    }

    /// Records one poll's outcome. Returns true when the payload differs from
    /// the previous one.
    pub fn publish_payload(&self, payload: &DisplayPayload, last_best: Option<&Observation>) -> bool {
        let now = Utc::now();
        let mut locked = self.lock();
        let changed = locked.status.payload != *payload || locked.status.payload_since.is_none();
        if changed {
            locked.status.payload = payload.clone();
            locked.status.payload_since = Some(now);
        }
        locked.status.last_poll = Some(now);
        locked.status.last_best = last_best.cloned();
        changed
    }

    pub fn publish_frame(&self, frame: Frame) {
        self.lock().status.frame = Some(frame);
    }
}
