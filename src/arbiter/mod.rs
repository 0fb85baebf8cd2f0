mod arbiter;
mod cache;
mod payload;

pub use arbiter::{
    ArbiterSettings, DataArbiter, DisplayMode, DEFAULT_FETCH_TIMEOUT, DEFAULT_SPORTS_TTL,
    DEFAULT_WEATHER_TTL,
};
pub use payload::DisplayPayload;
