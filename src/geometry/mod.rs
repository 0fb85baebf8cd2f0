mod corridor;
mod types;

pub use corridor::*;
pub use types::{BoundingBox, CorridorSpec, GeoPoint};
