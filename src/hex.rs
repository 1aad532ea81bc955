//! Hex geometry primitives: coordinates, directions, and metrics.
//!
//! Everything here is plain data over `bevy::math` types, free of ECS state,
//! so it can be exercised directly from unit tests.

mod coordinates;
mod direction;
mod metrics;

pub use coordinates::HexCoordinates;
pub use direction::HexDirection;
pub use metrics::{EdgeType, HexMetrics};
