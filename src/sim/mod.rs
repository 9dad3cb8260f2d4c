//! Deterministic simulation module
//!
//! All table logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable collision order (bumpers, posts, left flipper, right flipper)
//! - No rendering, audio or device dependencies

pub mod flipper;
pub mod input;
pub mod obstacle;
pub mod state;
pub mod table;

pub use flipper::Flipper;
pub use input::{InputQueue, TableAction};
pub use obstacle::{CircularObstacle, ObstacleKind};
pub use state::{Ball, FlipperSide, ObstacleSpec, TableEvent, TableLayout, TablePhase};
pub use table::TableController;
