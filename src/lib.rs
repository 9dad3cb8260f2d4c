//! Flipper Table - a pinball table physics and game-state engine
//!
//! Core modules:
//! - `geometry`: Scalar/vector helpers shared by the collision routines
//! - `sim`: Deterministic simulation (ball, bumpers, flippers, table state machine)
//! - `tuning`: Data-driven physics and scoring balance
//! - `hud`: Read-only snapshot for HUD/render layers
//!
//! Rendering, audio and device input live outside this crate. They read
//! `Ball::pos`, `Flipper::angle_deg` and [`HudSnapshot`] each frame and feed
//! logical [`sim::TableAction`]s back in.

pub mod geometry;
pub mod hud;
pub mod sim;
pub mod tuning;

pub use hud::HudSnapshot;
pub use sim::{TableController, TablePhase};
pub use tuning::{Tuning, TuningError};

/// Table geometry constants (world units, table plane is x across / y up-table)
pub mod consts {
    /// Table width and length
    pub const TABLE_W: f32 = 6.0;
    pub const TABLE_L: f32 = 12.0;
    pub const X_MIN: f32 = -TABLE_W / 2.0;
    pub const X_MAX: f32 = TABLE_W / 2.0;
    pub const Y_MIN: f32 = -TABLE_L / 2.0;
    pub const Y_MAX: f32 = TABLE_L / 2.0;

    pub const WALL_THICKNESS: f32 = 0.16;
    pub const BALL_RADIUS: f32 = 0.18;

    /// Ball-center limits of the playfield
    pub const PLAY_Y_TOP: f32 = Y_MAX - WALL_THICKNESS - BALL_RADIUS;
    pub const PLAY_Y_BOTTOM: f32 = Y_MIN + WALL_THICKNESS + BALL_RADIUS;
    pub const PLAY_X_LEFT: f32 = X_MIN + WALL_THICKNESS + BALL_RADIUS;
    pub const PLAY_X_RIGHT: f32 = X_MAX - SHOOTER_W - WALL_THICKNESS - BALL_RADIUS;

    /// Ball below this line (outside the shooter lane) is lost
    pub const DRAIN_Y: f32 = Y_MIN + 0.55;

    /// Shooter lane runs up the right-hand side
    pub const SHOOTER_W: f32 = 0.7;
    pub const SHOOTER_X: f32 = X_MAX - (WALL_THICKNESS + SHOOTER_W / 2.0);
    pub const SHOOTER_Y: f32 = Y_MIN + 0.9;
    /// Lateral play of the ball inside the lane
    pub const SHOOTER_X_SLACK: f32 = 0.05;
    pub const SHOOTER_FLOOR: f32 = Y_MIN + 0.4;
    pub const SHOOTER_CEILING: f32 = -3.6;

    /// Flipper defaults
    pub const FLIPPER_LENGTH: f32 = 1.25;
    pub const FLIPPER_THICKNESS: f32 = 0.22;
    pub const FLIPPER_PIVOT_X: f32 = 1.15;
    pub const FLIPPER_PIVOT_Y: f32 = -4.2;
    pub const LEFT_REST_DEG: f32 = 20.0;
    pub const LEFT_EXTENDED_DEG: f32 = 70.0;
    pub const RIGHT_REST_DEG: f32 = 160.0;
    pub const RIGHT_EXTENDED_DEG: f32 = 110.0;
}
