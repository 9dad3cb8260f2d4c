//! HUD snapshot
//!
//! Everything a score/ball/status overlay needs, copied out of the table once
//! per frame so the presentation layer never holds a borrow on the simulation.

use serde::Serialize;

use crate::sim::{TableController, TablePhase};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub balls_remaining: u32,
    pub phase: TablePhase,
    pub message: &'static str,
    /// Plunger meter fill (0-1)
    pub plunger_fraction: f32,
    /// Tilt warning fill (0-1)
    pub tilt_fraction: f32,
}

impl HudSnapshot {
    pub fn from_table(table: &TableController) -> Self {
        Self {
            score: table.score,
            balls_remaining: table.balls_remaining,
            phase: table.phase,
            message: table.message(),
            plunger_fraction: table.plunger_fraction(),
            tilt_fraction: table.tilt_fraction(),
        }
    }

    /// Score line, e.g. "Score: 1200"
    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// Balls line, e.g. "Balls: 3"
    pub fn balls_text(&self) -> String {
        format!("Balls: {}", self.balls_remaining)
    }
}

impl TableController {
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::from_table(self)
    }
}
