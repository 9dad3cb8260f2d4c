//! Logical table input
//!
//! Device layers translate keys/buttons into `TableAction`s. Actions are
//! buffered between frames and applied before the table's `update`.

use serde::{Deserialize, Serialize};

/// One logical input edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TableAction {
    /// Left flipper button pressed (true) or released (false)
    LeftFlipper(bool),
    RightFlipper(bool),
    /// Lateral bump; sign picks the side (-1 left, +1 right)
    Nudge(f32),
    /// Launch button held (true) or released (false)
    Plunger(bool),
    /// Start a new game after game over
    Restart,
}

/// Actions received since the last frame, in arrival order
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    actions: Vec<TableAction>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            actions: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, action: TableAction) {
        self.actions.push(action);
    }

    /// Take all pending actions, leaving the queue empty
    pub fn drain(&mut self) -> Vec<TableAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
