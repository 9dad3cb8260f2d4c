//! Flipper Table headless driver
//!
//! Runs the table at a simulated 60 Hz with a simple autoplayer standing in
//! for a human, logging table events and printing the final HUD as JSON.
//! Set `FLIPPER_TABLE_TUNING` to a JSON file to override the default tuning.

#[cfg(not(target_arch = "wasm32"))]
use flipper_table::sim::{InputQueue, TableAction, TableController, TableEvent, TablePhase};
#[cfg(not(target_arch = "wasm32"))]
use flipper_table::Tuning;

/// Simulated frame time
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after ten simulated minutes
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Frames the autoplayer holds the plunger
#[cfg(not(target_arch = "wasm32"))]
const PLUNGER_HOLD_FRAMES: u32 = 40;
/// Ball below this line is in flipper range
#[cfg(not(target_arch = "wasm32"))]
const FLIP_ZONE_Y: f32 = -3.3;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flipper Table (headless) starting...");

    let mut table = TableController::with_tuning(load_tuning());
    let mut input = InputQueue::new();
    let mut plunger_frames = 0;
    let mut frames = 0;

    while frames < MAX_FRAMES && table.phase != TablePhase::GameOver {
        autoplay(&table, &mut input, &mut plunger_frames);
        table.apply_queue(&mut input);
        table.update(FRAME_DT);

        for event in table.take_events() {
            match event {
                TableEvent::ObstacleHit { .. } | TableEvent::FlipperHit { .. } => {
                    log::debug!("{:?}", event)
                }
                _ => log::info!("{:?}", event),
            }
        }
        frames += 1;
    }

    log::info!("Session ended after {:.1}s simulated", frames as f32 * FRAME_DT);
    match serde_json::to_string_pretty(&table.hud()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode HUD: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on wasm; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning() -> Tuning {
    let Ok(path) = std::env::var("FLIPPER_TABLE_TUNING") else {
        return Tuning::default();
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Could not read tuning {path}: {e}, using defaults");
            return Tuning::default();
        }
    };
    match Tuning::from_json_str(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {path}");
            tuning
        }
        Err(e) => {
            log::warn!("Rejected tuning {path}: {e}, using defaults");
            Tuning::default()
        }
    }
}

/// Queue this frame's inputs: charge and fire the plunger, then flip the
/// flipper on whichever side the falling ball is approaching
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(table: &TableController, input: &mut InputQueue, plunger_frames: &mut u32) {
    match table.phase {
        TablePhase::Ready if table.in_shooter_lane => {
            if *plunger_frames < PLUNGER_HOLD_FRAMES {
                input.push(TableAction::Plunger(true));
                *plunger_frames += 1;
            } else {
                input.push(TableAction::Plunger(false));
                *plunger_frames = 0;
            }
        }
        TablePhase::Play => {
            let ball = &table.ball;
            let falling_into_zone = ball.pos.y < FLIP_ZONE_Y && ball.vel.y < 0.0;
            input.push(TableAction::LeftFlipper(falling_into_zone && ball.pos.x <= 0.0));
            input.push(TableAction::RightFlipper(falling_into_zone && ball.pos.x > 0.0));
        }
        _ => {}
    }
}
