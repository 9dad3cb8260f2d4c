//! End-to-end table scenarios driven through the public API

use flipper_table::Tuning;
use flipper_table::consts::*;
use flipper_table::sim::{ObstacleKind, TableAction, TableController, TableEvent, TablePhase};
use glam::Vec2;
use proptest::prelude::*;

/// Run `frames` updates of `dt`, taking each frame's events
fn run_collecting(table: &mut TableController, frames: usize, dt: f32) -> Vec<TableEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        table.update(dt);
        events.extend(table.take_events());
    }
    events
}

/// Nudge back and forth until the table tilts
fn nudge_to_tilt(table: &mut TableController) {
    let mut direction = 1.0;
    while table.phase != TablePhase::Tilt {
        table.nudge(direction);
        direction = -direction;
    }
}

#[test]
fn plunger_launch_from_ready() {
    let mut table = TableController::new();
    let fixed_dt = table.tuning.fixed_dt;
    let plunger_max = table.tuning.plunger_max;
    let base_launch = table.tuning.base_launch;

    table.set_plunger_held(true);
    for _ in 0..120 {
        table.update(fixed_dt);
    }
    assert_eq!(table.plunger_charge, plunger_max);
    assert_eq!(table.phase, TablePhase::Ready);
    assert!((table.hud().plunger_fraction - 1.0).abs() < 1e-6);

    table.set_plunger_held(false);
    table.update(0.0);

    assert_eq!(table.phase, TablePhase::Play);
    assert!(!table.in_shooter_lane);
    assert!((table.ball.vel.y - (base_launch + plunger_max)).abs() < 1e-4);
    assert_eq!(table.plunger_charge, 0.0);
    assert!(table
        .events()
        .contains(&TableEvent::Launched { power: plunger_max }));

    // Once physics runs the speed cap applies
    table.update(fixed_dt);
    assert!(table.ball.speed() <= table.tuning.max_speed + 1e-4);
}

#[test]
fn bumper_scores_exactly_once_per_step() {
    let mut table = TableController::new();
    let bumper = table
        .obstacles
        .iter()
        .find(|o| o.kind == ObstacleKind::Bumper)
        .cloned()
        .unwrap();

    table.phase = TablePhase::Play;
    table.in_shooter_lane = false;
    let offset = bumper.radius + table.ball.radius - 0.01;
    table.ball.pos = bumper.center + Vec2::new(0.0, offset);
    table.ball.vel = Vec2::new(0.0, -2.0);

    table.step_physics(table.tuning.fixed_dt);

    assert_eq!(table.score, table.tuning.bumper_score);
    let hits = table
        .events()
        .iter()
        .filter(|e| matches!(e, TableEvent::ObstacleHit { .. }))
        .count();
    assert_eq!(hits, 1);

    // Pushed clear of the bumper, moving away
    let dist = (table.ball.pos - bumper.center).length();
    let expected = bumper.radius + table.ball.radius + table.tuning.contact_epsilon;
    assert!((dist - expected).abs() < 1e-4);
    assert!(table.ball.vel.y > 0.0);
}

#[test]
fn nudge_over_the_limit_tilts() {
    let mut table = TableController::new();
    table.phase = TablePhase::Play;
    table.in_shooter_lane = false;
    table.ball.pos = Vec2::new(0.0, 1.0);
    table.tilt_meter = table.tuning.tilt_limit - 0.5;
    table.apply(TableAction::LeftFlipper(true));
    table.apply(TableAction::RightFlipper(true));

    table.apply(TableAction::Nudge(1.0));

    assert_eq!(table.phase, TablePhase::Tilt);
    assert!(!table.left_flipper.pressed);
    assert!(!table.right_flipper.pressed);
    assert_eq!(table.tilt_meter, table.tuning.tilt_limit);
    assert_eq!(table.tilt_lock, table.tuning.tilt_lock);
    assert_eq!(table.hud().message, TablePhase::Tilt.message());
}

#[test]
fn tilt_lock_expiring_in_play_resumes_play() {
    // No gravity, so the ball rolls sideways above the posts until the lock ends
    let tuning = Tuning {
        gravity_down: 0.0,
        ..Tuning::default()
    };
    let mut table = TableController::with_tuning(tuning);
    table.phase = TablePhase::Play;
    table.in_shooter_lane = false;
    table.ball.pos = Vec2::new(0.0, 0.5);
    nudge_to_tilt(&mut table);
    table.take_events();

    table.set_left_flipper(true);
    assert!(!table.left_flipper.pressed);

    let events = run_collecting(&mut table, 40, 0.1);

    assert_eq!(table.phase, TablePhase::Play);
    assert_eq!(table.tilt_lock, 0.0);
    assert_eq!(table.balls_remaining, 3);
    let recovered = events.iter().filter(|e| **e == TableEvent::TiltRecovered);
    assert_eq!(recovered.count(), 1);
    assert_eq!(table.message(), "");

    table.set_left_flipper(true);
    assert!(table.left_flipper.pressed);
}

#[test]
fn drain_during_tilt_goes_to_ready_without_recovery() {
    let mut table = TableController::new();
    table.phase = TablePhase::Play;
    table.in_shooter_lane = false;
    table.ball.pos = Vec2::new(0.0, DRAIN_Y + 0.01);
    table.ball.vel = Vec2::new(0.0, -5.0);
    nudge_to_tilt(&mut table);
    table.take_events();

    table.update(table.tuning.fixed_dt);

    assert_eq!(table.phase, TablePhase::Ready);
    assert_eq!(table.balls_remaining, 2);
    assert!(table.in_shooter_lane);
    assert!(table.events().contains(&TableEvent::Drained { balls_remaining: 2 }));

    // The lock keeps counting down after the drain
    let lock = table.tilt_lock;
    assert!(lock > 0.0);
    table.update(0.1);
    assert!(table.tilt_lock < lock);
    assert!(table.tilt_lock > 0.0);

    // Flippers answer again once the phase has left Tilt
    table.set_left_flipper(true);
    table.set_right_flipper(true);
    assert!(table.left_flipper.pressed);
    assert!(table.right_flipper.pressed);

    let events = run_collecting(&mut table, 40, 0.1);
    assert_eq!(table.tilt_lock, 0.0);
    assert_eq!(table.phase, TablePhase::Ready);
    assert!(!events.contains(&TableEvent::TiltRecovered));
}

#[test]
fn last_ball_drain_during_tilt_is_game_over() {
    let mut table = TableController::new();
    table.phase = TablePhase::Play;
    table.in_shooter_lane = false;
    table.balls_remaining = 1;
    table.ball.pos = Vec2::new(0.0, DRAIN_Y + 0.01);
    table.ball.vel = Vec2::new(0.0, -5.0);
    nudge_to_tilt(&mut table);
    table.take_events();

    let events = run_collecting(&mut table, 40, 0.1);

    assert_eq!(table.phase, TablePhase::GameOver);
    assert_eq!(table.balls_remaining, 0);
    assert_eq!(table.tilt_lock, 0.0);
    assert!(events.contains(&TableEvent::GameOver { score: 0 }));
    assert!(!events.contains(&TableEvent::TiltRecovered));
}

#[test]
fn last_ball_drain_is_game_over_and_sticks() {
    let mut table = TableController::new();
    table.phase = TablePhase::Play;
    table.in_shooter_lane = false;
    table.balls_remaining = 1;
    table.score = 1234;
    table.ball.pos = Vec2::new(0.0, DRAIN_Y - 0.1);

    table.update(1.0 / 60.0);

    assert_eq!(table.balls_remaining, 0);
    assert_eq!(table.phase, TablePhase::GameOver);
    assert!(table.events().contains(&TableEvent::GameOver { score: 1234 }));

    for _ in 0..120 {
        table.update(1.0 / 60.0);
    }
    assert_eq!(table.balls_remaining, 0);
    assert_eq!(table.phase, TablePhase::GameOver);

    // Launch is dead in game over
    table.set_plunger_held(true);
    table.update(0.5);
    table.set_plunger_held(false);
    table.update(0.1);
    assert_eq!(table.phase, TablePhase::GameOver);
}

#[test]
fn restart_resets_everything() {
    let mut table = TableController::new();
    table.phase = TablePhase::GameOver;
    table.balls_remaining = 0;
    table.score = 9000;
    table.tilt_meter = 3.0;
    table.tilt_lock = 1.0;
    table.in_shooter_lane = false;
    table.ball.pos = Vec2::new(-1.0, -5.9);

    table.apply(TableAction::Restart);

    assert_eq!(table.score, 0);
    assert_eq!(table.balls_remaining, 3);
    assert_eq!(table.phase, TablePhase::Ready);
    assert_eq!(table.tilt_meter, 0.0);
    assert_eq!(table.tilt_lock, 0.0);
    assert!(table.in_shooter_lane);
    assert_eq!(table.accumulator(), 0.0);
    assert!(table.events().contains(&TableEvent::Restarted));
}

#[test]
fn full_game_runs_out_of_balls() {
    // Never flip: every ball drains eventually
    let mut table = TableController::new();
    let mut drains = 0;
    for _ in 0..3 {
        table.set_plunger_held(true);
        for _ in 0..30 {
            table.update(1.0 / 60.0);
        }
        table.set_plunger_held(false);
        for _ in 0..(60 * 60) {
            table.update(1.0 / 60.0);
            drains += table
                .take_events()
                .iter()
                .filter(|e| matches!(e, TableEvent::Drained { .. }))
                .count();
            if table.phase != TablePhase::Play {
                break;
            }
        }
    }
    assert_eq!(drains, 3);
    assert_eq!(table.phase, TablePhase::GameOver);
    assert_eq!(table.balls_remaining, 0);
}

fn action_strategy() -> impl Strategy<Value = TableAction> {
    prop_oneof![
        any::<bool>().prop_map(TableAction::LeftFlipper),
        any::<bool>().prop_map(TableAction::RightFlipper),
        prop_oneof![Just(-1.0f32), Just(1.0f32)].prop_map(TableAction::Nudge),
        any::<bool>().prop_map(TableAction::Plunger),
        Just(TableAction::Restart),
    ]
}

proptest! {
    #[test]
    fn speed_bounded_after_every_step(
        x in PLAY_X_LEFT..PLAY_X_RIGHT,
        y in (DRAIN_Y + 0.5)..PLAY_Y_TOP,
        vx in -40.0f32..40.0,
        vy in -40.0f32..40.0,
        script in proptest::collection::vec(
            (proptest::option::of(action_strategy()), 1usize..4),
            1..120,
        ),
    ) {
        let mut table = TableController::new();
        table.phase = TablePhase::Play;
        table.in_shooter_lane = false;
        table.ball.pos = Vec2::new(x, y);
        table.ball.vel = Vec2::new(vx, vy);
        let max_speed = table.tuning.max_speed;
        let fixed_dt = table.tuning.fixed_dt;

        for (action, steps) in script {
            if let Some(action) = action {
                table.apply(action);
            }
            for _ in 0..steps {
                table.step_physics(fixed_dt);
                let speed = table.ball.speed();
                prop_assert!(speed <= max_speed + 1e-3, "speed {}", speed);
                let meter = table.tilt_meter;
                prop_assert!(meter >= 0.0 && meter <= table.tuning.tilt_limit);
            }
        }
    }

    #[test]
    fn balls_never_negative(frames in proptest::collection::vec(0.0f32..0.2, 1..400)) {
        let mut table = TableController::new();
        table.phase = TablePhase::Play;
        table.in_shooter_lane = false;
        table.ball.pos = Vec2::new(0.0, 0.0);
        let start = table.balls_remaining;
        for dt in frames {
            let before = table.balls_remaining;
            table.update(dt);
            prop_assert!(table.balls_remaining <= before);
            prop_assert!(table.balls_remaining <= start);
            if table.balls_remaining == 0 {
                prop_assert_eq!(table.phase, TablePhase::GameOver);
            }
        }
    }
}
