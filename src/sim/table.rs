//! Table controller: fixed-timestep physics and the ready/play/tilt/game-over
//! state machine
//!
//! The host calls the input methods (or `apply`) as input edges arrive and
//! `update` once per rendered frame. `update` advances physics in fixed steps
//! from an accumulator, capped per frame.

use glam::Vec2;

use super::flipper::Flipper;
use super::input::{InputQueue, TableAction};
use super::obstacle::{CircularObstacle, ObstacleKind};
use super::state::{Ball, FlipperSide, TableEvent, TableLayout, TablePhase};
use crate::consts::*;
use crate::geometry::clamp;
use crate::tuning::Tuning;

/// One pinball table: ball, obstacles, flippers, plunger, tilt and score
#[derive(Debug, Clone)]
pub struct TableController {
    pub tuning: Tuning,
    pub ball: Ball,
    /// Bumpers and posts
    pub obstacles: Vec<CircularObstacle>,
    pub left_flipper: Flipper,
    pub right_flipper: Flipper,

    pub score: u64,
    pub balls_remaining: u32,
    pub phase: TablePhase,
    /// Nudge pressure in [0, tilt_limit]
    pub tilt_meter: f32,
    /// Seconds until a tilt releases the flippers
    pub tilt_lock: f32,
    /// Charge in [0, plunger_max]
    pub plunger_charge: f32,
    pub plunger_held: bool,
    pub in_shooter_lane: bool,

    /// Unsimulated time carried between frames
    accumulator: f32,
    /// Events of the current frame, plus any raised by input since it ended
    events: Vec<TableEvent>,
    /// Leading entries of `events` already reported by the previous frame
    reported_events: usize,
}

impl Default for TableController {
    fn default() -> Self {
        Self::new()
    }
}

impl TableController {
    /// Classic layout with default tuning
    pub fn new() -> Self {
        Self::with_layout(Tuning::default(), &TableLayout::default())
    }

    pub fn with_tuning(tuning: Tuning) -> Self {
        Self::with_layout(tuning, &TableLayout::default())
    }

    /// Build a table from `layout`
    ///
    /// A tuning that fails [`Tuning::validate`] is replaced by the defaults.
    pub fn with_layout(tuning: Tuning, layout: &TableLayout) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Rejected tuning: {e}, using defaults");
                Tuning::default()
            }
        };
        let obstacles = layout.obstacles.iter().map(CircularObstacle::from_spec).collect();
        let left_flipper = Flipper::new(
            FlipperSide::Left,
            tuning.flipper_extend_speed,
            tuning.flipper_return_speed,
        );
        let right_flipper = Flipper::new(
            FlipperSide::Right,
            tuning.flipper_extend_speed,
            tuning.flipper_return_speed,
        );
        let balls_remaining = tuning.starting_balls;

        Self {
            tuning,
            ball: Ball::at_shooter(),
            obstacles,
            left_flipper,
            right_flipper,
            score: 0,
            balls_remaining,
            phase: TablePhase::Ready,
            tilt_meter: 0.0,
            tilt_lock: 0.0,
            plunger_charge: 0.0,
            plunger_held: false,
            in_shooter_lane: true,
            accumulator: 0.0,
            events: Vec::new(),
            reported_events: 0,
        }
    }

    // --- Input ---

    /// Dispatch a logical action to the matching input method
    pub fn apply(&mut self, action: TableAction) {
        match action {
            TableAction::LeftFlipper(pressed) => self.set_left_flipper(pressed),
            TableAction::RightFlipper(pressed) => self.set_right_flipper(pressed),
            TableAction::Nudge(direction) => self.nudge(direction),
            TableAction::Plunger(held) => self.set_plunger_held(held),
            TableAction::Restart => {
                self.restart();
            }
        }
    }

    /// Apply every queued action in arrival order
    pub fn apply_queue(&mut self, queue: &mut InputQueue) {
        for action in queue.drain() {
            self.apply(action);
        }
    }

    /// Ignored while tilted
    pub fn set_left_flipper(&mut self, pressed: bool) {
        if self.phase != TablePhase::Tilt {
            self.left_flipper.set_pressed(pressed);
        }
    }

    /// Ignored while tilted
    pub fn set_right_flipper(&mut self, pressed: bool) {
        if self.phase != TablePhase::Tilt {
            self.right_flipper.set_pressed(pressed);
        }
    }

    pub fn set_plunger_held(&mut self, held: bool) {
        self.plunger_held = held;
    }

    /// Bump the table sideways; too many bumps in a short time tilts it
    ///
    /// Ignored outside Ready/Play and while a tilt lock is running.
    pub fn nudge(&mut self, direction: f32) {
        let can_nudge = matches!(self.phase, TablePhase::Ready | TablePhase::Play);
        if !can_nudge || self.tilt_lock > 0.0 {
            return;
        }

        let direction = clamp(direction, -1.0, 1.0);
        self.ball.vel.x += direction * self.tuning.nudge_push;
        self.tilt_meter = (self.tilt_meter + self.tuning.nudge_tilt).min(self.tuning.tilt_limit);
        self.events.push(TableEvent::Nudged { direction });

        if self.tilt_meter >= self.tuning.tilt_limit {
            self.enter_tilt();
        }
    }

    /// Start a new game. Only valid after game over; returns whether it ran.
    pub fn restart(&mut self) -> bool {
        if self.phase != TablePhase::GameOver {
            log::debug!("Restart ignored in {:?}", self.phase);
            return false;
        }

        self.score = 0;
        self.balls_remaining = self.tuning.starting_balls;
        self.phase = TablePhase::Ready;
        self.tilt_meter = 0.0;
        self.tilt_lock = 0.0;
        self.plunger_held = false;
        self.accumulator = 0.0;
        self.left_flipper = Flipper::new(
            FlipperSide::Left,
            self.tuning.flipper_extend_speed,
            self.tuning.flipper_return_speed,
        );
        self.right_flipper = Flipper::new(
            FlipperSide::Right,
            self.tuning.flipper_extend_speed,
            self.tuning.flipper_return_speed,
        );
        for obstacle in &mut self.obstacles {
            obstacle.just_hit = false;
            obstacle.flash = 0.0;
        }
        self.reset_to_shooter();

        self.events.push(TableEvent::Restarted);
        log::info!("Table restarted with {} balls", self.balls_remaining);
        true
    }

    // --- Frame update ---

    /// Advance the table by one rendered frame
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);

        self.events.drain(..self.reported_events);
        for obstacle in &mut self.obstacles {
            obstacle.just_hit = false;
        }

        // Plunger charge / launch on release
        if matches!(self.phase, TablePhase::Ready | TablePhase::Play) && self.in_shooter_lane {
            if self.plunger_held {
                self.plunger_charge = clamp(
                    self.plunger_charge + self.tuning.plunger_charge_rate * dt,
                    0.0,
                    self.tuning.plunger_max,
                );
            } else if self.plunger_charge > 0.0 {
                self.launch();
            }
        }

        // Tilt meter decay and lock countdown
        if self.tilt_meter > 0.0 {
            self.tilt_meter = (self.tilt_meter - self.tuning.tilt_decay * dt).max(0.0);
        }
        if self.tilt_lock > 0.0 {
            self.tilt_lock -= dt;
            if self.tilt_lock <= 0.0 {
                self.tilt_lock = 0.0;
                if self.phase == TablePhase::Tilt {
                    self.recover_from_tilt();
                }
            }
        }

        // Fixed-step physics
        if self.phase != TablePhase::GameOver {
            self.accumulator += dt.min(self.tuning.max_frame_dt);
            let fixed_dt = self.tuning.fixed_dt;
            let mut substeps = 0;
            while self.accumulator >= fixed_dt && substeps < self.tuning.max_substeps {
                self.step_physics(fixed_dt);
                self.accumulator -= fixed_dt;
                substeps += 1;
                if self.phase == TablePhase::GameOver {
                    self.accumulator = 0.0;
                    break;
                }
            }
        }

        for obstacle in &mut self.obstacles {
            obstacle.decay_flash(dt);
        }
        self.reported_events = self.events.len();
    }

    /// Advance physics by exactly `dt`
    ///
    /// Order: flippers, gravity, friction, speed cap, integrate, lane/walls,
    /// drain, bumpers, posts, left flipper, right flipper, bottom rail.
    pub fn step_physics(&mut self, dt: f32) {
        if self.phase == TablePhase::GameOver {
            return;
        }
        let t = &self.tuning;

        // Flippers first so their angular velocity is current for contacts
        self.left_flipper.update(dt);
        self.right_flipper.update(dt);

        let ball = &mut self.ball;
        ball.vel += Vec2::new(0.0, t.gravity_down) * dt;
        ball.vel *= 1.0 - clamp(t.friction * dt, 0.0, 1.0);
        ball.clamp_speed(t.max_speed);
        ball.pos += ball.vel * dt;

        if self.in_shooter_lane {
            let lane_x = clamp(
                ball.pos.x,
                SHOOTER_X - SHOOTER_X_SLACK,
                SHOOTER_X + SHOOTER_X_SLACK,
            );
            if lane_x != ball.pos.x {
                ball.pos.x = lane_x;
                ball.vel.x = 0.0;
            }
            ball.pos.y = clamp(ball.pos.y, SHOOTER_FLOOR, SHOOTER_CEILING);
            if ball.pos.y <= SHOOTER_FLOOR && ball.vel.y < 0.0 {
                // Resting on the plunger tip
                ball.vel.y = 0.0;
            }
        } else {
            if ball.pos.x < PLAY_X_LEFT {
                ball.pos.x = PLAY_X_LEFT;
                if ball.vel.x < 0.0 {
                    ball.vel.x = -ball.vel.x * t.restitution;
                }
            }
            if ball.pos.x > PLAY_X_RIGHT {
                ball.pos.x = PLAY_X_RIGHT;
                if ball.vel.x > 0.0 {
                    ball.vel.x = -ball.vel.x * t.restitution;
                }
            }
            if ball.pos.y > PLAY_Y_TOP {
                ball.pos.y = PLAY_Y_TOP;
                if ball.vel.y > 0.0 {
                    ball.vel.y = -ball.vel.y * t.restitution;
                }
            }
        }

        // Shooter lane top stop
        if self.in_shooter_lane && ball.pos.y >= SHOOTER_CEILING && ball.vel.y > 0.0 {
            ball.pos.y = SHOOTER_CEILING;
            ball.vel.y = -ball.vel.y * t.restitution;
        }

        if !self.in_shooter_lane && ball.pos.y < DRAIN_Y {
            self.drain();
            return;
        }

        // Bumpers take priority over posts
        for kind in [ObstacleKind::Bumper, ObstacleKind::Post] {
            for (index, obstacle) in self.obstacles.iter_mut().enumerate() {
                if obstacle.kind != kind {
                    continue;
                }
                if obstacle.collide(ball, t.restitution, t.contact_epsilon) {
                    obstacle.trigger_flash(t.bumper_flash);
                    let points = t.score_for(kind);
                    self.score += points;
                    self.events.push(TableEvent::ObstacleHit {
                        index,
                        kind,
                        points,
                    });
                    log::debug!("{:?} {} hit (+{})", kind, index, points);
                }
            }
        }

        for flipper in [&self.left_flipper, &self.right_flipper] {
            if flipper.collide_ball(
                ball,
                t.restitution,
                t.flipper_thickness_factor,
                t.flipper_base_kick,
                t.contact_epsilon,
            ) {
                let points = t.flipper_score;
                self.score += points;
                self.events.push(TableEvent::FlipperHit {
                    side: flipper.side,
                    points,
                });
            }
        }

        // Bottom safety rail: bleed energy so the ball cannot rattle forever
        if !self.in_shooter_lane && ball.pos.y < PLAY_Y_BOTTOM && ball.vel.y < 0.0 {
            ball.vel.y *= t.rail_damping;
        }

        // Kicks can exceed the cap; keep the speed bound for every step
        ball.clamp_speed(t.max_speed);
    }

    // --- Transitions ---

    fn launch(&mut self) {
        if !self.in_shooter_lane {
            return;
        }
        let power = clamp(self.plunger_charge, 0.0, self.tuning.plunger_max);
        self.ball.vel = Vec2::new(0.0, self.tuning.base_launch + power);
        self.in_shooter_lane = false;
        self.plunger_charge = 0.0;
        self.phase = TablePhase::Play;

        self.events.push(TableEvent::Launched { power });
        log::info!("Ball launched (power {:.1})", power);
    }

    fn enter_tilt(&mut self) {
        self.phase = TablePhase::Tilt;
        self.left_flipper.set_pressed(false);
        self.right_flipper.set_pressed(false);
        self.tilt_lock = self.tuning.tilt_lock;

        self.events.push(TableEvent::Tilted);
        log::info!("TILT! Flippers locked for {:.1}s", self.tilt_lock);
    }

    fn recover_from_tilt(&mut self) {
        self.phase = if self.in_shooter_lane {
            TablePhase::Ready
        } else {
            TablePhase::Play
        };
        self.events.push(TableEvent::TiltRecovered);
        log::info!("Tilt released, resuming in {:?}", self.phase);
    }

    fn drain(&mut self) {
        self.balls_remaining = self.balls_remaining.saturating_sub(1);
        self.events.push(TableEvent::Drained {
            balls_remaining: self.balls_remaining,
        });
        self.reset_to_shooter();

        if self.balls_remaining == 0 {
            self.phase = TablePhase::GameOver;
            self.events.push(TableEvent::GameOver { score: self.score });
            log::info!("Game over, final score {}", self.score);
        } else {
            self.phase = TablePhase::Ready;
            log::info!("Ball drained, {} left", self.balls_remaining);
        }
    }

    fn reset_to_shooter(&mut self) {
        self.ball = Ball::at_shooter();
        self.in_shooter_lane = true;
        self.plunger_charge = 0.0;
    }

    // --- Output ---

    /// Plunger charge as a fraction of full
    pub fn plunger_fraction(&self) -> f32 {
        fraction(self.plunger_charge, self.tuning.plunger_max)
    }

    /// Tilt meter as a fraction of the tilt limit
    pub fn tilt_fraction(&self) -> f32 {
        fraction(self.tilt_meter, self.tuning.tilt_limit)
    }

    /// Status line for the HUD
    pub fn message(&self) -> &'static str {
        self.phase.message()
    }

    /// Unsimulated time carried into the next frame
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Events raised by the last `update` and by input since then
    ///
    /// The next `update` drops whatever the previous one reported.
    pub fn events(&self) -> &[TableEvent] {
        &self.events
    }

    /// Take ownership of the pending events, leaving the list empty
    pub fn take_events(&mut self) -> Vec<TableEvent> {
        self.reported_events = 0;
        std::mem::take(&mut self.events)
    }
}

/// `value / full` in [0, 1], zero when `full` is not positive
fn fraction(value: f32, full: f32) -> f32 {
    if full > 0.0 {
        clamp(value / full, 0.0, 1.0)
    } else {
        0.0
    }
}
