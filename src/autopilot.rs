//! Demo-mode AI
//!
//! Produces the same [`TickInput`] a player would, so attract mode and soak
//! runs go through the normal input path.

use std::cmp::Ordering;

use crate::sim::{Enemy, GamePhase, GameState, Steering, TickInput};

/// Horizontal slack before the ship bothers to move
const DEADZONE: f32 = 4.0;
/// How far above the ship an enemy bolt counts as incoming
const DANGER_RANGE: f32 = 160.0;
/// Extra width added either side of the ship when checking bolt overlap
const DODGE_MARGIN: f32 = 12.0;

/// AI that plays the game
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Fire key state last frame; toggled so every press is a fresh edge
    fire_held: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide this frame's input
    pub fn input(&mut self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        match state.phase {
            GamePhase::Begin | GamePhase::NextWave | GamePhase::Winner | GamePhase::Defeat => {
                input.confirm = true;
            }
            GamePhase::Paused => {
                input.pause = true;
            }
            GamePhase::Playing => {
                let (steering, aligned) = self.steer(state);
                input.steering = steering;
                self.fire_held = aligned && !self.fire_held;
                input.fire = self.fire_held;
            }
        }
        input
    }

    /// Steering for this frame, plus whether the ship is lined up to shoot
    fn steer(&self, state: &GameState) -> (Steering, bool) {
        let ship = &state.ship;
        let ship_center = ship.pos.x + ship.size.x / 2.0;
        let mut steering = Steering::default();

        if let Some(go_right) = dodge(state, ship_center) {
            steering.right = go_right;
            steering.left = !go_right;
            return (steering, false);
        }

        let Some(target) = pick_target(state, ship_center) else {
            return (steering, false);
        };

        // Lead the target by its march over the bolt's flight time
        let gap = (ship.pos.y - target.pos.y - target.size.y).max(0.0);
        let flight = gap / state.tuning.bolt_speed;
        let aim = target.pos.x
            + target.size.x / 2.0
            + state.direction.sign() * state.enemy_speed * flight;

        let dx = aim - ship_center;
        if dx > DEADZONE {
            steering.right = true;
        } else if dx < -DEADZONE {
            steering.left = true;
        }
        (steering, dx.abs() < target.size.x / 2.0)
    }
}

/// Lowest live enemy, ties broken by distance to the ship
fn pick_target(state: &GameState, ship_center: f32) -> Option<&Enemy> {
    state.alive_enemies().min_by(|a, b| {
        b.pos
            .y
            .partial_cmp(&a.pos.y)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                let da = (a.pos.x + a.size.x / 2.0 - ship_center).abs();
                let db = (b.pos.x + b.size.x / 2.0 - ship_center).abs();
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            })
    })
}

/// Which way to sidestep an incoming enemy bolt (`Some(true)` = right)
fn dodge(state: &GameState, ship_center: f32) -> Option<bool> {
    let bolt = &state.enemy_bolt;
    if !bolt.active {
        return None;
    }
    let ship = &state.ship;
    let bolt_rect = bolt.bounds();
    let incoming = bolt_rect.bottom() > ship.pos.y - DANGER_RANGE
        && bolt_rect.top() < ship.pos.y + ship.size.y;
    let overlaps = bolt_rect.right() > ship.pos.x - DODGE_MARGIN
        && bolt_rect.left() < ship.pos.x + ship.size.x + DODGE_MARGIN;
    if !(incoming && overlaps) {
        return None;
    }

    let bolt_center = bolt.pos.x + bolt.size.x / 2.0;
    let mut go_right = bolt_center <= ship_center;
    // Pinned against a wall: the only way out is back across
    if go_right && ship.pos.x + ship.size.x >= state.tuning.window_width {
        go_right = false;
    } else if !go_right && ship.pos.x <= 0.0 {
        go_right = true;
    }
    Some(go_right)
}
