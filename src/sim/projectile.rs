//! Bolt spawning, flight and expiry
//!
//! Player fire is rising-edge triggered, interval gated and capped.
//! The enemy shares a single bolt slot on a fixed cooldown.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::anim::FrameTimer;
use super::state::{GameEvent, GameState, PlayerBolt};
use crate::tuning::Tuning;

/// Fire-button edge detector plus the shot interval timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireControl {
    /// Fire button state on the previous frame
    was_pressed: bool,
    /// Time since the last shot
    timer: FrameTimer,
}

impl FireControl {
    /// Ready to fire immediately
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            was_pressed: false,
            timer: FrameTimer::primed(tuning.fire_interval),
        }
    }

    /// Record this frame's button state; true on a press edge
    fn edge(&mut self, pressed: bool) -> bool {
        let rising = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        rising
    }
}

/// Fire a player bolt if the button was just pressed and the gates allow it
pub fn player_fire(state: &mut GameState, fire_held: bool, dt: f32) -> bool {
    state.fire.timer.advance(dt);
    let rising = state.fire.edge(fire_held);

    if !rising || state.ship.is_dying() {
        return false;
    }
    if state.live_bolt_count() >= state.tuning.max_player_bolts {
        return false;
    }
    if state.fire.timer.elapsed() < state.tuning.fire_interval {
        return false;
    }

    let size = Vec2::new(state.tuning.bolt_width, state.tuning.bolt_height);
    let pos = state.ship.muzzle(size.x);
    let id = state.next_entity_id();
    state.player_bolts.push(PlayerBolt {
        id,
        pos,
        size,
        spent: false,
    });
    state.fire.timer.restart();
    state.emit(GameEvent::PlayerFired);
    true
}

/// Move every player bolt up
pub fn advance_player_bolts(state: &mut GameState, dt: f32) {
    let step = state.tuning.bolt_speed * dt;
    for bolt in state.player_bolts.iter_mut().filter(|b| !b.spent) {
        bolt.pos.y -= step;
    }
}

/// Spawn the enemy bolt when the slot is free and the cooldown has passed,
/// then move it down and retire it below the window
pub fn enemy_fire(state: &mut GameState, dt: f32) -> bool {
    state.enemy_fire_timer.advance(dt);

    let mut fired = false;
    if !state.enemy_bolt.active
        && state.enemy_fire_timer.elapsed() >= state.tuning.enemy_fire_cooldown
    {
        let guns: Vec<Vec2> = state.alive_enemies().map(|e| e.gun()).collect();
        if !guns.is_empty() {
            let pick = state.rng.random_range(0..guns.len());
            state.enemy_bolt.activate(guns[pick]);
            state.enemy_fire_timer.restart();
            state.emit(GameEvent::EnemyFired);
            log::debug!("Enemy fired from {:?}", guns[pick]);
            fired = true;
        }
    }

    if state.enemy_bolt.active {
        state.enemy_bolt.pos.y += state.enemy_bolt_speed * dt;
        if state.enemy_bolt.pos.y > state.tuning.window_height {
            state.enemy_bolt.deactivate();
        }
    }
    fired
}
