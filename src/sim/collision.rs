//! Collision detection and response
//!
//! Everything is an axis-aligned box. The four passes run in a fixed order
//! each Play frame; later passes see the bolts earlier passes consumed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EnemyState, GameEvent, GameState};

/// Axis-aligned rectangle (top-left + size, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap: boxes that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        left < right && top < bottom
    }
}

/// Player bolts against living enemies.
///
/// A bolt is spent by the first enemy it overlaps; dying enemies are
/// ignored. Returns the number of enemies killed.
pub fn player_bolts_vs_enemies(state: &mut GameState) -> usize {
    let mut killed = Vec::new();

    for bolt in state.player_bolts.iter_mut() {
        for enemy in state.enemies.iter_mut().flatten() {
            if bolt.spent {
                break;
            }
            if enemy.is_alive() && bolt.bounds().intersects(&enemy.bounds()) {
                bolt.spend();
                enemy.kill();
                killed.push(enemy.id);
            }
        }
    }

    for &id in &killed {
        log::debug!("Enemy {} destroyed", id);
        state.emit(GameEvent::EnemyDestroyed { id });
    }
    killed.len()
}

/// Drop spent bolts, bolts past the top edge, and finished enemies.
/// Row order of the survivors is kept.
pub fn purge(state: &mut GameState) {
    state
        .player_bolts
        .retain(|bolt| !bolt.spent && bolt.bounds().bottom() >= 0.0);

    for row in state.enemies.iter_mut() {
        row.retain(|enemy| enemy.state != EnemyState::Dead);
    }
}

/// The enemy bolt against the ship. Returns true on a hit.
pub fn enemy_bolt_vs_ship(state: &mut GameState) -> bool {
    if !state.enemy_bolt.active || state.ship.is_dying() {
        return false;
    }
    if !state.enemy_bolt.bounds().intersects(&state.ship.bounds()) {
        return false;
    }

    state.lives = state.lives.saturating_sub(1);
    state.enemy_bolt.deactivate();
    state.ship.start_explosion(state.lives == 0);
    log::debug!("Ship hit, {} lives left", state.lives);
    state.emit(GameEvent::ShipHit {
        lives_left: state.lives,
    });
    true
}

/// The enemy bolt against player bolts. The first overlapping player bolt
/// (in firing order) is removed along with the enemy bolt.
pub fn player_bolts_vs_enemy_bolt(state: &mut GameState) -> bool {
    if !state.enemy_bolt.active {
        return false;
    }

    let enemy_bounds = state.enemy_bolt.bounds();
    let Some(index) = state
        .player_bolts
        .iter()
        .position(|bolt| !bolt.spent && bolt.bounds().intersects(&enemy_bounds))
    else {
        return false;
    };

    state.player_bolts.remove(index);
    state.enemy_bolt.deactivate();
    state.emit(GameEvent::BoltsCollided);
    true
}

/// Bolts that touch the barrier are absorbed; the barrier never changes.
///
/// Only runs when `Tuning::solid_barrier` is set. The ship is clamped below
/// the line, so with this pass live every player bolt dies as it spawns and
/// no enemy bolt ever reaches the ship.
pub fn bolts_vs_barrier(state: &mut GameState) {
    let barrier = state.barrier.rect;

    state
        .player_bolts
        .retain(|bolt| !bolt.bounds().intersects(&barrier));

    if state.enemy_bolt.active && state.enemy_bolt.bounds().intersects(&barrier) {
        state.enemy_bolt.deactivate();
    }
}
