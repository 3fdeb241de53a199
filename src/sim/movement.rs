//! Ship steering and enemy grid marching

use serde::{Deserialize, Serialize};

use super::anim::{ENEMY_MOVE_FRAMES, next_looping};
use super::state::{Direction, GameState};

/// Directional keys held this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Steering {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Steering {
    /// Per-axis direction; diagonals are not normalized
    pub fn axis(&self) -> (f32, f32) {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        (x, y)
    }
}

/// Move the ship from held keys, then keep it inside the arena below the barrier
pub fn move_ship(state: &mut GameState, steering: Steering, dt: f32) {
    if !state.ship.is_dying() {
        let (dx, dy) = steering.axis();
        let step = state.tuning.ship_speed * dt;
        state.ship.pos.x += dx * step;
        state.ship.pos.y += dy * step;
    }
    clamp_ship(state);
}

/// Keep the ship's box within `[0, width]` and `[barrier, height]`
pub fn clamp_ship(state: &mut GameState) {
    let width = state.tuning.window_width;
    let height = state.tuning.window_height;
    let barrier_y = state.barrier.y();
    let ship = &mut state.ship;

    if ship.pos.x < 0.0 {
        ship.pos.x = 0.0;
    }
    if ship.pos.x + ship.size.x > width {
        ship.pos.x = width - ship.size.x;
    }
    if ship.pos.y < barrier_y {
        ship.pos.y = barrier_y;
    }
    if ship.pos.y + ship.size.y > height {
        ship.pos.y = height - ship.size.y;
    }
}

/// What the grid did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridOutcome {
    Marching,
    /// Bounced off a wall and stepped down
    Descended,
    /// An enemy touched the barrier line; the run is lost
    ReachedBarrier,
}

/// March every living enemy sideways in lock-step.
///
/// Any enemy crossing a side wall flips the shared direction and triggers a
/// single fixed-size descent for the whole grid. The descent is a per-bounce
/// nudge and is not scaled by `dt`.
pub fn march_enemies(state: &mut GameState, dt: f32) -> GridOutcome {
    let width = state.tuning.window_width;
    let barrier_y = state.barrier.y();
    let frame_time = state.tuning.enemy_move_frame_time;
    let direction = state.direction;
    let dx = direction.sign() * state.enemy_speed * dt;

    let mut change_direction = false;
    for enemy in state.enemies.iter_mut().flatten() {
        if !enemy.is_alive() {
            continue;
        }

        if enemy.move_timer.step(dt, frame_time) {
            enemy.current_frame = next_looping(enemy.current_frame, ENEMY_MOVE_FRAMES);
        }

        enemy.pos.x += dx;
        let bounds = enemy.bounds();
        match direction {
            Direction::Right if bounds.right() > width => change_direction = true,
            Direction::Left if bounds.left() < 0.0 => change_direction = true,
            _ => {}
        }

        if bounds.bottom() >= barrier_y {
            return GridOutcome::ReachedBarrier;
        }
    }

    if change_direction {
        state.direction = direction.flipped();
        state.move_down = true;
    }

    if !state.move_down {
        return GridOutcome::Marching;
    }

    let step = state.tuning.descent_step;
    for enemy in state.enemies.iter_mut().flatten().filter(|e| e.is_alive()) {
        enemy.pos.y += step;
    }
    state.move_down = false;
    GridOutcome::Descended
}
