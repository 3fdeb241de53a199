//! Sprite animation timing and frame tables
//!
//! Each animated entity owns a [`FrameTimer`] measuring time since its last
//! frame change. Frame tables are slices of a sprite sheet computed once.

use serde::{Deserialize, Serialize};

use super::state::{EnemyState, GameState};
use crate::offscreen;

/// Integer source rectangle on a sprite sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IntRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// An ordered sequence of sprite-sheet regions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFrames {
    frames: Vec<IntRect>,
}

impl SpriteFrames {
    /// Slice `count` cells of `width`×`height` from a sheet, starting at
    /// (`start_x`, `start_y`) and wrapping every `columns` cells
    pub fn from_sheet(
        width: i32,
        height: i32,
        start_x: i32,
        start_y: i32,
        count: usize,
        columns: usize,
    ) -> Self {
        let columns = columns.max(1);
        let frames = (0..count)
            .map(|i| {
                let x = start_x + (i % columns) as i32 * width;
                let y = start_y + (i / columns) as i32 * height;
                IntRect::new(x, y, width, height)
            })
            .collect();
        Self { frames }
    }

    /// Region for a frame index, `None` once past the end
    pub fn get(&self, index: usize) -> Option<IntRect> {
        self.frames.get(index).copied()
    }

    /// Enemy march cycle (2 frames, top row of the enemy sheet)
    pub fn enemy_movement() -> Self {
        Self::from_sheet(36, 36, 0, 0, ENEMY_MOVE_FRAMES, 2)
    }

    /// Enemy explosion (4 frames, below the march cycle)
    pub fn enemy_death() -> Self {
        Self::from_sheet(36, 36, 0, 36, ENEMY_DEATH_FRAMES, 2)
    }

    /// Ship explosion strip (6 frames in a single row)
    pub fn ship_death() -> Self {
        Self::from_sheet(44, 44, 0, 0, SHIP_DEATH_FRAMES, 6)
    }
}

/// Frame counts for each animation
pub const ENEMY_MOVE_FRAMES: usize = 2;
pub const ENEMY_DEATH_FRAMES: usize = 4;
pub const SHIP_DEATH_FRAMES: usize = 6;

/// Elapsed-time gate that restarts whenever it fires
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameTimer {
    elapsed: f32,
}

impl FrameTimer {
    /// Timer that starts with `elapsed` seconds already on it
    pub fn primed(elapsed: f32) -> Self {
        Self { elapsed }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    /// Advance, then fire (and restart) if strictly past `period`.
    /// Leftover time is dropped, so the next frame waits a full period.
    pub fn step(&mut self, dt: f32, period: f32) -> bool {
        self.advance(dt);
        if self.elapsed > period {
            self.restart();
            true
        } else {
            false
        }
    }
}

/// Advance a looping animation, returning the new frame index
#[inline]
pub fn next_looping(current: usize, frame_count: usize) -> usize {
    if frame_count == 0 {
        0
    } else {
        (current + 1) % frame_count
    }
}

/// Outcome of advancing a one-shot animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneShot {
    /// Still on screen (maybe a new frame)
    Playing,
    /// Stepped past the last frame
    Finished,
}

/// Advance a non-looping animation by one timer step
pub fn step_one_shot(
    timer: &mut FrameTimer,
    frame: &mut usize,
    dt: f32,
    period: f32,
    frame_count: usize,
) -> OneShot {
    if timer.step(dt, period) {
        *frame += 1;
    }
    if *frame >= frame_count {
        OneShot::Finished
    } else {
        OneShot::Playing
    }
}

/// Step every dying enemy's explosion; finished ones become tombstones
pub fn animate_enemy_deaths(state: &mut GameState, dt: f32) {
    let period = state.tuning.enemy_death_frame_time;
    for enemy in state.enemies.iter_mut().flatten() {
        if !enemy.is_dying() {
            continue;
        }
        let done = step_one_shot(
            &mut enemy.death_timer,
            &mut enemy.current_frame,
            dt,
            period,
            ENEMY_DEATH_FRAMES,
        );
        if done == OneShot::Finished {
            enemy.state = EnemyState::Dead;
            enemy.pos = offscreen();
        }
    }
}

/// Step the ship's explosion, if one is playing
pub fn animate_ship_death(state: &mut GameState, dt: f32) -> Option<OneShot> {
    let period = state.tuning.ship_death_frame_time;
    let ship = &mut state.ship;
    if !ship.is_dying() {
        return None;
    }
    Some(step_one_shot(
        &mut ship.death_timer,
        &mut ship.current_frame,
        dt,
        period,
        SHIP_DEATH_FRAMES,
    ))
}
