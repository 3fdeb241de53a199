//! Draw list for an external renderer
//!
//! The core never talks to a window. Each frame the host asks for a list of
//! [`DrawCommand`]s in back-to-front order, clears, draws them and presents.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{EnemyState, GamePhase, GameState, IntRect, Rect, SpriteFrames};

/// RGBA colour, 0.0 - 1.0 per channel
pub type Color = [f32; 4];

pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const YELLOW: Color = [1.0, 1.0, 0.0, 1.0];
pub const BLUE: Color = [0.0, 0.0, 1.0, 1.0];
pub const RED: Color = [1.0, 0.0, 0.0, 1.0];

/// HUD text size in points
const HUD_SIZE: u32 = 20;
/// Banner text size in points
const BANNER_SIZE: u32 = 50;

/// Sprite sheets the host must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Texture {
    /// March cycle plus explosion frames
    Enemy,
    /// Intact ship
    Ship,
    /// Ship explosion strip
    ShipDeath,
}

/// Font the host should use for a text command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Font {
    Hud,
    Banner,
}

/// One thing to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Text {
        text: String,
        font: Font,
        size: u32,
        pos: Vec2,
        color: Color,
    },
    Rect {
        rect: Rect,
        color: Color,
    },
    Sprite {
        texture: Texture,
        region: IntRect,
        pos: Vec2,
    },
}

/// Frame tables, sliced once per host
#[derive(Debug, Clone)]
pub struct SpriteSheets {
    pub enemy_movement: SpriteFrames,
    pub enemy_death: SpriteFrames,
    pub ship_death: SpriteFrames,
}

impl Default for SpriteSheets {
    fn default() -> Self {
        Self {
            enemy_movement: SpriteFrames::enemy_movement(),
            enemy_death: SpriteFrames::enemy_death(),
            ship_death: SpriteFrames::ship_death(),
        }
    }
}

fn text(
    text: impl Into<String>,
    font: Font,
    size: u32,
    x: f32,
    y: f32,
    color: Color,
) -> DrawCommand {
    DrawCommand::Text {
        text: text.into(),
        font,
        size,
        pos: Vec2::new(x, y),
        color,
    }
}

/// Two-line banner shown between rounds
fn banner(title: (&str, f32), prompt: (&str, f32)) -> Vec<DrawCommand> {
    vec![
        text(title.0, Font::Banner, BANNER_SIZE, title.1, 200.0, WHITE),
        text(prompt.0, Font::Banner, BANNER_SIZE, prompt.1, 250.0, WHITE),
    ]
}

/// Build the draw list for the current phase with freshly sliced sheets
pub fn draw_list(state: &GameState) -> Vec<DrawCommand> {
    draw_list_with(state, &SpriteSheets::default())
}

/// Build the draw list for the current phase
pub fn draw_list_with(state: &GameState, sheets: &SpriteSheets) -> Vec<DrawCommand> {
    match state.phase {
        GamePhase::Begin => vec![text(
            "Press 'S' to Start",
            Font::Banner,
            BANNER_SIZE,
            200.0,
            250.0,
            WHITE,
        )],
        GamePhase::Playing => play_scene(state, sheets),
        GamePhase::Paused => banner(("Game Paused", 190.0), ("Press 'P' to Resume", 75.0)),
        GamePhase::NextWave => banner(("Wave Complete", 150.0), ("Press 'S' to Continue", 30.0)),
        GamePhase::Winner => banner(("You Won!", 260.0), ("Press 'S' to Restart", 50.0)),
        GamePhase::Defeat => banner(("You Lost!", 230.0), ("Press 'S' to Restart", 50.0)),
    }
}

/// HUD, barrier, enemies, player bolts, enemy bolt, ship
fn play_scene(state: &GameState, sheets: &SpriteSheets) -> Vec<DrawCommand> {
    let mut out = Vec::with_capacity(state.enemy_count() + state.player_bolts.len() + 5);

    out.push(text(
        format!("Wave: {}", state.wave),
        Font::Hud,
        HUD_SIZE,
        20.0,
        20.0,
        YELLOW,
    ));
    out.push(text(
        format!("Lives: {}", state.lives),
        Font::Hud,
        HUD_SIZE,
        700.0,
        20.0,
        YELLOW,
    ));

    out.push(DrawCommand::Rect {
        rect: state.barrier.rect,
        color: WHITE,
    });

    for enemy in state.enemies.iter().flatten() {
        // Tombstones awaiting purge
        if enemy.state == EnemyState::Dead {
            continue;
        }
        let frames = if enemy.is_dying() {
            &sheets.enemy_death
        } else {
            &sheets.enemy_movement
        };
        if let Some(region) = frames.get(enemy.current_frame) {
            out.push(DrawCommand::Sprite {
                texture: Texture::Enemy,
                region,
                pos: enemy.pos,
            });
        }
    }

    for bolt in state.player_bolts.iter().filter(|b| !b.spent) {
        out.push(DrawCommand::Rect {
            rect: bolt.bounds(),
            color: BLUE,
        });
    }

    if state.enemy_bolt.active {
        out.push(DrawCommand::Rect {
            rect: state.enemy_bolt.bounds(),
            color: RED,
        });
    }

    let ship = &state.ship;
    if !ship.is_dying() {
        out.push(DrawCommand::Sprite {
            texture: Texture::Ship,
            region: IntRect::new(0, 0, ship.size.x as i32, ship.size.y as i32),
            pos: ship.pos,
        });
    } else if let Some(region) = sheets.ship_death.get(ship.current_frame) {
        out.push(DrawCommand::Sprite {
            texture: Texture::ShipDeath,
            region,
            pos: ship.pos,
        });
    }

    out
}
