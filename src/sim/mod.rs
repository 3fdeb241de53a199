//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay render-free:
//! - Time only enters through the `dt` passed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (grid rows keep spawn order)
//! - No rendering, audio or platform dependencies

pub mod anim;
pub mod collision;
pub mod movement;
pub mod projectile;
pub mod state;
pub mod tick;

pub use anim::{FrameTimer, IntRect, SpriteFrames};
pub use collision::Rect;
pub use movement::{GridOutcome, Steering};
pub use projectile::FireControl;
pub use state::{
    Barrier, Direction, Enemy, EnemyBolt, EnemyState, GameEvent, GamePhase, GameState,
    PlayerBolt, Ship, ShipState,
};
pub use tick::{TickInput, tick};
