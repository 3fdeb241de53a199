//! Game state and core simulation types
//!
//! Everything the frame update mutates lives in [`GameState`]; it is owned by
//! the host loop and touched only from [`super::tick`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::anim::FrameTimer;
use super::collision::Rect;
use super::projectile::FireControl;
use crate::offscreen;
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Begin,
    /// Active gameplay
    Playing,
    /// Gameplay frozen until pause is pressed again
    Paused,
    /// Grid cleared, waiting for continue
    NextWave,
    /// Final wave cleared
    Winner,
    /// Lives exhausted or the grid reached the barrier
    Defeat,
}

/// Horizontal march direction shared by the whole grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Right,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Ship lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShipState {
    /// Controllable and hittable
    #[default]
    Alive,
    /// Hit with lives to spare: explosion plays, then the ship reappears
    /// at its start position with its default look
    Respawning,
    /// Final hit: explosion plays, then the run is lost
    Dying,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub state: ShipState,
    /// Death-strip frame while exploding
    pub current_frame: usize,
    pub death_timer: FrameTimer,
}

impl Ship {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.ship_start_x, tuning.ship_start_y),
            size: Vec2::splat(tuning.ship_size),
            state: ShipState::Alive,
            current_frame: 0,
            death_timer: FrameTimer::default(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// True while the explosion plays (no input, no further hits)
    pub fn is_dying(&self) -> bool {
        self.state != ShipState::Alive
    }

    /// Start the explosion; `fatal` decides what happens when it ends
    pub fn start_explosion(&mut self, fatal: bool) {
        self.state = if fatal {
            ShipState::Dying
        } else {
            ShipState::Respawning
        };
        self.current_frame = 0;
        self.death_timer.restart();
    }

    /// Spawn point for player bolts: top edge, centred on the sprite
    pub fn muzzle(&self, bolt_width: f32) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0 - bolt_width / 2.0, self.pos.y)
    }
}

/// Enemy lifecycle; `Dead` is the tombstone the purge pass erases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyState {
    #[default]
    Alive,
    Dying,
    Dead,
}

/// One invader in the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub state: EnemyState,
    /// Index into the march cycle, or the death cycle once dying
    pub current_frame: usize,
    pub move_timer: FrameTimer,
    pub death_timer: FrameTimer,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            pos,
            size: Vec2::splat(size),
            state: EnemyState::Alive,
            current_frame: 0,
            move_timer: FrameTimer::default(),
            death_timer: FrameTimer::default(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn is_alive(&self) -> bool {
        self.state == EnemyState::Alive
    }

    pub fn is_dying(&self) -> bool {
        self.state == EnemyState::Dying
    }

    /// Switch to the explosion sequence
    pub fn kill(&mut self) {
        self.state = EnemyState::Dying;
        self.current_frame = 0;
        self.death_timer.restart();
    }

    /// Where this enemy's bolt appears (lower centre)
    pub fn gun(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }
}

/// A bolt fired by the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBolt {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Consumed by a hit; removed by the next purge
    pub spent: bool,
}

impl PlayerBolt {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Mark consumed and park off-screen
    pub fn spend(&mut self) {
        self.spent = true;
        self.pos = offscreen();
    }
}

/// The single enemy bolt slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBolt {
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
}

impl EnemyBolt {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: offscreen(),
            size: Vec2::new(tuning.bolt_width, tuning.bolt_height),
            active: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn activate(&mut self, pos: Vec2) {
        self.pos = pos;
        self.active = true;
    }

    /// Free the slot and park off-screen
    pub fn deactivate(&mut self) {
        self.active = false;
        self.pos = offscreen();
    }
}

/// Static horizontal line: enemies lose by touching it, the ship stays below it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrier {
    pub rect: Rect,
}

impl Barrier {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            rect: Rect::new(
                Vec2::new(0.0, tuning.barrier_y()),
                Vec2::new(tuning.window_width, 1.0),
            ),
        }
    }

    pub fn y(&self) -> f32 {
        self.rect.pos.y
    }
}

/// Things that happened during a frame, drained by the host for audio/UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerFired,
    EnemyFired,
    EnemyDestroyed { id: u32 },
    BoltsCollided,
    ShipHit { lives_left: u32 },
    ShipRespawned,
    WaveCleared { wave: u32 },
    Victory,
    Defeat,
}

/// Complete game state for one process
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Current wave (1-based)
    pub wave: u32,
    pub lives: u32,
    /// Grid march speed (px/s), grows per wave
    pub enemy_speed: f32,
    /// Enemy bolt fall speed (px/s), grows per wave
    pub enemy_bolt_speed: f32,
    pub direction: Direction,
    /// One-frame descent pulse set when the grid bounces
    pub move_down: bool,
    pub ship: Ship,
    /// Enemy grid by row; order within a row is spawn order
    pub enemies: Vec<Vec<Enemy>>,
    pub player_bolts: Vec<PlayerBolt>,
    pub enemy_bolt: EnemyBolt,
    pub barrier: Barrier,
    pub fire: FireControl,
    pub enemy_fire_timer: FrameTimer,
    /// Seconds of Play time since the process started
    pub elapsed: f32,
    /// Events emitted since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Begin,
            wave: 1,
            lives: tuning.starting_lives,
            enemy_speed: tuning.enemy_speed_for_wave(1),
            enemy_bolt_speed: tuning.enemy_bolt_speed_for_wave(1),
            direction: Direction::default(),
            move_down: false,
            ship: Ship::new(&tuning),
            enemies: Vec::new(),
            player_bolts: Vec::new(),
            enemy_bolt: EnemyBolt::new(&tuning),
            barrier: Barrier::new(&tuning),
            fire: FireControl::new(&tuning),
            enemy_fire_timer: FrameTimer::default(),
            elapsed: 0.0,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };
        state.spawn_grid();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the grid with a fresh formation
    pub fn spawn_grid(&mut self) {
        let t = &self.tuning;
        let (rows, columns) = (t.grid_rows, t.grid_columns);
        let (origin, spacing, size) = (
            Vec2::new(t.grid_origin_x, t.grid_origin_y),
            t.grid_spacing,
            t.enemy_size,
        );

        let mut grid = Vec::with_capacity(rows);
        for row in 0..rows {
            let mut line = Vec::with_capacity(columns);
            for col in 0..columns {
                let id = self.next_entity_id();
                let pos = origin + Vec2::new(col as f32 * spacing, row as f32 * spacing);
                line.push(Enemy::new(id, pos, size));
            }
            grid.push(line);
        }
        self.enemies = grid;
    }

    /// Fresh grid and barrier, recentred ship, no bolts in flight.
    /// Wave number and speeds are untouched.
    pub fn reset_wave(&mut self) {
        self.spawn_grid();
        self.barrier = Barrier::new(&self.tuning);
        self.ship = Ship::new(&self.tuning);
        self.player_bolts.clear();
        self.enemy_bolt.deactivate();
        self.direction = Direction::default();
        self.move_down = false;
    }

    /// Everything back to wave 1 (after Winner or Defeat)
    pub fn reset_run(&mut self) {
        self.reset_wave();
        self.lives = self.tuning.starting_lives;
        self.wave = 1;
        self.apply_wave_speeds();
    }

    /// Set grid and enemy bolt speeds for the current wave
    pub fn apply_wave_speeds(&mut self) {
        self.enemy_speed = self.tuning.enemy_speed_for_wave(self.wave);
        self.enemy_bolt_speed = self.tuning.enemy_bolt_speed_for_wave(self.wave);
    }

    /// Whether any row still holds an enemy (dying ones included)
    pub fn enemies_remaining(&self) -> bool {
        self.enemies.iter().any(|row| !row.is_empty())
    }

    /// Enemies in the grid, dying or not
    pub fn enemy_count(&self) -> usize {
        self.enemies.iter().map(Vec::len).sum()
    }

    /// Enemies that can still shoot and be shot
    pub fn alive_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().flatten().filter(|e| e.is_alive())
    }

    /// Player bolts not yet consumed
    pub fn live_bolt_count(&self) -> usize {
        self.player_bolts.iter().filter(|b| !b.spent).count()
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
