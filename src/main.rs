//! Alien Invaders entry point
//!
//! Headless native runner: loads configuration, lets the autopilot play on a
//! fixed 60 Hz clock and prints a JSON summary of the run.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use clap::Parser;
    use serde::Serialize;

    use alien_invaders::audio::{AudioManager, LogBackend};
    use alien_invaders::autopilot::Autopilot;
    use alien_invaders::consts::TARGET_FPS;
    use alien_invaders::render;
    use alien_invaders::sim::{GameEvent, GamePhase, GameState, tick};
    use alien_invaders::{Settings, Tuning};

    #[derive(Parser)]
    #[command(name = "alien-invaders")]
    #[command(about = "Run Alien Invaders headless with the demo autopilot")]
    struct Args {
        /// Gameplay tuning JSON
        #[arg(short, long)]
        tuning: Option<PathBuf>,

        /// Player settings JSON
        #[arg(short, long)]
        settings: Option<PathBuf>,

        /// RNG seed (overrides settings)
        #[arg(long)]
        seed: Option<u64>,

        /// Seconds of game time to simulate
        #[arg(long, default_value_t = 120.0)]
        seconds: f32,

        /// Also print the last frame's draw list
        #[arg(long)]
        draw: bool,
    }

    /// What happened during the run
    #[derive(Debug, Default, Serialize)]
    struct Summary {
        seed: u64,
        frames: u64,
        play_time: f32,
        shots: u32,
        enemy_shots: u32,
        enemies_destroyed: u32,
        bolts_collided: u32,
        ship_hits: u32,
        waves_cleared: u32,
        victories: u32,
        defeats: u32,
        final_wave: u32,
        final_lives: u32,
        final_phase: Option<GamePhase>,
    }

    impl Summary {
        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::PlayerFired => self.shots += 1,
                GameEvent::EnemyFired => self.enemy_shots += 1,
                GameEvent::EnemyDestroyed { .. } => self.enemies_destroyed += 1,
                GameEvent::BoltsCollided => self.bolts_collided += 1,
                GameEvent::ShipHit { .. } => self.ship_hits += 1,
                GameEvent::ShipRespawned => {}
                GameEvent::WaveCleared { .. } => self.waves_cleared += 1,
                GameEvent::Victory => self.victories += 1,
                GameEvent::Defeat => self.defeats += 1,
            }
        }
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run() {
        env_logger::init();
        let args = Args::parse();

        let settings = args
            .settings
            .as_deref()
            .map(Settings::load_or_default)
            .unwrap_or_default();

        let tuning = match args.tuning.as_deref().map(Tuning::load) {
            Some(Ok(tuning)) => tuning,
            Some(Err(err)) => {
                log::warn!("Using default tuning: {}", err);
                Tuning::default()
            }
            None => Tuning::default(),
        };

        let seed = args.seed.or(settings.seed).unwrap_or_else(clock_seed);
        log::info!("Alien Invaders (headless) starting, seed {}", seed);

        let mut state = GameState::with_tuning(tuning, seed);
        let mut pilot = Autopilot::new();
        let mut audio = AudioManager::new(LogBackend);
        audio.apply_settings(&settings);

        let dt = settings.clamp_dt(1.0 / TARGET_FPS as f32);
        let frames = (args.seconds.max(0.0) * TARGET_FPS as f32) as u64;
        let mut summary = Summary {
            seed,
            ..Default::default()
        };

        for _ in 0..frames {
            let input = pilot.input(&state);
            tick(&mut state, &input, dt);

            let events = state.drain_events();
            audio.play_events(&events);
            for event in &events {
                log::debug!("{:?}", event);
                summary.record(event);
            }
            summary.frames += 1;
        }

        summary.play_time = state.elapsed;
        summary.final_wave = state.wave;
        summary.final_lives = state.lives;
        summary.final_phase = Some(state.phase);
        log::info!(
            "Run finished: {} frames, {} enemies destroyed",
            summary.frames,
            summary.enemies_destroyed
        );

        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("Failed to encode summary: {}", err),
        }

        if args.draw {
            match serde_json::to_string_pretty(&render::draw_list(&state)) {
                Ok(json) => println!("{json}"),
                Err(err) => log::error!("Failed to encode draw list: {}", err),
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm
}
