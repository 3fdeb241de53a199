//! Per-frame simulation step
//!
//! Applies this frame's commands to the phase machine, then runs one Play
//! frame if the game is live. Play frames always run the subsystems in the
//! same order so every hit is counted once.

use serde::{Deserialize, Serialize};

use super::anim::{self, OneShot};
use super::collision;
use super::movement::{self, GridOutcome, Steering};
use super::projectile;
use super::state::{GameEvent, GamePhase, GameState, Ship, ShipState};

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held directional keys
    pub steering: Steering,
    /// Fire button held
    pub fire: bool,
    /// Start/continue key pressed this frame
    pub confirm: bool,
    /// Pause key pressed this frame
    pub pause: bool,
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    apply_commands(state, input);

    if state.phase == GamePhase::Playing {
        play_frame(state, input, dt);
    }
}

/// Phase transitions driven by key presses; irrelevant keys are ignored
fn apply_commands(state: &mut GameState, input: &TickInput) {
    if input.confirm {
        match state.phase {
            GamePhase::Begin => {
                log::info!("Game started");
                state.phase = GamePhase::Playing;
            }
            GamePhase::NextWave => {
                log::info!("Wave {} begins", state.wave);
                state.reset_wave();
                state.phase = GamePhase::Playing;
            }
            GamePhase::Winner | GamePhase::Defeat => {
                log::info!("Run restarted");
                state.reset_run();
                state.phase = GamePhase::Playing;
            }
            GamePhase::Playing | GamePhase::Paused => {}
        }
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => state.phase = GamePhase::Paused,
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }
}

/// One frame of live gameplay
fn play_frame(state: &mut GameState, input: &TickInput, dt: f32) {
    state.elapsed += dt;

    if movement::march_enemies(state, dt) == GridOutcome::ReachedBarrier {
        log::info!("Invaders reached the barrier on wave {}", state.wave);
        enter_defeat(state);
        return;
    }

    collision::player_bolts_vs_enemies(state);
    anim::animate_enemy_deaths(state, dt);
    collision::purge(state);

    projectile::enemy_fire(state, dt);
    collision::enemy_bolt_vs_ship(state);
    collision::player_bolts_vs_enemy_bolt(state);
    if state.tuning.solid_barrier {
        collision::bolts_vs_barrier(state);
    }

    let explosion = anim::animate_ship_death(state, dt);

    projectile::player_fire(state, input.fire, dt);
    projectile::advance_player_bolts(state, dt);
    movement::move_ship(state, input.steering, dt);

    if explosion == Some(OneShot::Finished) {
        match state.ship.state {
            ShipState::Dying => {
                log::info!("Ship destroyed, no lives left");
                enter_defeat(state);
                return;
            }
            ShipState::Respawning => {
                state.ship = Ship::new(&state.tuning);
                state.emit(GameEvent::ShipRespawned);
            }
            ShipState::Alive => {}
        }
    }

    // A run already lost to the final explosion cannot clear the wave
    if state.ship.state != ShipState::Dying && !state.enemies_remaining() {
        wave_cleared(state);
    }
}

fn enter_defeat(state: &mut GameState) {
    state.phase = GamePhase::Defeat;
    state.emit(GameEvent::Defeat);
}

/// Grid emptied: either the run is won or the next wave gets faster
fn wave_cleared(state: &mut GameState) {
    let completed = state.wave;
    state.emit(GameEvent::WaveCleared { wave: completed });
    state.direction = Default::default();

    if completed >= state.tuning.winning_wave {
        log::info!("Final wave {} cleared, victory", completed);
        state.phase = GamePhase::Winner;
        state.emit(GameEvent::Victory);
        return;
    }

    state.wave += 1;
    state.apply_wave_speeds();
    log::info!(
        "Wave {} cleared, next enemy speed {} bolt speed {}",
        completed,
        state.enemy_speed,
        state.enemy_bolt_speed
    );
    state.phase = GamePhase::NextWave;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Direction, EnemyState, PlayerBolt};
    use crate::tuning::Tuning;
    use glam::Vec2;

    const FRAME: f32 = 1.0 / 60.0;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(
            &mut state,
            &TickInput {
                confirm: true,
                ..Default::default()
            },
            0.0,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    fn idle(state: &mut GameState, dt: f32) {
        tick(state, &TickInput::default(), dt);
    }

    fn press_confirm(state: &mut GameState) {
        tick(
            state,
            &TickInput {
                confirm: true,
                ..Default::default()
            },
            FRAME,
        );
    }

    fn clear_grid(state: &mut GameState) {
        for row in state.enemies.iter_mut() {
            row.clear();
        }
    }

    fn place_bolt(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state.player_bolts.push(PlayerBolt {
            id,
            pos,
            size: Vec2::new(8.0, 30.0),
            spent: false,
        });
        id
    }

    #[test]
    fn test_begin_waits_for_start() {
        let mut state = GameState::new(1);
        let grid: Vec<Vec2> = state.enemies.iter().flatten().map(|e| e.pos).collect();
        idle(&mut state, 1.0);
        assert_eq!(state.phase, GamePhase::Begin);
        // Nothing moves before the game starts
        let after: Vec<Vec2> = state.enemies.iter().flatten().map(|e| e.pos).collect();
        assert_eq!(grid, after);

        // Pause is meaningless on the title screen
        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
            FRAME,
        );
        assert_eq!(state.phase, GamePhase::Begin);
    }

    #[test]
    fn test_pause_toggle_freezes_everything() {
        let mut state = playing(1);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, FRAME);
        assert_eq!(state.phase, GamePhase::Paused);

        let grid: Vec<Vec2> = state.enemies.iter().flatten().map(|e| e.pos).collect();
        let elapsed = state.elapsed;
        idle(&mut state, 5.0);
        let after: Vec<Vec2> = state.enemies.iter().flatten().map(|e| e.pos).collect();
        assert_eq!(grid, after);
        assert_eq!(state.elapsed, elapsed);

        // Confirm does nothing while paused
        press_confirm(&mut state);
        assert_eq!(state.phase, GamePhase::Paused);

        tick(&mut state, &pause, FRAME);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_grid_bounces_off_right_wall() {
        let mut state = playing(2);
        assert_eq!(state.enemy_count(), 30);

        let mut frames = 0;
        loop {
            let before: Vec<f32> = state.enemies.iter().flatten().map(|e| e.pos.y).collect();
            idle(&mut state, FRAME);
            frames += 1;
            assert!(frames < 600, "grid never reached the wall");

            if state.direction == Direction::Left {
                for (enemy, y) in state.enemies.iter().flatten().zip(before) {
                    assert_eq!(enemy.pos.y, y + 20.0);
                }
                break;
            }
            for (enemy, y) in state.enemies.iter().flatten().zip(before) {
                assert_eq!(enemy.pos.y, y);
            }
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_bolt_hit_removes_enemy_after_explosion() {
        let mut state = playing(3);
        let target = state.enemies[1][4].clone();
        let bolt = place_bolt(&mut state, target.pos + Vec2::new(14.0, 3.0));

        idle(&mut state, 0.01);
        let enemy = state.enemies[1]
            .iter()
            .find(|e| e.id == target.id)
            .expect("enemy still in its row while exploding");
        assert_eq!(enemy.state, EnemyState::Dying);
        assert_eq!(enemy.current_frame, 0);
        assert!(state.player_bolts.iter().all(|b| b.id != bolt));
        assert!(state.drain_events().contains(&GameEvent::EnemyDestroyed { id: target.id }));

        for _ in 0..3 {
            idle(&mut state, 0.06);
            assert_eq!(state.enemies[1].len(), 10);
        }
        idle(&mut state, 0.06);
        assert_eq!(state.enemies[1].len(), 9);
        assert!(state.enemies[1].iter().all(|e| e.id != target.id));
        assert_eq!(state.enemies[0].len(), 10);
        assert_eq!(state.enemies[2].len(), 10);
    }

    #[test]
    fn test_last_life_leads_to_defeat_after_explosion() {
        let mut state = playing(4);
        state.lives = 1;
        let ship_pos = state.ship.pos;
        state.enemy_bolt.activate(ship_pos + Vec2::new(10.0, 5.0));

        idle(&mut state, 0.01);
        assert_eq!(state.lives, 0);
        assert_eq!(state.ship.state, ShipState::Dying);
        assert!(!state.enemy_bolt.active);

        for _ in 0..5 {
            idle(&mut state, 0.31);
            assert_eq!(state.phase, GamePhase::Playing);
        }
        idle(&mut state, 0.31);
        assert_eq!(state.phase, GamePhase::Defeat);
        assert!(state.drain_events().contains(&GameEvent::Defeat));
    }

    #[test]
    fn test_hit_with_lives_left_respawns() {
        let mut state = playing(5);
        state.ship.pos.x = 100.0;
        let ship_pos = state.ship.pos;
        state.enemy_bolt.activate(ship_pos + Vec2::new(10.0, 5.0));

        idle(&mut state, 0.01);
        assert_eq!(state.lives, 2);
        assert_eq!(state.ship.state, ShipState::Respawning);

        // Steering is ignored while exploding
        let left = TickInput {
            steering: Steering {
                left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &left, 0.31);
            assert_eq!(state.ship.pos, ship_pos);
        }
        idle(&mut state, 0.31);
        assert_eq!(state.ship.state, ShipState::Alive);
        assert_eq!(state.ship.pos, Vec2::new(400.0, 500.0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.drain_events().contains(&GameEvent::ShipRespawned));
    }

    #[test]
    fn test_wave_eleven_then_twelve_then_winner() {
        let mut state = playing(6);
        state.wave = 11;
        state.enemy_speed = 150.0;
        state.enemy_bolt_speed = 150.0;
        clear_grid(&mut state);

        idle(&mut state, FRAME);
        assert_eq!(state.phase, GamePhase::NextWave);
        assert_eq!(state.wave, 12);
        assert_eq!(state.enemy_speed, 160.0);
        assert_eq!(state.enemy_bolt_speed, 155.0);

        press_confirm(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.wave, 12);
        assert_eq!(state.enemy_count(), 30);
        assert_eq!(state.enemy_speed, 160.0);

        clear_grid(&mut state);
        idle(&mut state, FRAME);
        assert_eq!(state.phase, GamePhase::Winner);
        assert!(state.drain_events().contains(&GameEvent::Victory));

        press_confirm(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.wave, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.enemy_speed, 50.0);
        assert_eq!(state.enemy_bolt_speed, 100.0);
    }

    #[test]
    fn test_next_wave_recentres_and_clears_bolts() {
        let mut state = playing(7);
        state.ship.pos = Vec2::new(10.0, 550.0);
        state.direction = Direction::Left;
        place_bolt(&mut state, Vec2::new(700.0, 300.0));
        clear_grid(&mut state);

        idle(&mut state, FRAME);
        assert_eq!(state.phase, GamePhase::NextWave);
        assert_eq!(state.direction, Direction::Right);

        press_confirm(&mut state);
        assert!(state.player_bolts.is_empty());
        assert!(!state.enemy_bolt.active);
        assert_eq!(state.ship.pos, Vec2::new(400.0, 500.0));
    }

    #[test]
    fn test_bolt_collision_consumes_one_bolt_each() {
        let mut state = playing(8);
        state.enemy_bolt.activate(Vec2::new(300.0, 300.0));
        place_bolt(&mut state, Vec2::new(301.0, 310.0));
        let survivor = place_bolt(&mut state, Vec2::new(299.0, 305.0));

        idle(&mut state, 0.001);
        assert!(!state.enemy_bolt.active);
        assert_eq!(state.player_bolts.len(), 1);
        assert_eq!(state.player_bolts[0].id, survivor);

        let events = state.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == GameEvent::BoltsCollided)
                .count(),
            1
        );
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
        );
    }

    #[test]
    fn test_bolt_that_hits_enemy_cannot_also_hit_enemy_bolt() {
        let mut state = playing(9);
        let target = state.enemies[2][0].pos;
        place_bolt(&mut state, target + Vec2::new(4.0, 4.0));
        state.enemy_bolt.activate(target + Vec2::new(6.0, 10.0));

        idle(&mut state, 0.001);
        assert!(state.player_bolts.is_empty());
        // Enemy bolt survives: the only player bolt went into the enemy
        assert!(state.enemy_bolt.active);
        let events = state.drain_events();
        assert!(!events.contains(&GameEvent::BoltsCollided));
    }

    #[test]
    fn test_reaching_barrier_is_immediate_defeat() {
        let mut state = playing(10);
        for enemy in state.enemies[2].iter_mut() {
            // Bottom edge sits exactly on the barrier line
            enemy.pos.y = 428.0 - 36.0;
        }
        idle(&mut state, FRAME);
        assert_eq!(state.phase, GamePhase::Defeat);

        // Defeat restart also restores lives and the wave counter
        state.wave = 4;
        press_confirm(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.wave, 1);
        assert_eq!(state.ship.state, ShipState::Alive);
    }

    #[test]
    fn test_defeat_beats_wave_clear() {
        let mut state = playing(11);
        state.lives = 0;
        state.ship.start_explosion(true);
        clear_grid(&mut state);

        idle(&mut state, FRAME);
        assert_eq!(state.phase, GamePhase::Playing);
        for _ in 0..6 {
            idle(&mut state, 0.31);
        }
        assert_eq!(state.phase, GamePhase::Defeat);
    }

    #[test]
    fn test_solid_barrier_absorbs_fresh_bolts() {
        let tuning = Tuning {
            solid_barrier: true,
            ..Default::default()
        };
        let mut state = GameState::with_tuning(tuning, 12);
        press_confirm(&mut state);
        state.ship.pos.y = 428.0;

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, FRAME);
        assert_eq!(state.player_bolts.len(), 1);
        idle(&mut state, FRAME);
        assert!(state.player_bolts.is_empty());
    }

    #[test]
    fn test_enemy_fires_after_cooldown() {
        let mut state = playing(13);
        let mut fired_at = None;
        for _ in 0..(7 * 60) {
            idle(&mut state, FRAME);
            if state.drain_events().contains(&GameEvent::EnemyFired) {
                fired_at = Some(state.elapsed);
                break;
            }
        }
        let fired_at = fired_at.expect("enemy never fired");
        assert!(fired_at >= 6.0 - 1e-3);
        assert!(state.enemy_bolt.active);
    }

    #[test]
    fn test_motion_uses_wave_speeds() {
        let mut state = playing(14);
        state.enemy_speed = 150.0;
        state.enemy_bolt_speed = 200.0;
        state.enemy_bolt.activate(Vec2::new(300.0, 10.0));
        let x = state.enemies[0][0].pos.x;

        idle(&mut state, 0.1);

        assert!((state.enemies[0][0].pos.x - x - 15.0).abs() < 1e-3);
        assert!(state.enemy_bolt.active);
        assert!((state.enemy_bolt.pos.y - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_cleared_wave_marches_faster() {
        let mut state = playing(15);
        clear_grid(&mut state);
        idle(&mut state, FRAME);
        press_confirm(&mut state);
        assert_eq!(state.wave, 2);

        let x = state.enemies[0][0].pos.x;
        idle(&mut state, 0.5);
        // Wave 2 marches at 60 px/s
        assert!((state.enemies[0][0].pos.x - x - 30.0).abs() < 1e-3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashMap;

        fn input_strategy() -> impl Strategy<Value = (TickInput, f32)> {
            (
                any::<[bool; 5]>(),
                prop::bool::weighted(0.05),
                prop::bool::weighted(0.02),
                0.001f32..0.1f32,
            )
                .prop_map(|(keys, confirm, pause, dt)| {
                    let input = TickInput {
                        steering: Steering {
                            up: keys[0],
                            down: keys[1],
                            left: keys[2],
                            right: keys[3],
                        },
                        fire: keys[4],
                        confirm,
                        pause,
                    };
                    (input, dt)
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn invariants_hold_for_any_input(
                seed in any::<u64>(),
                frames in proptest::collection::vec(input_strategy(), 1..600),
            ) {
                let mut state = GameState::new(seed);
                let mut last_player_shot: Option<f32> = None;
                let mut last_enemy_shot: Option<f32> = None;
                let mut last_wave = state.wave;

                for (input, dt) in frames {
                    let phase_before = state.phase;
                    let enemy_step = state.enemy_speed * dt;
                    let bolt_step = state.enemy_bolt_speed * dt;
                    let grid_before: HashMap<u32, Vec2> =
                        state.enemies.iter().flatten().map(|e| (e.id, e.pos)).collect();
                    let bolt_before = state.enemy_bolt.active.then_some(state.enemy_bolt.pos);

                    tick(&mut state, &input, dt);

                    if phase_before == GamePhase::Playing && !input.pause {
                        let descent = state.tuning.descent_step;
                        for enemy in state.enemies.iter().flatten() {
                            if let Some(old) = grid_before.get(&enemy.id) {
                                let dy = enemy.pos.y - old.y;
                                prop_assert!((enemy.pos.x - old.x).abs() <= enemy_step + 1e-3);
                                prop_assert!(dy.abs() < 1e-3 || (dy - descent).abs() < 1e-3);
                            }
                        }
                        // A bolt still in flight moved exactly one step straight down
                        if let Some(old) = bolt_before {
                            if state.enemy_bolt.active && state.phase == GamePhase::Playing {
                                prop_assert!((state.enemy_bolt.pos.y - old.y - bolt_step).abs() < 1e-3);
                                prop_assert_eq!(state.enemy_bolt.pos.x, old.x);
                            }
                        }
                    }

                    prop_assert!(state.live_bolt_count() <= state.tuning.max_player_bolts);
                    prop_assert!(state.player_bolts.len() <= state.tuning.max_player_bolts);

                    for event in state.drain_events() {
                        match event {
                            GameEvent::PlayerFired => {
                                if let Some(t) = last_player_shot {
                                    prop_assert!(state.elapsed - t >= 0.5 - 1e-3);
                                }
                                last_player_shot = Some(state.elapsed);
                            }
                            GameEvent::EnemyFired => {
                                if let Some(t) = last_enemy_shot {
                                    prop_assert!(state.elapsed - t >= 6.0 - 1e-3);
                                }
                                last_enemy_shot = Some(state.elapsed);
                            }
                            _ => {}
                        }
                    }

                    if state.wave < last_wave {
                        prop_assert!(matches!(
                            phase_before,
                            GamePhase::Winner | GamePhase::Defeat
                        ));
                        prop_assert_eq!(state.wave, 1);
                    }
                    last_wave = state.wave;

                    let ship = state.ship.bounds();
                    prop_assert!(ship.left() >= 0.0 && ship.right() <= state.tuning.window_width);
                    prop_assert!(ship.top() >= state.barrier.y());
                    prop_assert!(ship.bottom() <= state.tuning.window_height);
                }
            }

            #[test]
            fn bolts_move_by_speed_times_dt(dt in 0.001f32..0.1f32) {
                let mut state = playing(1);
                let fire = TickInput { fire: true, ..Default::default() };
                tick(&mut state, &fire, 0.0);
                let before = state.player_bolts[0].pos;
                idle(&mut state, dt);
                if let Some(bolt) = state.player_bolts.first() {
                    prop_assert!((before.y - bolt.pos.y - 300.0 * dt).abs() < 1e-3);
                    prop_assert_eq!(before.x, bolt.pos.x);
                }
            }
        }
    }
}
