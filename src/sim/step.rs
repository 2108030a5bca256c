/// The step function and session transitions.
///
/// Frame processing order:
///   1. Move every enemy, respawning the ones past the right edge
///   2. Sweep enemies against the player once; the first hit kills, so
///      a frame costs at most one life
///   3. Advance the stage clock (the player only moves on input)
///
/// Player movement arrives separately through `handle_move`, one call per
/// key press. Reaching the goal line finishes the stage from there.

use rand::Rng;

use crate::domain::collision;
use crate::domain::entity::{MoveDir, StepOutcome};
use crate::domain::rules;
use super::event::GameEvent;
use super::world::{Phase, WorldState};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState, dt: f32, rng: &mut impl Rng) -> Vec<GameEvent> {
    if !world.is_running() { return vec![]; }

    let mut events = Vec::new();

    resolve_enemy_movement(world, dt, rng, &mut events);
    resolve_collisions(world, &mut events);
    if !world.is_running() { return events; }

    world.elapsed += dt;

    events
}

fn resolve_enemy_movement(world: &mut WorldState, dt: f32, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    let grid = &world.grid;
    let bounds = &world.bounds;
    for (index, enemy) in world.enemies.iter_mut().enumerate() {
        if enemy.advance(dt, grid, bounds, rng) {
            events.push(GameEvent::EnemyRespawned { index });
        }
    }
}

fn resolve_collisions(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    let hit = collision::first_hit(
        &world.player.body,
        world.enemies.iter().map(|e| &e.body),
        world.rules.collision_margin,
    );
    if let Some(index) = hit {
        let enemy = &world.enemies[index].body;
        log::debug!(
            "{} #{index} in row {} hit the player at ({}, {})",
            enemy.sprite.name(), world.grid.lane_of(enemy.y), world.player.body.x, world.player.body.y,
        );
        kill_player(world, events);
    }
}

/// Take a life and send the player home, or end the session when none
/// are left.
fn kill_player(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.player.lives == 0 {
        world.phase = Phase::Lost;
        world.modal_open = true;
        world.player.hide();
        events.push(GameEvent::GameOver { score: world.score });
        return;
    }

    world.player.lives -= 1;
    world.player.home(&world.grid);
    events.push(GameEvent::PlayerHit { lives_left: world.player.lives });
}

// ══════════════════════════════════════════════════════════════
// Input
// ══════════════════════════════════════════════════════════════

/// One half-cell step. Ignored unless the session is running.
pub fn handle_move(world: &mut WorldState, dir: MoveDir, rng: &mut impl Rng) -> Vec<GameEvent> {
    if !world.is_running() { return vec![]; }

    let mut events = vec![GameEvent::PlayerMoved];
    let outcome = world.player.step(dir, &world.grid, world.rules.goal_line);
    if outcome == StepOutcome::Reached {
        finish_stage(world, rng, &mut events);
    }
    events
}

// ══════════════════════════════════════════════════════════════
// Session transitions
// ══════════════════════════════════════════════════════════════

/// Score the stage, then either win or escalate into the next one.
pub fn finish_stage(world: &mut WorldState, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
    let stage = world.stage;
    let gained = rules::stage_score(stage, world.elapsed);
    world.score += gained;
    events.push(GameEvent::StageCleared { stage, gained });

    if rules::is_final_stage(stage, world.rules.max_stages) {
        world.phase = Phase::Won;
        world.modal_open = true;
        events.push(GameEvent::GameWon { score: world.score });
        return;
    }

    world.bounds.increase(rules::rate_increment(stage, world.rules.rate_step));
    world.stage += 1;
    reset(world, false, rng);
}

/// Partial reset starts the current stage over: new enemies, player home
/// with full lives, clock at zero. A full reset also restores the speed
/// bounds, score and stage, and dismisses the modal.
pub fn reset(world: &mut WorldState, full: bool, rng: &mut impl Rng) {
    if full {
        world.bounds.reset(world.rules.rate_low, world.rules.rate_high);
        world.score = 0;
        world.stage = 1;
        world.modal_open = false;
    }

    world.respawn_enemies(rng);
    world.player.lives = world.rules.lives;
    world.player.moves = 0;
    world.player.home(&world.grid);
    world.elapsed = 0.0;
    world.phase = Phase::Running;
}

/// The pause control. Toggles pause while the session is clean; after a
/// win or loss it starts a new session instead.
pub fn toggle_pause(world: &mut WorldState, rng: &mut impl Rng) -> Vec<GameEvent> {
    match world.phase {
        Phase::Running => {
            world.phase = Phase::Paused;
            vec![GameEvent::Paused]
        }
        Phase::Paused => {
            world.phase = Phase::Running;
            vec![GameEvent::Resumed]
        }
        Phase::Won | Phase::Lost => restart(world, rng),
    }
}

/// The modal's restart control.
pub fn restart(world: &mut WorldState, rng: &mut impl Rng) -> Vec<GameEvent> {
    reset(world, true, rng);
    vec![GameEvent::Restarted]
}

/// Dismiss the modal. The session stays over until restarted.
pub fn close_modal(world: &mut WorldState) {
    world.modal_open = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::RateBounds;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    /// World with every enemy parked far away and frozen.
    fn quiet_world(rng: &mut StdRng) -> WorldState {
        let mut w = WorldState::new(&GameConfig::default(), rng);
        park_enemies(&mut w);
        w
    }

    fn park_enemies(w: &mut WorldState) {
        for e in &mut w.enemies {
            e.body.x = -1000.0;
            e.body.y = 0.0;
            e.rate = 0.0;
        }
    }

    /// Put enemy 0 right on top of the player.
    fn ambush(w: &mut WorldState) {
        let (x, y) = (w.player.body.x, w.player.body.y);
        w.enemies[0].body.x = x;
        w.enemies[0].body.y = y;
    }

    fn walk_to_goal(w: &mut WorldState, rng: &mut StdRng) -> Vec<GameEvent> {
        let mut all = vec![];
        for _ in 0..11 {
            all.extend(handle_move(w, MoveDir::Up, rng));
        }
        all
    }

    // ── step ──

    #[test]
    fn enemies_move_while_running() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        w.enemies[0].body.x = 0.0;
        w.enemies[0].rate = 100.0;
        step(&mut w, 0.5, &mut r);
        assert_eq!(w.enemies[0].body.x, 50.0);
        assert_eq!(w.elapsed, 0.5);
    }

    #[test]
    fn nothing_moves_while_paused() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        w.enemies[0].body.x = 0.0;
        w.enemies[0].rate = 100.0;
        toggle_pause(&mut w, &mut r);
        assert!(step(&mut w, 1.0, &mut r).is_empty());
        assert_eq!(w.enemies[0].body.x, 0.0);
        assert_eq!(w.elapsed, 0.0);
    }

    #[test]
    fn enemy_past_right_edge_respawns() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        w.enemies[2].body.x = w.grid.x_end() - 1.0;
        w.enemies[2].rate = 100.0;
        let events = step(&mut w, 0.1, &mut r);
        assert!(events.contains(&GameEvent::EnemyRespawned { index: 2 }));
        assert!(w.enemies[2].body.x <= 0.0);
        assert!(w.enemies[2].rate >= 150.0);
    }

    #[test]
    fn collision_costs_a_life_and_sends_player_home() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        handle_move(&mut w, MoveDir::Left, &mut r);
        ambush(&mut w);
        let events = step(&mut w, 0.0, &mut r);
        assert_eq!(events, vec![GameEvent::PlayerHit { lives_left: 2 }]);
        assert_eq!(w.player.lives, 2);
        assert_eq!((w.player.body.x, w.player.body.y), (404.0, 410.0));
        assert_eq!(w.phase, Phase::Running);
    }

    #[test]
    fn only_one_death_per_frame() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        ambush(&mut w);
        let (x, y) = (w.player.body.x, w.player.body.y);
        w.enemies[1].body.x = x + 10.0;
        w.enemies[1].body.y = y;
        w.enemies[2].body.x = x - 10.0;
        w.enemies[2].body.y = y + 10.0;
        let events = step(&mut w, 0.0, &mut r);
        assert_eq!(events, vec![GameEvent::PlayerHit { lives_left: 2 }]);
        assert_eq!(w.player.lives, 2);

        // the pile-up sits on the home square: each frame costs one life
        let events = step(&mut w, 0.0, &mut r);
        assert_eq!(events, vec![GameEvent::PlayerHit { lives_left: 1 }]);
    }

    #[test]
    fn hit_with_no_lives_left_loses() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        for expected in [2, 1, 0] {
            ambush(&mut w);
            step(&mut w, 0.0, &mut r);
            assert_eq!(w.player.lives, expected);
        }
        ambush(&mut w);
        let events = step(&mut w, 0.0, &mut r);
        assert_eq!(events, vec![GameEvent::GameOver { score: 0 }]);
        assert_eq!(w.phase, Phase::Lost);
        assert!(w.modal_open);
        assert_eq!(w.player.body.y, -500.0);

        // frozen afterwards
        assert!(step(&mut w, 1.0, &mut r).is_empty());
        assert!(handle_move(&mut w, MoveDir::Up, &mut r).is_empty());
    }

    // ── input ──

    #[test]
    fn moves_ignored_unless_running() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        toggle_pause(&mut w, &mut r);
        assert!(handle_move(&mut w, MoveDir::Left, &mut r).is_empty());
        assert_eq!(w.player.body.x, 404.0);
        assert_eq!(w.player.moves, 0);
    }

    #[test]
    fn reaching_goal_advances_stage() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        w.elapsed = 1.5;
        let events = walk_to_goal(&mut w, &mut r);
        assert!(events.contains(&GameEvent::StageCleared { stage: 1, gained: 1 + 2 }));
        assert_eq!(w.stage, 2);
        assert_eq!(w.score, 3);
        assert_eq!(w.bounds, RateBounds::new(155.0, 205.0));
        assert_eq!(w.elapsed, 0.0);
        assert_eq!(w.player.moves, 0);
        assert_eq!(w.player.body.y, 410.0);
        assert_eq!(w.phase, Phase::Running);
        assert_eq!(w.enemies.len(), 6);
    }

    #[test]
    fn stage_clear_restores_lives() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        ambush(&mut w);
        step(&mut w, 0.0, &mut r);
        assert_eq!(w.player.lives, 2);
        park_enemies(&mut w);
        walk_to_goal(&mut w, &mut r);
        assert_eq!(w.player.lives, 3);
    }

    #[test]
    fn clearing_final_stage_wins() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        for _ in 1..5 {
            walk_to_goal(&mut w, &mut r);
            park_enemies(&mut w);
        }
        assert_eq!(w.stage, 5);
        // 5 + 10 + 15 + 20
        assert_eq!(w.bounds, RateBounds::new(200.0, 250.0));

        let events = walk_to_goal(&mut w, &mut r);
        assert_eq!(w.phase, Phase::Won);
        assert!(w.modal_open);
        assert_eq!(w.stage, 5);
        // every stage cleared instantly: stage + 3 * stage
        assert_eq!(w.score, (1..=5).map(|s| 4 * s).sum::<u32>());
        assert!(events.contains(&GameEvent::GameWon { score: 60 }));
    }

    // ── pause / modal / restart ──

    #[test]
    fn pause_toggles_in_clean_state() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        assert_eq!(toggle_pause(&mut w, &mut r), vec![GameEvent::Paused]);
        assert_eq!(w.phase, Phase::Paused);
        assert_eq!(toggle_pause(&mut w, &mut r), vec![GameEvent::Resumed]);
        assert_eq!(w.phase, Phase::Running);
    }

    #[test]
    fn pause_after_loss_starts_over() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        w.score = 17;
        w.stage = 3;
        w.bounds.increase(15.0);
        w.phase = Phase::Lost;
        w.modal_open = true;
        close_modal(&mut w);
        assert!(!w.modal_open);
        assert_eq!(w.phase, Phase::Lost);

        assert_eq!(toggle_pause(&mut w, &mut r), vec![GameEvent::Restarted]);
        assert_eq!(w.phase, Phase::Running);
        assert_eq!(w.score, 0);
        assert_eq!(w.stage, 1);
        assert_eq!(w.bounds, RateBounds::new(150.0, 200.0));
    }

    #[test]
    fn restart_from_modal() {
        let mut r = rng();
        let mut w = quiet_world(&mut r);
        w.phase = Phase::Won;
        w.modal_open = true;
        w.score = 60;
        assert_eq!(restart(&mut w, &mut r), vec![GameEvent::Restarted]);
        assert!(!w.modal_open);
        assert_eq!(w.score, 0);
        assert_eq!(w.player.lives, 3);
        assert!(w.clean_state());
    }
}
