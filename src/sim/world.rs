/// WorldState: the complete state of a running session.
///
/// ## Coordinates
///
/// Everything is in board pixels. `grid` converts pixels to rows; the
/// renderer projects pixels onto terminal cells.
///
/// ## Session flags
///
/// `phase` replaces a single on/off switch:
///   - `Running`: enemies move, input is accepted, the stage clock runs
///   - `Paused`: everything frozen, pause control resumes
///   - `Won` / `Lost`: terminal; the modal is shown until closed and the
///     pause control or the modal's restart begin a fresh session

use rand::Rng;

use crate::config::{GameConfig, RulesConfig};
use crate::domain::entity::{Enemy, Player, RateBounds};
use crate::domain::grid::Grid;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Running,
    Paused,
    Won,
    Lost,
}

pub struct WorldState {
    pub grid: Grid,
    pub rules: RulesConfig,

    // ── Entities ──
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Speed bounds shared by every enemy; raised on each stage clear.
    pub bounds: RateBounds,

    // ── Stage / session ──
    pub stage: u32,
    pub score: u32,
    /// Seconds spent running on the current stage.
    pub elapsed: f32,
    pub phase: Phase,
    pub modal_open: bool,

    // ── UI ──
    pub message: String,
    pub message_timer: u32,
}

impl WorldState {
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let grid = Grid::new(&config.grid);
        let rules = config.rules.clone();
        let bounds = RateBounds::new(rules.rate_low, rules.rate_high);
        let enemies = spawn_enemies(&grid, &rules, &bounds, rng);

        WorldState {
            player: Player::new(&grid, rules.lives),
            grid,
            enemies,
            bounds,
            stage: 1,
            score: 0,
            elapsed: 0.0,
            phase: Phase::Running,
            modal_open: false,
            message: String::new(),
            message_timer: 0,
            rules,
        }
    }

    /// No terminal event has happened yet.
    pub fn clean_state(&self) -> bool {
        matches!(self.phase, Phase::Running | Phase::Paused)
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Replace every enemy with a freshly spawned one.
    pub fn respawn_enemies(&mut self, rng: &mut impl Rng) {
        self.enemies = spawn_enemies(&self.grid, &self.rules, &self.bounds, rng);
    }

    pub fn set_message(&mut self, msg: &str, duration: u32) {
        self.message = msg.to_string();
        self.message_timer = duration;
    }

    /// Count down the message bar; called once per frame by the driver.
    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 { self.message.clear(); }
        }
    }
}

fn spawn_enemies(grid: &Grid, rules: &RulesConfig, bounds: &RateBounds, rng: &mut impl Rng) -> Vec<Enemy> {
    (0..rules.enemy_count)
        .map(|_| Enemy::spawn(grid, bounds, rules.spawn_offset_max, rng))
        .collect()
}
