/// Entities: a shared positioned-sprite `Body`, the `Enemy` bugs and the
/// single `Player`. Movement rules live here; who-hits-whom lives in
/// `collision`, session transitions in `sim::step`.

use rand::Rng;

use super::grid::Grid;
use super::sprite::SpriteKey;

/// Movement direction (one half-cell step per key press)
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

/// Position and extent of anything drawn on the board.
/// Width/height come from the sprite frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub sprite: SpriteKey,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Body {
    pub fn new(sprite: SpriteKey, x: f32, y: f32) -> Self {
        let (width, height) = sprite.frame();
        Body { sprite, x, y, width, height }
    }
}

/// Shared `[low, high)` bounds every enemy draws its speed from (px/s).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateBounds {
    pub low: f32,
    pub high: f32,
}

impl RateBounds {
    pub fn new(low: f32, high: f32) -> Self {
        RateBounds { low, high }
    }

    /// Uniform draw in `[low, high)`, truncated to whole px/s.
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.high <= self.low {
            return self.low.trunc();
        }
        (self.low + rng.gen::<f32>() * (self.high - self.low)).trunc()
    }

    pub fn increase(&mut self, by: f32) {
        self.low += by;
        self.high += by;
    }

    pub fn reset(&mut self, low: f32, high: f32) {
        self.low = low;
        self.high = high;
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: Body,
    pub rate: f32,
    spawn_offset_max: f32,
}

impl Enemy {
    /// A fresh bug just left of the board on a random lane.
    pub fn spawn(grid: &Grid, bounds: &RateBounds, spawn_offset_max: f32, rng: &mut impl Rng) -> Self {
        let mut enemy = Enemy {
            body: Body::new(SpriteKey::EnemyBug, 0.0, 0.0),
            rate: 0.0,
            spawn_offset_max,
        };
        enemy.respawn(grid, bounds, rng);
        enemy
    }

    /// Back to off-screen-left with a new lane and a new speed.
    pub fn respawn(&mut self, grid: &Grid, bounds: &RateBounds, rng: &mut impl Rng) {
        self.body.x = -rng.gen::<f32>() * self.spawn_offset_max;
        let lane = rng.gen_range(0..grid.enemy_lanes());
        self.body.y = lane as f32 * grid.row_height;
        self.rate = bounds.sample(rng);
    }

    /// Move right by `rate * dt`. Returns true if the bug left the board
    /// and was respawned.
    pub fn advance(&mut self, dt: f32, grid: &Grid, bounds: &RateBounds, rng: &mut impl Rng) -> bool {
        self.body.x += self.rate * dt;
        if self.body.x > grid.x_end() {
            self.respawn(grid, bounds, rng);
            return true;
        }
        false
    }
}

/// Outcome of a player step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepOutcome {
    Moved,
    Reached, // crossed the goal line
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub lives: u32,
    pub moves: u32,
}

impl Player {
    pub fn new(grid: &Grid, lives: u32) -> Self {
        let mut player = Player {
            body: Body::new(SpriteKey::CharBoy, 0.0, 0.0),
            lives,
            moves: 0,
        };
        player.home(grid);
        player
    }

    /// Bottom-center start position.
    pub fn home(&mut self, grid: &Grid) {
        self.body.x = grid.x_end() / 2.0;
        self.body.y = grid.y_end() - self.body.height;
    }

    /// Park the sprite far above the board (after game over).
    pub fn hide(&mut self) {
        self.body.y = -500.0;
    }

    /// Move half a cell in `dir`, clamped to the board. Moving up past
    /// `goal_line` is not clamped: that is the stage-finish condition.
    pub fn step(&mut self, dir: MoveDir, grid: &Grid, goal_line: f32) -> StepOutcome {
        let b = &mut self.body;
        match dir {
            MoveDir::Left  => b.x -= grid.col_width / 2.0,
            MoveDir::Right => b.x += grid.col_width / 2.0,
            MoveDir::Up    => b.y -= grid.row_height / 2.0,
            MoveDir::Down  => b.y += grid.row_height / 2.0,
        }
        self.moves += 1;

        let max_x = (grid.x_end() - b.width).max(0.0);
        b.x = b.x.clamp(0.0, max_x);

        if b.y <= goal_line {
            return StepOutcome::Reached;
        }
        let max_y = grid.y_end() - b.height;
        if b.y > max_y {
            b.y = max_y;
        }
        StepOutcome::Moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn classic() -> Grid {
        Grid { rows: 7, cols: 8, row_height: 83.0, col_width: 101.0 }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn body_takes_sprite_frame() {
        let b = Body::new(SpriteKey::CharBoy, 3.0, 4.0);
        assert_eq!((b.width, b.height), (101.0, 171.0));
        assert_eq!((b.x, b.y), (3.0, 4.0));
    }

    #[test]
    fn rate_sample_stays_in_bounds() {
        let bounds = RateBounds::new(150.0, 200.0);
        let mut r = rng();
        for _ in 0..500 {
            let s = bounds.sample(&mut r);
            assert!(s >= 150.0 && s < 200.0, "{s}");
            assert_eq!(s, s.trunc());
        }
    }

    #[test]
    fn rate_sample_degenerate_bounds() {
        let bounds = RateBounds::new(180.0, 180.0);
        assert_eq!(bounds.sample(&mut rng()), 180.0);
    }

    #[test]
    fn rate_bounds_increase_and_reset() {
        let mut bounds = RateBounds::new(150.0, 200.0);
        bounds.increase(10.0);
        assert_eq!(bounds, RateBounds::new(160.0, 210.0));
        bounds.reset(150.0, 200.0);
        assert_eq!(bounds, RateBounds::new(150.0, 200.0));
    }

    #[test]
    fn enemy_spawns_left_of_board_on_a_lane() {
        let g = classic();
        let bounds = RateBounds::new(150.0, 200.0);
        let mut r = rng();
        for _ in 0..200 {
            let e = Enemy::spawn(&g, &bounds, 100.0, &mut r);
            assert!(e.body.x <= 0.0 && e.body.x > -100.0, "x = {}", e.body.x);
            let lane = e.body.y / g.row_height;
            assert_eq!(lane, lane.trunc());
            assert!(lane >= 0.0 && lane < g.enemy_lanes() as f32);
            assert!(e.rate >= 150.0 && e.rate < 200.0);
        }
    }

    #[test]
    fn enemy_advances_by_rate_times_dt() {
        let g = classic();
        let bounds = RateBounds::new(150.0, 200.0);
        let mut r = rng();
        let mut e = Enemy::spawn(&g, &bounds, 100.0, &mut r);
        e.body.x = 10.0;
        e.rate = 160.0;
        assert!(!e.advance(0.5, &g, &bounds, &mut r));
        assert_eq!(e.body.x, 90.0);
    }

    #[test]
    fn enemy_respawns_after_right_edge_with_new_speed_from_bounds() {
        let g = classic();
        let mut bounds = RateBounds::new(150.0, 200.0);
        let mut r = rng();
        let mut e = Enemy::spawn(&g, &bounds, 100.0, &mut r);
        bounds.increase(1000.0);
        e.body.x = g.x_end() - 1.0;
        e.rate = 100.0;
        // exactly at the edge is still on the board
        assert!(!e.advance(0.01, &g, &bounds, &mut r));
        assert!(e.advance(0.1, &g, &bounds, &mut r));
        assert!(e.body.x <= 0.0);
        assert!(e.rate >= 1150.0 && e.rate < 1200.0);
    }

    #[test]
    fn player_starts_bottom_center() {
        let g = classic();
        let p = Player::new(&g, 3);
        assert_eq!(p.body.x, 404.0);
        assert_eq!(p.body.y, 410.0);
        assert_eq!(p.lives, 3);
        assert_eq!(p.moves, 0);
    }

    #[test]
    fn player_moves_half_a_cell() {
        let g = classic();
        let mut p = Player::new(&g, 3);
        assert_eq!(p.step(MoveDir::Left, &g, -10.0), StepOutcome::Moved);
        assert_eq!(p.body.x, 404.0 - 50.5);
        p.step(MoveDir::Up, &g, -10.0);
        assert_eq!(p.body.y, 410.0 - 41.5);
        p.step(MoveDir::Down, &g, -10.0);
        assert_eq!(p.body.y, 410.0);
        assert_eq!(p.moves, 3);
    }

    #[test]
    fn player_is_clamped_to_board() {
        let g = classic();
        let mut p = Player::new(&g, 3);
        for _ in 0..20 { p.step(MoveDir::Left, &g, -10.0); }
        assert_eq!(p.body.x, 0.0);
        for _ in 0..20 { p.step(MoveDir::Right, &g, -10.0); }
        assert_eq!(p.body.x, 808.0 - 101.0);
        for _ in 0..5 { p.step(MoveDir::Down, &g, -10.0); }
        assert_eq!(p.body.y, 410.0);
    }

    #[test]
    fn player_reaches_goal_after_eleven_ups() {
        let g = classic();
        let mut p = Player::new(&g, 3);
        for i in 0..10 {
            assert_eq!(p.step(MoveDir::Up, &g, -10.0), StepOutcome::Moved, "step {i}");
        }
        // y = 410 - 10 * 41.5 = -5, still above the goal line
        assert_eq!(p.body.y, -5.0);
        assert_eq!(p.step(MoveDir::Up, &g, -10.0), StepOutcome::Reached);
    }
}
