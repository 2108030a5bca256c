/// The lane grid: fixed rows × columns of fixed-size cells.
///
/// All simulation coordinates are in pixels. The grid is the only place
/// that knows how pixels relate to rows, so the renderer and the spawn
/// logic both ask it.

use crate::config::GridConfig;

/// Distance from a character frame's top edge to where its feet stand.
/// Used to decide which row a body visually occupies.
pub const SPRITE_BASELINE: f32 = 100.0;

/// Terrain of a whole row.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RowKind {
    Water, // goal row
    Stone, // enemy lanes
    Grass, // safe start rows
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    pub row_height: f32,
    pub col_width: f32,
}

impl Grid {
    pub fn new(cfg: &GridConfig) -> Self {
        Grid {
            rows: cfg.rows,
            cols: cfg.cols,
            row_height: cfg.row_height,
            col_width: cfg.col_width,
        }
    }

    /// Right edge of the board in pixels.
    pub fn x_end(&self) -> f32 {
        self.cols as f32 * self.col_width
    }

    /// Bottom edge of the board in pixels.
    pub fn y_end(&self) -> f32 {
        self.rows as f32 * self.row_height
    }

    /// Row 0 is water, the last two rows are grass, everything between is stone.
    pub fn row_kind(&self, row: usize) -> RowKind {
        if row == 0 {
            RowKind::Water
        } else if row + 2 < self.rows {
            RowKind::Stone
        } else {
            RowKind::Grass
        }
    }

    /// Number of rows an enemy may spawn on.
    pub fn enemy_lanes(&self) -> usize {
        self.rows.saturating_sub(3).max(1)
    }

    /// Row a body whose frame top is at `y` stands in.
    pub fn lane_of(&self, y: f32) -> usize {
        let row = ((y + SPRITE_BASELINE) / self.row_height).floor();
        if row <= 0.0 {
            0
        } else {
            (row as usize).min(self.rows - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classic() -> Grid {
        Grid { rows: 7, cols: 8, row_height: 83.0, col_width: 101.0 }
    }

    #[test]
    fn canvas_bounds() {
        let g = classic();
        assert_eq!(g.x_end(), 808.0);
        assert_eq!(g.y_end(), 581.0);
    }

    #[test]
    fn row_layout() {
        let g = classic();
        assert_eq!(g.row_kind(0), RowKind::Water);
        for row in 1..5 {
            assert_eq!(g.row_kind(row), RowKind::Stone, "row {row}");
        }
        assert_eq!(g.row_kind(5), RowKind::Grass);
        assert_eq!(g.row_kind(6), RowKind::Grass);
        assert_eq!(g.enemy_lanes(), 4);
    }

    #[test]
    fn enemy_rows_land_on_stone() {
        let g = classic();
        for k in 0..g.enemy_lanes() {
            let lane = g.lane_of(k as f32 * g.row_height);
            assert_eq!(g.row_kind(lane), RowKind::Stone, "spawn row {k}");
        }
    }

    #[test]
    fn player_home_is_bottom_grass() {
        let g = classic();
        // home y = y_end - frame height (171)
        assert_eq!(g.lane_of(g.y_end() - 171.0), 6);
    }

    #[test]
    fn lane_is_clamped() {
        let g = classic();
        assert_eq!(g.lane_of(-500.0), 0);
        assert_eq!(g.lane_of(10_000.0), 6);
    }
}
