/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` (clear, row backgrounds, enemy
///      sprites, player sprite, HUD, overlays)
///   2. Compare each cell with `back` (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The board is drawn in pixel space projected onto terminal cells: one
/// grid cell is `CELL_COLS` × `CELL_ROWS` terminal cells.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::Body;
use crate::domain::grid::{Grid, RowKind, SPRITE_BASELINE};
use crate::domain::rules;
use crate::domain::sprite::{SpriteKey, GLYPH_W};
use crate::sim::world::{Phase, WorldState};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer so every cell repaints.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Layout ──

/// Terminal cells per grid cell.
const CELL_COLS: usize = GLYPH_W;
const CELL_ROWS: usize = 3;

const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 2;
const BOARD_COL: usize = 1;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };
const MODAL_BG: Color = Color::Rgb { r: 40, g: 40, b: 40 };

/// Project a pixel position onto board-relative terminal (col, row).
/// The row is where the top glyph line of a character sprite goes.
pub fn project(grid: &Grid, x: f32, y: f32) -> (i32, i32) {
    let col = (x * CELL_COLS as f32 / grid.col_width).floor() as i32;
    let row = ((y + SPRITE_BASELINE) * CELL_ROWS as f32 / grid.row_height).floor() as i32;
    (col, row)
}

fn hud_line(w: &WorldState, pad_connected: bool) -> String {
    let mut hud = format!(
        " Stage 1-{}  Score:{:<5}  Time {}  ♥×{}  Moves:{} ",
        w.stage, w.score, rules::format_clock(w.elapsed), w.player.lives, w.player.moves,
    );
    if pad_connected {
        hud.push_str(" [PAD] ");
    }
    hud
}

fn board_size(grid: &Grid) -> (usize, usize) {
    (grid.cols * CELL_COLS, grid.rows * CELL_ROWS)
}

fn row_colors(kind: RowKind) -> (Color, Color) {
    match kind {
        RowKind::Water => (Color::Rgb { r: 150, g: 200, b: 255 }, Color::Rgb { r: 30, g: 80, b: 190 }),
        RowKind::Stone => (Color::Rgb { r: 90, g: 90, b: 90 }, Color::Rgb { r: 120, g: 120, b: 120 }),
        RowKind::Grass => (Color::Rgb { r: 200, g: 240, b: 120 }, Color::Rgb { r: 50, g: 140, b: 50 }),
    }
}

fn row_sprite(kind: RowKind) -> SpriteKey {
    match kind {
        RowKind::Water => SpriteKey::Water,
        RowKind::Stone => SpriteKey::Stone,
        RowKind::Grass => SpriteKey::Grass,
    }
}

fn sprite_color(key: SpriteKey) -> Color {
    match key {
        SpriteKey::EnemyBug => Color::Rgb { r: 220, g: 30, b: 30 },
        SpriteKey::CharBoy => Color::Rgb { r: 255, g: 230, b: 80 },
        _ => Color::White,
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, world: &WorldState, pad_connected: bool) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Overlays come and go with the phase; repaint everything then.
        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        self.compose_hud(world, pad_connected);
        self.compose_rows(&world.grid);
        for enemy in &world.enemies {
            self.compose_sprite(&world.grid, &enemy.body);
        }
        self.compose_sprite(&world.grid, &world.player.body);
        self.compose_footer(world);

        if world.phase == Phase::Paused {
            self.compose_pause_overlay(world);
        }
        if world.modal_open {
            self.compose_modal(world);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }

                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, w: &WorldState, pad_connected: bool) {
        let hud = hud_line(w, pad_connected);
        self.front.fill_row(HUD_ROW, HUD_BG);
        self.front.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
    }

    /// Row backgrounds: every grid row painted with its terrain color and
    /// the terrain glyph repeated on its middle line.
    fn compose_rows(&mut self, grid: &Grid) {
        let (board_w, board_h) = board_size(grid);
        for ty in 0..board_h {
            let kind = grid.row_kind(ty / CELL_ROWS);
            let (fg, bg) = row_colors(kind);
            let pattern: Vec<char> = row_sprite(kind).glyphs()[0].chars().collect();
            let textured = ty % CELL_ROWS == CELL_ROWS / 2;
            for tx in 0..board_w {
                let ch = if textured { pattern[tx % pattern.len()] } else { ' ' };
                self.front.set(BOARD_COL + tx, BOARD_ROW + ty, Cell::new(ch, fg, bg));
            }
        }
    }

    /// Draw a character sprite, clipped to the board. Spaces in the art
    /// are transparent.
    fn compose_sprite(&mut self, grid: &Grid, body: &Body) {
        let (board_w, board_h) = board_size(grid);
        let (col, row) = project(grid, body.x, body.y);
        let fg = sprite_color(body.sprite);

        for (dy, line) in body.sprite.glyphs().iter().enumerate() {
            let ty = row + dy as i32;
            if ty < 0 || ty >= board_h as i32 { continue; }
            for (dx, ch) in line.chars().enumerate() {
                let tx = col + dx as i32;
                if ch == ' ' || tx < 0 || tx >= board_w as i32 { continue; }
                let (x, y) = (BOARD_COL + tx as usize, BOARD_ROW + ty as usize);
                let bg = self.front.get(x, y).bg;
                self.front.set(x, y, Cell::new(ch, fg, bg));
            }
        }
    }

    fn compose_footer(&mut self, w: &WorldState) {
        let (_, board_h) = board_size(&w.grid);
        let msg_row = BOARD_ROW + board_h + 1;
        if !w.message.is_empty() {
            let bar = Color::Rgb { r: 200, g: 180, b: 50 };
            self.front.fill_row(msg_row, bar);
            self.front.put_str(0, msg_row, &format!(" ◈ {} ", w.message), Color::Black, bar);
        }

        let help = if w.clean_state() {
            " ←↑→↓/WASD: Move  P: Pause  Q: Quit"
        } else {
            " P/ENTER: New game  Q: Quit"
        };
        self.front.put_str(0, msg_row + 2, help, Color::DarkGrey, Color::Reset);
    }

    /// Top-left of a box of the given size centered on the board.
    fn centered_box(grid: &Grid, box_w: usize, box_h: usize) -> (usize, usize) {
        let (board_w, board_h) = board_size(grid);
        (
            BOARD_COL + board_w.saturating_sub(box_w) / 2,
            BOARD_ROW + board_h.saturating_sub(box_h) / 2,
        )
    }

    fn fill_box(&mut self, x0: usize, y0: usize, box_w: usize, box_h: usize) {
        for y in y0..y0 + box_h {
            for x in x0..x0 + box_w {
                self.front.set(x, y, Cell::new(' ', Color::White, MODAL_BG));
            }
        }
    }

    fn compose_pause_overlay(&mut self, w: &WorldState) {
        let (box_w, box_h) = (24, 5);
        let (x0, y0) = Self::centered_box(&w.grid, box_w, box_h);
        self.fill_box(x0, y0, box_w, box_h);
        let hdr = Color::Rgb { r: 255, g: 220, b: 50 };
        self.front.put_str(x0 + 8, y0 + 1, "PAUSED", hdr, MODAL_BG);
        self.front.put_str(x0 + 3, y0 + 3, "P  Resume   Q  Quit", Color::Rgb { r: 100, g: 200, b: 255 }, MODAL_BG);
    }

    /// The win/lose modal: title, the winner's sprite, final numbers, controls.
    fn compose_modal(&mut self, w: &WorldState) {
        let (title, sprite, title_fg) = match w.phase {
            Phase::Won => (
                "Congratulations You won!",
                SpriteKey::CharBoy,
                Color::Rgb { r: 80, g: 255, b: 80 },
            ),
            _ => (
                "Ohh No! Beetle got ya",
                SpriteKey::EnemyBug,
                Color::Rgb { r: 255, g: 60, b: 60 },
            ),
        };

        let (box_w, box_h) = (34, 11);
        let (x0, y0) = Self::centered_box(&w.grid, box_w, box_h);
        self.fill_box(x0, y0, box_w, box_h);

        self.front.put_str(x0 + (box_w - title.chars().count()) / 2, y0 + 1, title, title_fg, MODAL_BG);

        let art_x = x0 + (box_w - GLYPH_W) / 2;
        for (i, line) in sprite.glyphs().iter().enumerate() {
            self.front.put_str(art_x, y0 + 3 + i, line, sprite_color(sprite), MODAL_BG);
        }

        let score = format!("Score: {}   Stage: 1-{}", w.score, w.stage);
        self.front.put_str(x0 + 3, y0 + 6, &score, Color::White, MODAL_BG);
        self.front.put_str(x0 + 3, y0 + 8, "ENTER  Play again", Color::Rgb { r: 80, g: 255, b: 80 }, MODAL_BG);
        self.front.put_str(x0 + 3, y0 + 9, "ESC    Close", Color::DarkGrey, MODAL_BG);
    }
}
