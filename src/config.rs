/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub rules: RulesConfig,
    pub display: DisplayConfig,
    pub gamepad: GamepadConfig,
    pub log_file: Option<PathBuf>,
    pub log_level: log::LevelFilter,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub row_height: f32,
    pub col_width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RulesConfig {
    pub max_stages: u32,
    pub collision_margin: f32,
    pub lives: u32,
    pub rate_low: f32,
    pub rate_high: f32,
    pub rate_step: f32,     // bounds grow by stage * rate_step on stage clear
    pub enemy_count: usize,
    pub spawn_offset_max: f32,
    pub goal_line: f32,     // player y at or above this clears the stage
}

#[derive(Clone, Debug)]
pub struct DisplayConfig {
    pub frame_ms: u64,
    pub max_frame_dt: f32,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub pause: Vec<String>,
    pub cancel: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_rows")]
    rows: usize,
    #[serde(default = "default_cols")]
    cols: usize,
    #[serde(default = "default_row_height")]
    row_height: f32,
    #[serde(default = "default_col_width")]
    col_width: f32,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_max_stages")]
    max_stages: u32,
    #[serde(default = "default_collision_margin")]
    collision_margin: f32,
    #[serde(default = "default_lives")]
    lives: u32,
    #[serde(default = "default_rate_low")]
    rate_low: f32,
    #[serde(default = "default_rate_high")]
    rate_high: f32,
    #[serde(default = "default_rate_step")]
    rate_step: f32,
    #[serde(default)]
    enemy_count: Option<usize>,
    #[serde(default = "default_spawn_offset")]
    spawn_offset_max: f32,
    #[serde(default = "default_goal_line")]
    goal_line: f32,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_max_frame_dt")]
    max_frame_dt: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default = "default_cancel")]
    cancel: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    log_file: Option<String>,
    #[serde(default)]
    log_level: Option<String>,
}

// ── Defaults ──

fn default_rows() -> usize { 7 }
fn default_cols() -> usize { 8 }
fn default_row_height() -> f32 { 83.0 }
fn default_col_width() -> f32 { 101.0 }

fn default_max_stages() -> u32 { 5 }
fn default_collision_margin() -> f32 { 75.0 }
fn default_lives() -> u32 { 3 }
fn default_rate_low() -> f32 { 150.0 }   // px/s
fn default_rate_high() -> f32 { 200.0 }
fn default_rate_step() -> f32 { 5.0 }
fn default_spawn_offset() -> f32 { 100.0 }
fn default_goal_line() -> f32 { -10.0 }

fn default_frame_ms() -> u64 { 16 }
fn default_max_frame_dt() -> f32 { 0.25 }

fn default_confirm() -> Vec<String> { vec!["A".into(), "Start".into()] }
fn default_pause() -> Vec<String> { vec!["Start".into()] }
fn default_cancel() -> Vec<String> { vec!["B".into(), "Select".into()] }

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid {
            rows: default_rows(),
            cols: default_cols(),
            row_height: default_row_height(),
            col_width: default_col_width(),
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            max_stages: default_max_stages(),
            collision_margin: default_collision_margin(),
            lives: default_lives(),
            rate_low: default_rate_low(),
            rate_high: default_rate_high(),
            rate_step: default_rate_step(),
            enemy_count: None,
            spawn_offset_max: default_spawn_offset(),
            goal_line: default_goal_line(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            frame_ms: default_frame_ms(),
            max_frame_dt: default_max_frame_dt(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            pause: default_pause(),
            cancel: default_cancel(),
        }
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let text = match read_config_file(&candidate_dirs()) {
            Some(text) => text,
            None => return GameConfig::default(),
        };
        match from_toml_str(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Warning: config.toml parse error: {e}");
                eprintln!("Using default settings.");
                GameConfig::default()
            }
        }
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        // The grid needs at least one enemy lane plus the water and two grass rows.
        let rows = cfg.grid.rows.max(4);
        let cols = cfg.grid.cols.max(1);

        let rate_low = cfg.rules.rate_low.max(0.0);
        let rate_high = cfg.rules.rate_high.max(rate_low);

        GameConfig {
            grid: GridConfig {
                rows,
                cols,
                row_height: cfg.grid.row_height.max(1.0),
                col_width: cfg.grid.col_width.max(1.0),
            },
            rules: RulesConfig {
                max_stages: cfg.rules.max_stages.max(1),
                collision_margin: cfg.rules.collision_margin.max(0.0),
                lives: cfg.rules.lives,
                rate_low,
                rate_high,
                rate_step: cfg.rules.rate_step.max(0.0),
                enemy_count: cfg.rules.enemy_count.unwrap_or(rows - 1),
                spawn_offset_max: cfg.rules.spawn_offset_max.max(0.0),
                goal_line: cfg.rules.goal_line,
            },
            display: DisplayConfig {
                frame_ms: cfg.display.frame_ms.max(1),
                max_frame_dt: cfg.display.max_frame_dt.max(0.001),
            },
            gamepad: GamepadConfig {
                confirm: cfg.gamepad.confirm,
                pause: cfg.gamepad.pause,
                cancel: cfg.gamepad.cancel,
            },
            log_file: cfg.general.log_file.map(PathBuf::from),
            log_level: cfg.general.log_level
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(log::LevelFilter::Info),
        }
    }
}

/// Parse a `config.toml` body. Absent keys take their defaults.
pub fn from_toml_str(text: &str) -> Result<GameConfig, toml::de::Error> {
    let cfg = toml::from_str::<TomlConfig>(text)?;
    Ok(GameConfig::from_toml(cfg))
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Read the first config.toml found in the candidate directories.
fn read_config_file(search_dirs: &[PathBuf]) -> Option<String> {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return Some(text),
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = from_toml_str("").unwrap();
        assert_eq!(cfg.grid.rows, 7);
        assert_eq!(cfg.grid.cols, 8);
        assert_eq!(cfg.grid.row_height, 83.0);
        assert_eq!(cfg.grid.col_width, 101.0);
        assert_eq!(cfg.rules.max_stages, 5);
        assert_eq!(cfg.rules.lives, 3);
        assert_eq!(cfg.rules.collision_margin, 75.0);
        assert_eq!(cfg.rules.enemy_count, 6); // rows - 1
        assert!(cfg.log_file.is_none());
        assert_eq!(cfg.log_level, log::LevelFilter::Info);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = from_toml_str(
            "[grid]\nrows = 9\n\n[rules]\nmax_stages = 2\n",
        ).unwrap();
        assert_eq!(cfg.grid.rows, 9);
        assert_eq!(cfg.grid.cols, 8);
        assert_eq!(cfg.rules.max_stages, 2);
        assert_eq!(cfg.rules.rate_low, 150.0);
        assert_eq!(cfg.rules.enemy_count, 8); // follows rows
    }

    #[test]
    fn explicit_enemy_count_wins() {
        let cfg = from_toml_str("[rules]\nenemy_count = 2\n").unwrap();
        assert_eq!(cfg.rules.enemy_count, 2);
    }

    #[test]
    fn inverted_rate_bounds_are_collapsed() {
        let cfg = from_toml_str("[rules]\nrate_low = 300.0\nrate_high = 100.0\n").unwrap();
        assert_eq!(cfg.rules.rate_low, 300.0);
        assert_eq!(cfg.rules.rate_high, 300.0);
    }

    #[test]
    fn negative_rate_step_is_clamped() {
        let cfg = from_toml_str("[rules]\nrate_step = -40.0\n").unwrap();
        assert_eq!(cfg.rules.rate_step, 0.0);
        let cfg = from_toml_str("[rules]\nrate_step = 12.5\n").unwrap();
        assert_eq!(cfg.rules.rate_step, 12.5);
    }

    #[test]
    fn tiny_grid_is_widened() {
        let cfg = from_toml_str("[grid]\nrows = 1\ncols = 0\n").unwrap();
        assert_eq!(cfg.grid.rows, 4);
        assert_eq!(cfg.grid.cols, 1);
    }

    #[test]
    fn general_section() {
        let cfg = from_toml_str(
            "[general]\nlog_file = \"bug.log\"\nlog_level = \"debug\"\n",
        ).unwrap();
        assert_eq!(cfg.log_file, Some(PathBuf::from("bug.log")));
        assert_eq!(cfg.log_level, log::LevelFilter::Debug);
    }

    #[test]
    fn bad_log_level_falls_back_to_info() {
        let cfg = from_toml_str("[general]\nlog_level = \"loud\"\n").unwrap();
        assert_eq!(cfg.log_level, log::LevelFilter::Info);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(from_toml_str("[grid\nrows = ").is_err());
        assert!(from_toml_str("[grid]\nrows = \"seven\"\n").is_err());
    }
}
