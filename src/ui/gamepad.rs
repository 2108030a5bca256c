/// Gamepad input using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  One half-cell move per push
///   A / Start             →  Confirm (restart from the modal)
///   Start                 →  Pause
///   B / Select            →  Cancel (close modal / quit)
///
/// Start appears in both confirm and pause: with the modal open it
/// restarts, otherwise it pauses.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::MoveDir;
use super::input::Command;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South  => Some(Btn::A),
            Button::East   => Some(Btn::B),
            Button::West   => Some(Btn::X),
            Button::North  => Some(Btn::Y),
            Button::Start  => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
#[derive(Debug, PartialEq)]
struct ActionMap {
    confirm: Vec<Btn>,
    pause: Vec<Btn>,
    cancel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::A, Btn::Start],
            pause:   vec![Btn::Start],
            cancel:  vec![Btn::B, Btn::Select],
        }
    }
}

impl ActionMap {
    /// Empty or unrecognized lists keep the current mapping.
    fn apply(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let cf = parse_list(&cfg.confirm);
        if !cf.is_empty() { self.confirm = cf; }
        let pa = parse_list(&cfg.pause);
        if !pa.is_empty() { self.pause = pa; }
        let ca = parse_list(&cfg.cancel);
        if !ca.is_empty() { self.cancel = ca; }
    }

    /// Commands a button press may mean, most specific first.
    fn commands_for(&self, btn: Btn, modal_open: bool) -> Option<Command> {
        if modal_open && self.confirm.contains(&btn) {
            Some(Command::Confirm)
        } else if self.pause.contains(&btn) {
            Some(Command::Pause)
        } else if self.confirm.contains(&btn) {
            Some(Command::Confirm)
        } else if self.cancel.contains(&btn) {
            Some(Command::Cancel)
        } else {
            None
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Digital stick direction currently held, for edge detection.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_dir: Option<MoveDir>,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,

    action_map: ActionMap,
    commands: Vec<Command>,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(e) => {
                    log::warn!("gamepad support unavailable: {e}");
                    (None, false)
                }
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            stick_dir: None,
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            commands: Vec::with_capacity(4),
            connected,
        }
    }

    /// Load button mapping from config.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map.apply(cfg);
    }

    /// Poll pending gamepad events. Call once per frame.
    pub fn update(&mut self, modal_open: bool) {
        self.commands.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs(modal_open);
        #[cfg(not(feature = "gamepad"))]
        let _ = modal_open;
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self, modal_open: bool) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    let cmd = match btn {
                        Button::DPadUp    => Some(Command::Move(MoveDir::Up)),
                        Button::DPadDown  => Some(Command::Move(MoveDir::Down)),
                        Button::DPadLeft  => Some(Command::Move(MoveDir::Left)),
                        Button::DPadRight => Some(Command::Move(MoveDir::Right)),
                        other => Btn::from_gilrs(other)
                            .and_then(|b| self.action_map.commands_for(b, modal_open)),
                    };
                    self.commands.extend(cmd);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => {
                    self.connected = true;
                    log::info!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                    self.stick_dir = None;
                    log::info!("gamepad disconnected");
                }
                _ => {}
            }
        }

        // A stick push counts once, when it first leaves the dead zone.
        let dir = stick_direction(self.stick_x, self.stick_y);
        if dir.is_some() && dir != self.stick_dir {
            self.commands.extend(dir.map(Command::Move));
        }
        self.stick_dir = dir;
    }
}

/// Dominant stick axis as a digital direction. gilrs reports +Y as up.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_direction(x: f32, y: f32) -> Option<MoveDir> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        None
    } else if x.abs() > y.abs() {
        Some(if x < 0.0 { MoveDir::Left } else { MoveDir::Right })
    } else {
        Some(if y > 0.0 { MoveDir::Up } else { MoveDir::Down })
    }
}
