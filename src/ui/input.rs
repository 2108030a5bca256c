/// Keyboard input.
///
/// Every key press is one discrete command: a half-cell move, the pause
/// control, or a modal action. Holding a key does not repeat moves, so
/// Repeat and Release events are dropped.
///
/// Events are drained without blocking once per frame, before the tick.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::MoveDir;

/// What a key press asks the driver to do.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(MoveDir),
    Pause,
    Confirm, // modal: restart
    Cancel,  // modal: close, otherwise quit
    Quit,
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P'), KeyCode::F(1)];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' '), KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Map one key event to a command.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(Command::Quit);
    }

    let code = key.code;
    let cmd = if KEYS_LEFT.contains(&code) {
        Command::Move(MoveDir::Left)
    } else if KEYS_RIGHT.contains(&code) {
        Command::Move(MoveDir::Right)
    } else if KEYS_UP.contains(&code) {
        Command::Move(MoveDir::Up)
    } else if KEYS_DOWN.contains(&code) {
        Command::Move(MoveDir::Down)
    } else if KEYS_PAUSE.contains(&code) {
        Command::Pause
    } else if KEYS_CONFIRM.contains(&code) {
        Command::Confirm
    } else if code == KeyCode::Esc {
        Command::Cancel
    } else if KEYS_QUIT.contains(&code) {
        Command::Quit
    } else {
        return None;
    };
    Some(cmd)
}

pub struct InputState {
    /// Commands from the most recent `drain_events()`, in arrival order.
    commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { commands: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events. Call once per frame.
    pub fn drain_events(&mut self) -> std::io::Result<()> {
        self.commands.clear();
        while poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if let Some(cmd) = command_for(&key) {
                    self.commands.push(cmd);
                }
            }
        }
        Ok(())
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}
