/// Entry point and game loop.

mod config;
mod domain;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use rand::Rng;

use config::GameConfig;
use sim::event::GameEvent;
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::{Command, InputState};
use ui::renderer::Renderer;
use ui::sound::{Sfx, SoundEngine};

const MESSAGE_TICKS: u32 = 90;

fn main() {
    let config = GameConfig::load();

    if let Some(path) = &config.log_file {
        if let Err(e) = logging::init(path, config.log_level) {
            eprintln!("Log file {} unavailable: {e}", path.display());
        }
    }

    let mut rng = rand::thread_rng();
    let mut world = WorldState::new(&config, &mut rng);
    world.set_message("Reach the water! Arrows/WASD to move", MESSAGE_TICKS * 2);
    log::info!(
        "session start: {}x{} grid, {} stages, {} enemies",
        config.grid.cols, config.grid.rows, config.rules.max_stages, config.rules.enemy_count,
    );

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config, &mut rng);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        log::error!("game loop failed: {e}");
        eprintln!("Game error: {e}");
    }

    log::info!("session end: stage {}, score {}", world.stage, world.score);
    log::logger().flush();

    println!();
    println!("Thanks for playing Bug Crossing!");
    println!("Final Score: {}", world.score);
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let frame_sleep = Duration::from_millis(config.display.frame_ms);
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events()?;
        gp.update(world.modal_open);

        let commands: Vec<Command> = kb.commands().iter()
            .chain(gp.commands())
            .copied()
            .collect();
        for cmd in commands {
            let events = match dispatch(world, cmd, rng) {
                Some(events) => events,
                None => return Ok(()),
            };
            process_events(world, sound, &events);
        }

        // Clamp so a stalled terminal does not teleport enemies.
        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f32().min(config.display.max_frame_dt);
        last_tick = now;

        let events = step::step(world, dt, rng);
        process_events(world, sound, &events);

        world.tick_message();
        renderer.render(world, gp.connected)?;
        std::thread::sleep(frame_sleep);
    }
}

/// Apply one command. `None` means quit.
fn dispatch(world: &mut WorldState, cmd: Command, rng: &mut impl Rng) -> Option<Vec<GameEvent>> {
    let events = match cmd {
        Command::Move(dir) => step::handle_move(world, dir, rng),
        Command::Pause => step::toggle_pause(world, rng),
        Command::Confirm => {
            if world.modal_open || !world.clean_state() {
                step::restart(world, rng)
            } else {
                vec![]
            }
        }
        Command::Cancel => {
            if !world.modal_open { return None; }
            step::close_modal(world);
            vec![]
        }
        Command::Quit => return None,
    };
    Some(events)
}

fn process_events(world: &mut WorldState, sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for event in events {
        if let (Some(sfx), Some(effect)) = (sound, Sfx::for_event(event)) {
            sfx.play(effect);
        }

        match *event {
            GameEvent::PlayerHit { lives_left } => {
                log::info!("player hit, {lives_left} lives left");
                world.set_message(&format!("Squashed! {lives_left} lives left"), MESSAGE_TICKS);
            }
            GameEvent::StageCleared { stage, gained } => {
                log::info!("stage {stage} cleared (+{gained})");
                world.set_message(&format!("Stage {stage} cleared! +{gained}"), MESSAGE_TICKS);
            }
            GameEvent::GameWon { score } => {
                log::info!("game won with score {score}");
                world.set_message("You made it across every stage!", 0);
            }
            GameEvent::GameOver { score } => {
                log::info!("game over with score {score}");
                world.set_message("Out of lives", 0);
            }
            GameEvent::Paused => {
                log::debug!("paused at stage {}", world.stage);
                world.set_message("PAUSED  [P] Resume", 0);
            }
            GameEvent::Resumed => {
                log::debug!("resumed");
                world.message.clear();
                world.message_timer = 0;
            }
            GameEvent::Restarted => {
                log::info!("session restarted");
                world.set_message("New game", MESSAGE_TICKS);
            }
            GameEvent::EnemyRespawned { index } => {
                log::trace!("enemy {index} respawned");
            }
            GameEvent::PlayerMoved => {}
        }
    }
}
