use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use explorer_core::{update, AppState, Msg};
use explorer_logging::{explorer_info, explorer_warn};

use super::config::{self, DEFAULT_CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::logging;
use super::ui::input::{parse_command, Command, HELP};
use super::ui::render::render;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    let (config, notes) = config::load_or_init(&config_path);

    logging::initialize(
        config.log_destination,
        explorer_logging::parse_level(&config.log_level),
        &config.log_file,
    );
    config::log_notes(&notes);
    explorer_info!("Using backend {}", config.base_url);

    let runner = EffectRunner::new(config.client_settings())
        .with_context(|| format!("starting client for {}", config.base_url))?;
    let (command_tx, command_rx) = mpsc::channel::<Command>();

    // Console input is read on its own thread; EOF quits.
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if command_tx.send(parse_command(&line)).is_err() {
                return;
            }
        }
        let _ = command_tx.send(Command::Quit);
    });

    let mut shell = Shell::new(AppState::with_settings(config.display_settings()), runner);
    println!("{HELP}\n");
    shell.dispatch(Msg::Started)?;

    loop {
        for msg in shell.runner.drain_events() {
            shell.dispatch(msg)?;
        }
        match command_rx.recv_timeout(POLL_INTERVAL) {
            Ok(Command::Dispatch(msg)) => shell.dispatch(msg)?,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(Command::Unknown(line)) => {
                explorer_warn!("Unknown command {:?}", line);
                println!("unknown command: {line} (type `help`)");
            }
            Ok(Command::Quit) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    explorer_info!("Shutting down");
    Ok(())
}

/// Owns the state; the only place `update` is called.
struct Shell {
    state: AppState,
    runner: EffectRunner,
}

impl Shell {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self { state, runner }
    }

    fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        if was_dirty {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}", render(&view)).context("writing to console")?;
            stdout.flush().context("flushing console")?;
        }
        Ok(())
    }
}
