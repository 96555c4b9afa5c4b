//! attendance-tui - A terminal viewer for the attendance system database
//!
//! Pick one of the six backend tables and browse its rows. Uses the
//! Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::services::ApiClient;
use crate::tui::Tui;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn, Level};

/// Terminal viewer for the attendance system tables.
#[derive(Parser)]
#[command(name = "attendance-tui", about = "Browse attendance system tables", version)]
struct Cli {
    /// Backend base URL (e.g. http://localhost:8000). Overrides the config file.
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Request timeout in seconds. Overrides the config file.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Log file path. Defaults to ~/.attendance-tui/attendance-tui.log.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only log errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::INFO,
                1 => Level::DEBUG,
                _ => Level::TRACE,
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .or_else(logging::default_log_path)
        .unwrap_or_else(|| std::env::temp_dir().join("attendance-tui.log"));
    logging::init(&log_path, cli.log_level())?;

    let saved = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => {
            if let Err(e) = Config::default().save() {
                warn!(error = %e, "could not write default config");
            }
            Config::default()
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "ignoring unreadable config, using defaults");
            Config::default()
        }
    };
    let config = saved.with_overrides(cli.api_url.clone(), cli.timeout);
    info!(api = %config.api_base_url, timeout = ?config.request_timeout(), "starting");

    let client = ApiClient::new(&config.api_base_url, config.request_timeout())
        .context("Failed to build HTTP client")?;

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    let mut app = App::new(client);
    app.init()?;

    let result = run_app(&mut tui, &mut app);

    tui.exit()?;

    if let Err(err) = result {
        error!(error = ?err, "application error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    info!("exiting");
    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                error!(error = %e, "draw failed");
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // An action may produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                debug!(action = %a, "update");
                current_action = app.update(a)?;
            }
        } else {
            // No event - tick so background requests get polled
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
