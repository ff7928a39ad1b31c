#![forbid(unsafe_code)]

//! Terminal preview for panelfx.
//!
//! Runs the engine against a terminal sink (or headless for a fixed number
//! of frames) with keyboard mode switching. Config precedence: defaults,
//! then `--config` file, then `PANELFX_*` variables, then flags.

mod cli;
mod session;
mod sink;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use panelfx::core::StaticWeatherProvider;
use panelfx::prelude::*;
use panelfx::{CountedTicker, LogConfig, init_logging};
use tracing::{info, warn};

use crate::cli::Opts;
use crate::session::TerminalSession;
use crate::sink::TerminalSink;

const DEFAULT_LOG_FILE: &str = "panelfx-preview.log";
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const BRIGHTNESS_STEP: u8 = 10;

fn main() {
    let opts = Opts::parse();
    if let Err(err) = run(&opts) {
        eprintln!("panelfx-preview: {err}");
        process::exit(1);
    }
}

fn run(opts: &Opts) -> Result<()> {
    // The interactive preview owns the screen, so logs go to a file.
    let file = match opts.headless {
        Some(_) => opts.log_file.clone(),
        None => Some(
            opts.log_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        ),
    };
    let log = LogConfig {
        format: opts.log_format,
        file,
        default_filter: None,
    };
    if let Err(err) = init_logging(&log) {
        eprintln!("panelfx-preview: logging disabled: {err}");
    }

    let config = load_config(opts);
    info!(
        width = config.width,
        height = config.height,
        tick_ms = config.tick_interval_ms,
        mode = %config.initial_mode,
        "starting preview"
    );

    match opts.headless {
        Some(frames) => run_headless(opts, &config, frames),
        None => run_interactive(opts, &config),
    }
}

fn load_config(opts: &Opts) -> EngineConfig {
    let mut config = match &opts.config {
        Some(path) => EngineConfig::load(path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "cannot load config, using defaults");
            EngineConfig::default()
        }),
        None => EngineConfig::default(),
    };
    config.apply_env();
    opts.apply(&mut config);
    config.validate();
    config
}

fn weather_provider(opts: &Opts) -> StaticWeatherProvider {
    let sample = || {
        let location = opts.location.as_deref().unwrap_or("Preview");
        StaticWeatherProvider::new().with_fallback(StaticWeatherProvider::sample_report(location))
    };
    let Some(path) = &opts.weather_json else {
        return sample();
    };
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| StaticWeatherProvider::from_json(&text).map_err(|e| e.to_string()));
    match loaded {
        Ok(provider) => provider,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot load weather reports, using sample");
            sample()
        }
    }
}

fn build_engine<S: DisplaySink>(opts: &Opts, config: &EngineConfig, sink: S) -> Engine<S> {
    let engine = Engine::new(config, sink)
        .with_weather_provider(Arc::new(weather_provider(opts)), config);
    let control = engine.control();
    if let Some(text) = &opts.text {
        control.set_text(text);
    }
    control.set_weather_location(opts.location.clone());
    control.set_image_path(opts.image.clone());
    // Text switches modes; the configured start mode wins.
    control.set_mode(config.initial_mode);
    engine
}

fn run_headless(opts: &Opts, config: &EngineConfig, frames: u64) -> Result<()> {
    let sink = HeadlessSink::new(config.width, config.height);
    let mut runtime = Runtime::new(build_engine(opts, config, sink), config.tick_interval());
    runtime.start_with(Box::new(CountedTicker::new(frames)))?;
    let ticks = runtime.wait();
    let lit = runtime.with_engine(|engine| engine.sink().last_frame().lit_pixels());
    let status = runtime.status();
    runtime.shutdown();
    info!(ticks, lit, "headless run complete");

    match serde_json::to_string_pretty(&status) {
        Ok(json) => println!("{json}"),
        Err(err) => warn!(error = %err, "cannot serialize status"),
    }
    Ok(())
}

fn run_interactive(opts: &Opts, config: &EngineConfig) -> Result<()> {
    let _session = TerminalSession::enter()?;
    let sink = TerminalSink::stdout(config.width, config.height);
    let mut runtime = Runtime::new(build_engine(opts, config, sink), config.tick_interval());
    let control = runtime.control();
    runtime.start()?;

    let started = Instant::now();
    let exit_after = Duration::from_millis(opts.exit_after_ms);
    loop {
        if opts.exit_after_ms > 0 && started.elapsed() >= exit_after {
            break;
        }
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Right | KeyCode::Char('n') => {
                control.set_mode(control.get_state().mode.next());
            }
            KeyCode::Left | KeyCode::Char('p') => {
                control.set_mode(control.get_state().mode.prev());
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let level = control.get_state().brightness;
                control.set_brightness(level.saturating_add(BRIGHTNESS_STEP));
            }
            KeyCode::Char('-') => {
                let level = control.get_state().brightness;
                control.set_brightness(level.saturating_sub(BRIGHTNESS_STEP));
            }
            KeyCode::Char(' ') => {
                if runtime.is_running() {
                    runtime.stop();
                } else {
                    runtime.start()?;
                }
            }
            _ => {}
        }
    }

    runtime.shutdown();
    Ok(())
}
