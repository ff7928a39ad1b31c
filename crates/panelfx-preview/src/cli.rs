#![forbid(unsafe_code)]

//! Command-line argument parsing for the preview.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Engine settings also honor the `PANELFX_*` variables read by
//! `EngineConfig::apply_env`; flags given here win over both.

use std::env;
use std::path::PathBuf;
use std::process;

use panelfx::{EngineConfig, FontSize, LogFormat, ModeTag};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
panelfx preview: procedural LED panel modes in your terminal

USAGE:
    panelfx-preview [OPTIONS]

OPTIONS:
    --config=PATH        JSON engine config (missing fields keep defaults)
    --mode=NAME          Start in mode NAME (see MODES)
    --size=WxH           Panel size in pixels (default: 64x64)
    --tick-ms=N          Milliseconds per frame (default: 100)
    --brightness=N       Brightness percent 0-100 (default: 80)
    --font=SIZE          small, medium or large (default: small)
    --text=TEXT          Text for the text and scroll modes
    --seed=N             Seed for generator randomness
    --location=LOC       Weather location (ZIP code or city)
    --weather-json=PATH  Canned weather reports keyed by location
    --image=PATH         Image for the image mode
    --headless=N         Render N frames without a terminal, print status JSON
    --log-file=PATH      Write logs here (default: panelfx-preview.log)
    --log-format=FMT     pretty or json (default: pretty)
    --help, -h           Show this help message
    --version, -V        Show version

MODES:
    clock text weather scroll rainbow plasma squares life
    pulse image maze spectrum fire pacman off

KEYBINDINGS:
    Right / n        Next mode
    Left / p         Previous mode
    + / -            Brightness up / down
    Space            Pause / resume
    q / Esc / Ctrl+C Quit

ENVIRONMENT VARIABLES:
    PANELFX_LOG                   Log filter (same syntax as RUST_LOG)
    PANELFX_WIDTH, PANELFX_HEIGHT Panel size
    PANELFX_TICK_MS               Override --tick-ms default
    PANELFX_MODE                  Override --mode default
    PANELFX_PREVIEW_EXIT_AFTER_MS Auto-quit after N milliseconds (for testing)";

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct Opts {
    pub config: Option<PathBuf>,
    pub mode: Option<ModeTag>,
    pub size: Option<(u16, u16)>,
    pub tick_ms: Option<u64>,
    pub brightness: Option<u8>,
    pub font: Option<FontSize>,
    pub text: Option<String>,
    pub seed: Option<u64>,
    pub location: Option<String>,
    pub weather_json: Option<PathBuf>,
    pub image: Option<PathBuf>,
    /// Frames to render headless; `None` runs the interactive preview.
    pub headless: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_format: LogFormat,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

fn parse_size(val: &str) -> Option<(u16, u16)> {
    let (w, h) = val.split_once(['x', 'X'])?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    pub fn parse() -> Self {
        let mut opts = match Self::parse_from(env::args().skip(1)) {
            Ok(Some(opts)) => opts,
            Ok(None) => process::exit(0),
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        };
        if let Ok(val) = env::var("PANELFX_PREVIEW_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            opts.exit_after_ms = n;
        }
        opts
    }

    /// Parse `args`. `Ok(None)` means help or version was printed.
    pub fn parse_from<I>(args: I) -> Result<Option<Self>, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut opts = Self::default();
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => {
                    println!("{HELP_TEXT}");
                    return Ok(None);
                }
                "--version" | "-V" => {
                    println!("panelfx-preview {VERSION}");
                    return Ok(None);
                }
                other => {
                    let Some((key, val)) = other.split_once('=') else {
                        return Err(format!("Unknown argument: {other}"));
                    };
                    let invalid = || format!("Invalid {key} value: {val}");
                    match key {
                        "--config" => opts.config = Some(val.into()),
                        "--mode" => opts.mode = Some(val.parse().map_err(|_| invalid())?),
                        "--size" => opts.size = Some(parse_size(val).ok_or_else(invalid)?),
                        "--tick-ms" => opts.tick_ms = Some(val.parse().map_err(|_| invalid())?),
                        "--brightness" => {
                            opts.brightness = Some(val.parse().map_err(|_| invalid())?);
                        }
                        "--font" => opts.font = Some(FontSize::parse(val).ok_or_else(invalid)?),
                        "--text" => opts.text = Some(val.to_string()),
                        "--seed" => opts.seed = Some(val.parse().map_err(|_| invalid())?),
                        "--location" => opts.location = Some(val.to_string()),
                        "--weather-json" => opts.weather_json = Some(val.into()),
                        "--image" => opts.image = Some(val.into()),
                        "--headless" => opts.headless = Some(val.parse().map_err(|_| invalid())?),
                        "--log-file" => opts.log_file = Some(val.into()),
                        "--log-format" => {
                            opts.log_format = LogFormat::parse(val).ok_or_else(invalid)?;
                        }
                        "--exit-after-ms" => {
                            opts.exit_after_ms = val.parse().map_err(|_| invalid())?;
                        }
                        _ => return Err(format!("Unknown argument: {other}")),
                    }
                }
            }
        }
        Ok(Some(opts))
    }

    /// Overlay the engine-facing flags onto `config`.
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some((w, h)) = self.size {
            config.width = w;
            config.height = h;
        }
        if let Some(ms) = self.tick_ms {
            config.tick_interval_ms = ms;
        }
        if let Some(b) = self.brightness {
            config.brightness = b;
        }
        if let Some(font) = self.font {
            config.font = font;
        }
        if let Some(mode) = self.mode {
            config.initial_mode = mode;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}
