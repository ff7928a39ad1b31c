#![forbid(unsafe_code)]

//! Mode-control surface.
//!
//! [`ControlHandle`] is the only writer of the shared [`ModeState`]. Each
//! call takes the lock just long enough to update the record; the engine
//! sees the result on its next tick.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use panelfx_core::{ModeOptionsUpdate, ModeState, ModeTag, ParseModeError};
use serde_json::Value;
use tracing::{debug, info};

/// Cloneable handle for changing what the panel shows.
#[derive(Debug, Clone, Default)]
pub struct ControlHandle {
    state: Arc<Mutex<ModeState>>,
}

impl ControlHandle {
    pub fn new(state: ModeState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ModeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch modes. Selecting the active mode again changes nothing, so
    /// the mode keeps its running state.
    pub fn set_mode(&self, mode: ModeTag) {
        let mut state = self.lock();
        if state.mode == mode {
            debug!(%mode, "mode already active");
            return;
        }
        info!(from = %state.mode, to = %mode, "mode changed");
        state.mode = mode;
    }

    /// Switch modes by name (`"life"`, `"pacman"`, ...).
    pub fn set_mode_str(&self, name: &str) -> Result<ModeTag, ParseModeError> {
        let mode: ModeTag = name.parse()?;
        self.set_mode(mode);
        Ok(mode)
    }

    /// Store display text; see [`ModeState::set_text`] for the mode switch.
    pub fn set_text(&self, text: &str) {
        let mut state = self.lock();
        let before = state.mode;
        state.set_text(text);
        if state.mode != before {
            info!(from = %before, to = %state.mode, "mode changed");
        }
    }

    /// Set brightness percent; values above 100 clamp.
    pub fn set_brightness(&self, brightness: u8) {
        self.lock().set_brightness(brightness);
    }

    /// Apply a typed options update. Returns `true` if anything changed.
    pub fn set_mode_options(&self, update: ModeOptionsUpdate) -> bool {
        let changed = self.lock().options.apply(update);
        if changed {
            info!(mode = %update.mode(), "mode options updated");
        }
        changed
    }

    /// Apply options for `mode` from a camelCase JSON object.
    ///
    /// Unrecognized values fall back to defaults. Returns `false` for modes
    /// without options or when nothing changed.
    pub fn set_mode_options_json(&self, mode: ModeTag, value: &Value) -> bool {
        match ModeOptionsUpdate::from_json(mode, value) {
            Some(update) => self.set_mode_options(update),
            None => {
                debug!(%mode, "mode has no options");
                false
            }
        }
    }

    /// Set the weather location. Blank clears it.
    pub fn set_weather_location(&self, location: Option<String>) {
        self.lock().set_weather_location(location);
    }

    pub fn set_image_path(&self, path: Option<PathBuf>) {
        self.lock().image_path = path;
    }

    /// Copy of the current state.
    pub fn get_state(&self) -> ModeState {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelfx_core::{MazeSpeed, MazeThickness};
    use serde_json::json;

    #[test]
    fn set_mode_by_name() {
        let control = ControlHandle::default();
        assert_eq!(control.set_mode_str("Life").unwrap(), ModeTag::Life);
        assert_eq!(control.get_state().mode, ModeTag::Life);
        assert!(control.set_mode_str("disco").is_err());
        assert_eq!(control.get_state().mode, ModeTag::Life);
    }

    #[test]
    fn clones_share_state() {
        let a = ControlHandle::default();
        let b = a.clone();
        b.set_brightness(30);
        assert_eq!(a.get_state().brightness, 30);
    }

    #[test]
    fn text_switches_mode() {
        let control = ControlHandle::new(ModeState::with_mode(ModeTag::Fire));
        control.set_text("HI");
        let state = control.get_state();
        assert_eq!(state.mode, ModeTag::Text);
        assert_eq!(state.text, "HI");
    }

    #[test]
    fn options_from_json() {
        let control = ControlHandle::default();
        let changed = control.set_mode_options_json(
            ModeTag::Maze,
            &json!({ "mazeSpeed": "fast", "mazeThickness": "bogus" }),
        );
        assert!(changed);
        let maze = control.get_state().options.maze;
        assert_eq!(maze.speed, MazeSpeed::Fast);
        assert_eq!(maze.thickness, MazeThickness::Medium);
        assert!(!control.set_mode_options_json(ModeTag::Life, &json!({})));
    }

    #[test]
    fn image_and_location() {
        let control = ControlHandle::default();
        control.set_weather_location(Some("  ".into()));
        control.set_image_path(Some("a.png".into()));
        let state = control.get_state();
        assert!(state.weather_location.is_none());
        assert_eq!(state.image_path, Some(PathBuf::from("a.png")));
    }
}
