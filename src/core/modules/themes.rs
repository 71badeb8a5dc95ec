//=========================================================================
// Themes Module
//=========================================================================
//
// Holds the requested visual theme and applies it once the engine can
// accept it.
//
//=========================================================================

use log::debug;

use super::MapModule;
use crate::core::boundary::EngineHandle;

pub struct ThemesModule {
    engine: EngineHandle,
    ready: bool,
    requested: Option<String>,
    applied: Option<String>,
}

impl ThemesModule {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            ready: false,
            requested: None,
            applied: None,
        }
    }

    /// Requests `theme`; applied immediately when the engine is ready.
    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.requested = Some(theme.into());
        if self.ready {
            self.apply();
        }
    }

    pub fn current_theme(&self) -> Option<&str> {
        self.applied.as_deref()
    }

    fn apply(&mut self) {
        let Some(theme) = self.requested.take() else {
            return;
        };
        if self.applied.as_deref() == Some(theme.as_str()) {
            return;
        }
        debug!(target: "modules::themes", "Applying theme '{}'", theme);
        self.engine.apply_theme(&theme);
        self.applied = Some(theme);
    }
}

impl MapModule for ThemesModule {
    fn name(&self) -> &'static str {
        "themes"
    }

    fn on_initialized(&mut self) {
        self.ready = true;
        self.apply();
    }
}
