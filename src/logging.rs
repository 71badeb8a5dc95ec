//=========================================================================
// Logging
//=========================================================================
//
// Optional `env_logger` backend for hosts that do not install their own
// `log` implementation.
//
// Targets used by this crate:
//   controller, controller::frame, surface, facade, facade::entrances,
//   events, relay, modules, modules::<name>
//
// `controller::frame` and `modules` log every tick at trace level; keep
// them off outside of debugging sessions.
//
//=========================================================================

use std::sync::Once;

use log::LevelFilter;

/// Default filter: lifecycle milestones only, per-frame chatter muted.
pub const DEFAULT_FILTER: &str = "info,controller::frame=warn,modules=warn";

//=== LoggingConfig =======================================================

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `env_logger` filter directives; falls back to `RUST_LOG`, then
    /// [`DEFAULT_FILTER`].
    pub filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// Route output through the test harness capture.
    pub is_test: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            write_style: env_logger::WriteStyle::Auto,
            is_test: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_write_style(mut self, style: env_logger::WriteStyle) -> Self {
        self.write_style = style;
        self
    }

    pub fn for_tests(mut self) -> Self {
        self.is_test = true;
        self
    }
}

//=== init_logging ========================================================

static INIT: Once = Once::new();

/// Installs the global logger on first call; later calls are ignored.
///
/// Returns `false` if another logger was already installed by the host.
pub fn init_logging(config: LoggingConfig) -> bool {
    let mut installed = false;

    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(LevelFilter::Warn);

        match config.filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => builder.parse_filters(&filter),
            None => builder.parse_filters(DEFAULT_FILTER),
        };

        builder.write_style(config.write_style);
        builder.is_test(config.is_test);

        installed = builder.try_init().is_ok();
        if installed {
            log::debug!(target: "controller", "Logging initialized");
        }
    });

    installed
}
