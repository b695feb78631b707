//! Logger setup for the `ci-sanitizer` binary.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs `env_logger`, honoring `RUST_LOG` (default `warn`).
///
/// `level_override` replaces whatever `RUST_LOG` asked for. Calling this more
/// than once is harmless; later calls are ignored.
pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).try_init().ok();
}
