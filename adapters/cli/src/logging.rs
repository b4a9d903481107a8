use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the global logger.
///
/// `RUST_LOG` takes precedence. Otherwise `verbose` selects debug output over
/// the default info level.
pub(crate) fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    // A logger installed earlier (by a test harness, for instance) wins.
    let _ = Builder::from_env(env).format_timestamp(None).try_init();
}
