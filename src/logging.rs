use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Pick the log level: `--quiet` and `--verbose` beat the configured level.
pub fn level_for(verbose: bool, quiet: bool, configured: Option<&str>) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    if verbose {
        return LevelFilter::Debug;
    }
    configured
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Warn)
}

/// Install a stderr logger. A second call is a no-op.
pub fn init(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
