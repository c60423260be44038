use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use time::macros::format_description;

/// Installs the stderr logger. Only warnings and errors are shown unless
/// `verbose` is set, which enables the per-phase diagnostics.
pub fn init_logging(verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_custom(format_description!("[hour]:[minute]:[second].[subsecond digits:3]"))
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .add_filter_allow_str(env!("CARGO_CRATE_NAME"));
    // Falls back to UTC when the local offset cannot be determined.
    let _ = builder.set_time_offset_to_local();

    TermLogger::init(level, builder.build(), TerminalMode::Stderr, ColorChoice::Auto)
}
