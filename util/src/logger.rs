//! Generic logger utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info};
use fern;
use colored::{ColoredString, Colorize};
use thiserror::Error;

// Internal imports
use crate::session;

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `module_levels` overrides `min_level` for the given module paths, so that
/// per-cycle debug output of a single module (e.g. the simulated plant) can
/// be quietened without losing the rest. Coloured level tags are only written
/// to stdout, the log file stays plain text.
///
/// # Notes
///
/// - `min_level` must be at least as verbose as `log::Level::Info`.
///
/// # Safety
///
/// - This function must only be called once to prevent corrupting logs.
pub fn logger_init(
    min_level: self::LevelFilter,
    module_levels: &[(&'static str, LevelFilter)],
    session: &session::Session
) -> Result<(), LoggerInitError> {

    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    let log_file = fern::log_file(session.log_file_path.clone())
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new().level(min_level);
    for (module, level) in module_levels {
        dispatch = dispatch.level_for(*module, *level);
    }

    dispatch
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| out.finish(format_args!(
                    "{}",
                    format_line(
                        session::get_elapsed_seconds(),
                        record.level(),
                        record.target(),
                        message,
                        true
                    )
                )))
                .chain(std::io::stdout())
        )
        .chain(
            fern::Dispatch::new()
                .format(|out, message, record| out.finish(format_args!(
                    "{}",
                    format_line(
                        session::get_elapsed_seconds(),
                        record.level(),
                        record.target(),
                        message,
                        false
                    )
                )))
                .chain(log_file)
        )
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?}", min_level);
    for (module, level) in module_levels {
        info!("    Log level for {}: {:?}", module, level);
    }
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Format a single log line.
///
/// Debug and trace lines include the target module, others don't.
fn format_line(
    elapsed_s: f64,
    level: log::Level,
    target: &str,
    message: &std::fmt::Arguments,
    colour: bool
) -> String {
    let tag = if colour {
        level_to_str(level).to_string()
    }
    else {
        level_tag(level).to_string()
    };

    if level > log::Level::Info {
        format!("[{:10.6} {}] {}: {}", elapsed_s, tag, target, message)
    }
    else {
        format!("[{:10.6} {}] {}", elapsed_s, tag, message)
    }
}

/// Get the plain tag of a log level
fn level_tag(level: log::Level) -> &'static str {
    match level {
        log::Level::Trace => "TRC",
        log::Level::Debug => "DBG",
        log::Level::Info  => "INF",
        log::Level::Warn  => "WRN",
        log::Level::Error => "ERR"
    }
}

/// Get the coloured representation of a log level
fn level_to_str(level: log::Level) -> ColoredString {
    let tag = level_tag(level);
    match level {
        log::Level::Trace => tag.dimmed().italic(),
        log::Level::Debug => tag.dimmed(),
        log::Level::Info  => tag.normal(),
        log::Level::Warn  => tag.yellow(),
        log::Level::Error => tag.red().bold()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
