use chrono::Local;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;

/// Maps a level name to a filter: "off"/"none", "error", "warn", "info", "debug", "trace"
pub fn level_from_str(level: &str) -> Option<LevelFilter> {
    match level.trim().to_lowercase().as_str() {
        "off" | "none" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// log file name stamped with the local date and time
pub fn log_file_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("log_{}.txt", date_and_time)
}

/// Initialises terminal logging, plus a log file when `log_to_file` is set.
/// Returns `false` when logging is off or a global logger was already installed.
pub fn init_logger(level: LevelFilter, log_to_file: bool) -> bool {
    if level == LevelFilter::Off {
        return false;
    }
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if log_to_file {
        let name = log_file_name();
        match File::create(&name) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(e) => eprintln!("cannot create log file {}: {}", name, e),
        }
    }
    CombinedLogger::init(loggers).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(level_from_str("info"), Some(LevelFilter::Info));
        assert_eq!(level_from_str(" DEBUG "), Some(LevelFilter::Debug));
        assert_eq!(level_from_str("none"), Some(LevelFilter::Off));
        assert_eq!(level_from_str("warning"), Some(LevelFilter::Warn));
        assert_eq!(level_from_str("loud"), None);
    }

    #[test]
    fn test_log_file_name() {
        let name = log_file_name();
        assert!(name.starts_with("log_") && name.ends_with(".txt"));
    }

    #[test]
    fn test_logging_off_installs_nothing() {
        assert!(!init_logger(LevelFilter::Off, false));
    }
}
