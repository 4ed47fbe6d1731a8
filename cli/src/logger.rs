use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use notch_core::paths;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

/// Writes colored lines to stderr, which leaves stdout to the method channel, and plain
/// lines to the log file.
pub struct NotchLogger {
    level: LevelFilter,
    log_file: Mutex<Option<File>>,
}

impl NotchLogger {
    pub fn new(level: LevelFilter) -> Self {
        let log_file = paths::prepare_log_file_path().and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .map_err(|e| eprintln!("Warning: Failed to open log file at {path:?}: {e}"))
                .ok()
        });

        Self {
            level,
            log_file: Mutex::new(log_file),
        }
    }

    fn level_tag(level: Level) -> &'static str {
        match level {
            Level::Error => "[E]",
            Level::Warn => "[W]",
            Level::Info => "[I]",
            Level::Debug => "[D]",
            Level::Trace => "[T]",
        }
    }

    fn short_target<'a>(record: &'a Record) -> &'a str {
        record.target().rsplit("::").next().unwrap_or(record.target())
    }

    fn format_plain(record: &Record) -> String {
        format!(
            "{} [{}] {}",
            Self::level_tag(record.level()),
            Self::short_target(record),
            record.args()
        )
    }

    fn format_colored(record: &Record) -> String {
        let tag = Self::level_tag(record.level());
        let target = format!("[{}]", Self::short_target(record).cyan().dimmed());

        match record.level() {
            Level::Error => format!("{tag} {target} {}", record.args()).red().bold().to_string(),
            Level::Warn => format!("{tag} {target} {}", record.args()).yellow().bold().to_string(),
            Level::Info => format!("{} {target} {}", tag.green().bold(), record.args()),
            Level::Debug => format!("{} {target} {}", tag.blue().bold(), record.args()),
            Level::Trace => format!("{} {target} {}", tag.white().bold(), record.args()),
        }
    }
}

impl Log for NotchLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!("{}", Self::format_colored(record));

        if let Ok(mut file) = self.log_file.lock() {
            if let Some(file) = file.as_mut() {
                let _ = writeln!(file, "{}", Self::format_plain(record));
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.log_file.lock() {
            if let Some(file) = file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

/// Quiet logs up to info, verbose everything, the default stops before trace.
pub fn level_filter(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Info
    } else if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    }
}

pub fn init_logger(quiet: bool, verbose: bool) -> Result<(), log::SetLoggerError> {
    let level = level_filter(quiet, verbose);
    log::set_boxed_logger(Box::new(NotchLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}
