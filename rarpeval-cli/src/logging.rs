//! Logging setup
//!
//! Console output goes through `env_logger` and follows `-v`/`--quiet` and
//! `RUST_LOG`. The optional log file receives this crate family's records at
//! info level or finer regardless of the console filter.

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Log file written next to the predictions
pub const LOG_FILE: &str = "evaluation.log";

const TARGET_PREFIX: &str = "rarpeval";

/// Console level for a `-v` count
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

struct TeeLogger {
    console: Option<env_logger::Logger>,
    file: Option<Mutex<File>>,
    file_level: LevelFilter,
}

impl TeeLogger {
    fn file_accepts(&self, metadata: &Metadata) -> bool {
        self.file.is_some()
            && metadata.level() <= self.file_level
            && metadata.target().starts_with(TARGET_PREFIX)
    }

    fn max_level(&self) -> LevelFilter {
        let console = self.console.as_ref().map_or(LevelFilter::Off, |c| c.filter());
        let file = if self.file.is_some() { self.file_level } else { LevelFilter::Off };
        console.max(file)
    }
}

impl Log for TeeLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.as_ref().is_some_and(|c| c.enabled(metadata)) || self.file_accepts(metadata)
    }

    fn log(&self, record: &Record) {
        if let Some(console) = &self.console {
            if console.matches(record) {
                console.log(record);
            }
        }
        if self.file_accepts(record.metadata()) {
            if let Some(Ok(mut file)) = self.file.as_ref().map(Mutex::lock) {
                // a failing log file must not abort the evaluation
                let _ = writeln!(
                    file,
                    "{:<5} {}: {}",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {
        if let Some(console) = &self.console {
            console.flush();
        }
        if let Some(Ok(mut file)) = self.file.as_ref().map(Mutex::lock) {
            let _ = file.flush();
        }
    }
}

/// Initialize logging based on verbosity level, optionally appending to `log_file`
///
/// Returns false if a logger was already installed in this process.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Result<bool> {
    let console = (!quiet).then(|| {
        let level = level_for(verbose).to_string().to_lowercase();
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).build()
    });

    let file = log_file
        .map(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))
        })
        .transpose()?
        .map(Mutex::new);

    let logger = TeeLogger {
        console,
        file,
        file_level: level_for(verbose).max(LevelFilter::Info),
    };
    let max_level = logger.max_level();

    match log::set_boxed_logger(Box::new(logger)) {
        Ok(()) => {
            log::set_max_level(max_level);
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}
