//! Debug logging to a file.
//!
//! The terminal is owned by the widgets, so log records go to a file
//! instead. Set `CONKIT_DEBUG=1` (or `true`) to enable it; `CONKIT_LOG_FILE`
//! overrides the path and `CONKIT_LOG_LEVEL` the level (default `debug`).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};

const ENV_ENABLE_LOG: &str = "CONKIT_DEBUG";
const ENV_LOG_FILE: &str = "CONKIT_LOG_FILE";
const ENV_LOG_LEVEL: &str = "CONKIT_LOG_LEVEL";

/// `log` backend appending one line per record to a file
pub struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl FileLogger {
    pub fn open(path: &Path, level: LevelFilter) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            level,
            file: Mutex::new(file),
        })
    }

    /// Install as the global logger. Fails if a logger is already set.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let thread = std::thread::current();
        let mut file = self.file.lock().unwrap_or_else(|p| p.into_inner());
        let _ = writeln!(
            file,
            "[{timestamp}] {:<5} [{}] {}: {}",
            record.level(),
            thread.name().unwrap_or("unnamed"),
            record.target(),
            record.args()
        );
        let _ = file.flush();
    }

    fn flush(&self) {
        let _ = self.file.lock().unwrap_or_else(|p| p.into_inner()).flush();
    }
}

fn env_enabled(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}

fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| v.parse().ok())
        .unwrap_or(LevelFilter::Debug)
}

fn default_log_path() -> PathBuf {
    if Path::new("tmp").is_dir() {
        PathBuf::from("tmp/conkit-debug.log")
    } else {
        PathBuf::from("/tmp/conkit-debug.log")
    }
}

/// Install the file logger when `CONKIT_DEBUG` asks for it.
///
/// Returns the log path when a logger was installed.
pub fn init_from_env() -> Option<PathBuf> {
    let enabled = std::env::var(ENV_ENABLE_LOG).ok();
    if !env_enabled(enabled.as_deref()) {
        return None;
    }

    let path = std::env::var_os(ENV_LOG_FILE)
        .map(PathBuf::from)
        .unwrap_or_else(default_log_path);
    let level = parse_level(std::env::var(ENV_LOG_LEVEL).ok().as_deref());

    match FileLogger::open(&path, level) {
        Ok(logger) => match logger.install() {
            Ok(()) => {
                log::info!("conkit debug log enabled at level {level}");
                Some(path)
            }
            Err(e) => {
                eprintln!("conkit: logger already installed: {e}");
                None
            }
        },
        Err(e) => {
            eprintln!("conkit: failed to open debug log file {}: {e}", path.display());
            None
        }
    }
}
