//! Process logging bootstrap.
//!
//! # Responsibility
//! - Start one `flexi_logger` backend per process: rolling files under the
//!   configured directory, mirrored to stderr from `info` upwards.
//! - Route panics through the same backend with a sanitized payload.
//!
//! # Invariants
//! - A second call with the same settings is a no-op.
//! - A second call with different settings fails with `LoggingError::Conflict`.
//! - Nothing in here panics.
use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "razorlog";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;
const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Failure to bring up process logging.
#[derive(Debug)]
pub enum LoggingError {
    /// Level is not one of trace|debug|info|warn|error.
    UnknownLevel(String),
    /// Directory is empty or relative.
    InvalidDirectory(PathBuf),
    /// Directory could not be created.
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    /// `flexi_logger` refused the configuration.
    Backend(flexi_logger::FlexiLoggerError),
    /// Logging already runs with other settings.
    Conflict {
        active: LogSettings,
        requested: LogSettings,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected {}",
                LEVELS.join("|")
            ),
            Self::InvalidDirectory(path) => write!(
                f,
                "log directory must be a non-empty absolute path, got `{}`",
                path.display()
            ),
            Self::CreateDirectory { path, source } => write!(
                f,
                "cannot create log directory `{}`: {source}",
                path.display()
            ),
            Self::Backend(err) => write!(f, "logger backend failed to start: {err}"),
            Self::Conflict { active, requested } => write!(
                f,
                "logging already runs as {active}; refusing to switch to {requested}"
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Validated logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    level: &'static str,
    directory: PathBuf,
}

impl LogSettings {
    /// Parses a case-insensitive level (`warning` is accepted for `warn`) and
    /// an absolute directory.
    pub fn parse(level: &str, directory: &Path) -> Result<Self, LoggingError> {
        let lowered = level.trim().to_ascii_lowercase();
        let wanted = if lowered == "warning" { "warn" } else { lowered.as_str() };
        let level = LEVELS
            .iter()
            .copied()
            .find(|known| *known == wanted)
            .ok_or_else(|| LoggingError::UnknownLevel(level.trim().to_string()))?;

        if directory.as_os_str().is_empty() || !directory.is_absolute() {
            return Err(LoggingError::InvalidDirectory(directory.to_path_buf()));
        }

        Ok(Self {
            level,
            directory: directory.to_path_buf(),
        })
    }

    pub fn level(&self) -> &'static str {
        self.level
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Display for LogSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "level={} dir={}", self.level, self.directory.display())
    }
}

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Starts process logging, or confirms it already runs with these settings.
///
/// # Errors
/// Returns `LoggingError` for an unknown level, a relative directory, a
/// directory that cannot be created, a backend start failure, or a conflict
/// with the settings of an earlier call.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let requested = LogSettings::parse(level, log_dir)?;
    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(requested.clone()))?;
    if active.settings != requested {
        return Err(LoggingError::Conflict {
            active: active.settings.clone(),
            requested,
        });
    }
    Ok(())
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(settings: LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(settings.directory()).map_err(|source| {
        LoggingError::CreateDirectory {
            path: settings.directory.clone(),
            source,
        }
    })?;

    let handle = Logger::try_with_str(settings.level())
        .map_err(LoggingError::Backend)?
        .log_to_file(
            FileSpec::default()
                .directory(settings.directory())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .duplicate_to_stderr(Duplicate::Info)
        .format_for_files(flexi_logger::detailed_format)
        .format_for_stderr(flexi_logger::default_format)
        .start()
        .map_err(LoggingError::Backend)?;

    install_panic_hook();
    info!(
        "event=logging_init module=logging status=ok os={} debug_build={} version={} {}",
        std::env::consts::OS,
        cfg!(debug_assertions),
        env!("CARGO_PKG_VERSION"),
        settings
    );

    Ok(ActiveLogger {
        settings,
        _handle: handle,
    })
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }
    let next = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let location = panic
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = panic
            .payload()
            .downcast_ref::<&str>()
            .map(|text| (*text).to_string())
            .or_else(|| panic.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=logging status=error location={} payload={}",
            location,
            single_line(&payload, PANIC_PAYLOAD_LIMIT)
        );
        next(panic);
    }));
}

/// Flattens line breaks and caps the length so one panic is one log line.
fn single_line(value: &str, limit: usize) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    if flat.chars().count() <= limit {
        return flat;
    }
    let mut capped: String = flat.chars().take(limit).collect();
    capped.push_str("...");
    capped
}

#[cfg(test)]
mod tests {
    use super::{init_logging, single_line, LogSettings, LoggingError};
    use std::path::Path;

    #[test]
    fn settings_accept_known_levels_case_insensitively() {
        let dir = std::env::temp_dir();
        assert_eq!(LogSettings::parse("INFO", &dir).unwrap().level(), "info");
        assert_eq!(LogSettings::parse(" warning ", &dir).unwrap().level(), "warn");
        assert!(matches!(
            LogSettings::parse("verbose", &dir),
            Err(LoggingError::UnknownLevel(level)) if level == "verbose"
        ));
    }

    #[test]
    fn settings_reject_relative_and_empty_directories() {
        assert!(matches!(
            LogSettings::parse("info", Path::new("logs/dev")),
            Err(LoggingError::InvalidDirectory(_))
        ));
        assert!(matches!(
            LogSettings::parse("info", Path::new("")),
            Err(LoggingError::InvalidDirectory(_))
        ));
    }

    #[test]
    fn single_line_flattens_and_caps() {
        assert_eq!(single_line("a\nb\rc", 10), "a b c");
        assert_eq!(single_line("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn repeated_init_is_accepted_only_with_same_settings() {
        let root = tempfile::tempdir().unwrap();
        let log_dir = root.path().join("logs");

        init_logging("info", &log_dir).unwrap();
        init_logging("INFO", &log_dir).unwrap();
        assert!(log_dir.is_dir());

        let err = init_logging("debug", &log_dir).unwrap_err();
        assert!(matches!(err, LoggingError::Conflict { .. }));
        assert!(err.to_string().contains("refusing to switch"));

        let other_dir = root.path().join("elsewhere");
        assert!(matches!(
            init_logging("info", &other_dir),
            Err(LoggingError::Conflict { .. })
        ));
    }
}
