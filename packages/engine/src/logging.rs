//! Tracing setup for binaries that embed the engine.
//!
//! The library itself only emits `tracing` events. A host with its own
//! subscriber (a web service, a desktop shell) ignores this module; a bare
//! CLI or batch job calls [`init_tracing`] once at startup and keeps the
//! returned guard alive until exit.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{EngineError, EngineResult};

const LOG_FILE_PREFIX: &str = "engine.log";

/// Keeps the background file writer alive; drop it to flush and stop.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Where and how verbosely to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directive, e.g. `info` or `adaptive_quiz_engine=debug`
    pub filter: String,
    /// Directory for daily-rolling `engine.log` files; stdout only when unset
    pub file_dir: Option<PathBuf>,
}

impl LogSettings {
    pub fn stdout(filter: &str) -> Self {
        Self {
            filter: filter.to_string(),
            file_dir: None,
        }
    }

    /// `ENGINE_FILE_LOGS=true|1` enables file output under `ENGINE_LOG_DIR` (default `./logs`).
    pub fn from_env(filter: &str) -> Self {
        let file_dir = file_logging_enabled().then(|| {
            std::env::var("ENGINE_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./logs"))
        });
        Self {
            filter: filter.to_string(),
            file_dir,
        }
    }
}

pub fn file_logging_enabled() -> bool {
    std::env::var("ENGINE_FILE_LOGS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// Installs the global subscriber configured from the environment.
pub fn init_tracing(filter: &str) -> EngineResult<Option<FileLogGuard>> {
    init_with(&LogSettings::from_env(filter))
}

/// Fails instead of panicking when a subscriber is already installed.
pub fn init_with(settings: &LogSettings) -> EngineResult<Option<FileLogGuard>> {
    let env_filter =
        EnvFilter::try_new(&settings.filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(true);

    let Some(dir) = settings.file_dir.as_deref() else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stdout_layer)
            .try_init()
            .map_err(|err| EngineError::Logging(err.to_string()))?;
        return Ok(None);
    };

    let (writer, guard) = file_writer(dir)?;
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|err| EngineError::Logging(err.to_string()))?;

    Ok(Some(guard))
}

/// Non-blocking writer over a daily-rolling file in `dir`, created if missing.
fn file_writer(dir: &Path) -> EngineResult<(NonBlocking, FileLogGuard)> {
    std::fs::create_dir_all(dir).map_err(|err| {
        EngineError::Logging(format!("cannot create log dir {}: {}", dir.display(), err))
    })?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((writer, FileLogGuard { _guard: guard }))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("engine-logs-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_second_init_is_an_error() {
        assert!(init_with(&LogSettings::stdout("adaptive_quiz_engine=debug")).is_ok());
        assert!(matches!(
            init_with(&LogSettings::stdout("info")),
            Err(EngineError::Logging(_))
        ));
    }

    #[test]
    fn test_file_writer_creates_dir_and_flushes_on_drop() {
        let dir = scratch_dir().join("nested");
        let (mut writer, guard) = file_writer(&dir).unwrap();
        writer.write_all(b"answer processed\n").unwrap();
        drop(guard);

        let contents: String = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX))
            .map(|entry| std::fs::read_to_string(entry.path()).unwrap_or_default())
            .collect();
        assert!(contents.contains("answer processed"));

        let _ = std::fs::remove_dir_all(dir.parent().unwrap_or(&dir));
    }

    #[test]
    fn test_file_writer_reports_unusable_dir() {
        let base = scratch_dir();
        std::fs::create_dir_all(&base).unwrap();
        let blocker = base.join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let err = file_writer(&blocker.join("logs")).err();
        assert!(matches!(err, Some(EngineError::Logging(_))));

        let _ = std::fs::remove_dir_all(base);
    }

    #[test]
    fn test_stdout_settings_have_no_file_dir() {
        let settings = LogSettings::stdout("warn");
        assert_eq!(settings.filter, "warn");
        assert_eq!(settings.file_dir, None);
    }
}
