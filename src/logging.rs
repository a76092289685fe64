//! Tracing subscriber setup used by the binary.

use std::{env, sync::OnceLock};

use tracing_appender::{
    non_blocking,
    non_blocking::NonBlocking,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{fmt, time::ChronoLocal, writer::MakeWriterExt},
};

/// Guard to ensure buffered logs are flushed on shutdown.
static LOG_GUARD: OnceLock<non_blocking::WorkerGuard> = OnceLock::new();

pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(false)
        .with_ansi(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    let file_error = match env::var("LOG_DIR").map(init_file_writer) {
        Ok(Ok(file_writer)) => {
            let stderr = std::io::stderr.with_max_level(tracing::Level::INFO);
            builder.with_writer(stderr.and(file_writer)).init();
            None
        }
        Ok(Err(e)) => {
            builder.init();
            Some(e)
        }
        Err(_) => {
            builder.init();
            None
        }
    };

    if let Some(e) = file_error {
        tracing::warn!(error = %e, "📝 ⚠️ File logging disabled");
    }

    tracing::debug!("logger initialized");
}

fn init_file_writer(dir: String) -> Result<NonBlocking, InitError> {
    let max_files = env::var("LOG_MAX_FILES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok());

    let mut file_builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("rankscope.log");

    if let Some(n) = max_files {
        file_builder = file_builder.max_log_files(n);
    }

    let file_appender = file_builder.build(&dir)?;

    let (file_writer, guard) = non_blocking(file_appender);

    // init() runs once per process, a second guard would only be dropped.
    let _ = LOG_GUARD.set(guard);

    Ok(file_writer)
}
