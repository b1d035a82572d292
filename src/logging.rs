use std::path::{Path, PathBuf};

pub const LOG_FILE_BASENAME: &str = "taskdash";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 10;
pub const LOG_ENV_VAR: &str = "TASKDASH_LOG";

/// Logs sit in their own folder next to the persisted `*.json` keys.
pub fn log_directory(app_data_dir: &Path) -> PathBuf {
    app_data_dir.join("logs")
}

pub fn default_log_spec() -> &'static str {
    if cfg!(debug_assertions) {
        "warn,taskdash_lib=debug"
    } else {
        "warn,taskdash_lib=info"
    }
}

/// First non-blank of `TASKDASH_LOG`, `RUST_LOG`, then the build default.
pub fn resolve_log_spec(app_var: Option<String>, rust_log: Option<String>) -> String {
    [app_var, rust_log]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_log_spec().to_string())
}

#[cfg(all(feature = "app", not(test)))]
pub fn init_logging(app_data_dir: &Path) -> Result<(), flexi_logger::FlexiLoggerError> {
    use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming, WriteMode};

    let directory = log_directory(app_data_dir);
    std::fs::create_dir_all(&directory)?;

    let spec = resolve_log_spec(
        std::env::var(LOG_ENV_VAR).ok(),
        std::env::var("RUST_LOG").ok(),
    );
    let echo = if cfg!(debug_assertions) {
        Duplicate::Debug
    } else {
        Duplicate::None
    };

    Logger::try_with_str(&spec)?
        .log_to_file(
            FileSpec::default()
                .directory(&directory)
                .basename(LOG_FILE_BASENAME)
                .suffix(LOG_FILE_SUFFIX)
                .suppress_timestamp(),
        )
        .append()
        .write_mode(WriteMode::Direct)
        .format_for_files(flexi_logger::opt_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_SIZE_BYTES),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
        )
        .duplicate_to_stdout(echo)
        .start()?;

    std::panic::set_hook(Box::new(log_panic));
    log::info!("logging to {} with spec {spec}", directory.display());
    Ok(())
}

/// Panics land in the log file; the process has no console in release builds.
#[cfg(all(feature = "app", not(test)))]
fn log_panic(info: &std::panic::PanicHookInfo<'_>) {
    let backtrace = std::backtrace::Backtrace::force_capture();
    log::error!("{info}\n{backtrace}");
    eprintln!("{info}");
}
