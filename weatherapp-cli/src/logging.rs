use std::path::Path;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// The log file gets everything our crates emit, whatever `-v` says.
const FILE_DIRECTIVES: &str = "warn,weatherapp=debug,weatherapp_core=debug";

/// Install a stderr layer and a DEBUG file layer at `log_file`.
///
/// `-v` raises our own crates to INFO on stderr, `-vv` to DEBUG; `RUST_LOG`
/// replaces the stderr filter entirely. If the file can't be opened, only
/// stderr logging is set up. Keep the returned guard alive until exit so
/// buffered lines reach the file.
pub fn init(verbosity: u8, log_file: &Path) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(verbosity)));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let (file, guard, file_error) = match file_appender(log_file) {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(FILE_DIRECTIVES));
            (Some(layer), Some(guard), None)
        }
        Err(err) => (None, None, Some(err)),
    };

    let _ = tracing_subscriber::registry().with(console).with(file).try_init();

    if let Some(err) = file_error {
        tracing::warn!(path = %log_file.display(), error = %err, "Could not open log file");
    }

    guard
}

/// Appender writing to exactly `log_file`, never rotated.
fn file_appender(log_file: &Path) -> Result<RollingFileAppender, InitError> {
    let dir = log_file.parent().unwrap_or_else(|| Path::new("."));
    let mut builder = RollingFileAppender::builder().rotation(Rotation::NEVER);
    if let Some(stem) = log_file.file_stem().and_then(|s| s.to_str()) {
        builder = builder.filename_prefix(stem);
    }
    if let Some(ext) = log_file.extension().and_then(|s| s.to_str()) {
        builder = builder.filename_suffix(ext);
    }
    builder.build(dir)
}

fn directives(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    format!("warn,weatherapp={level},weatherapp_core={level}")
}
