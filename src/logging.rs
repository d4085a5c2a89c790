use std::path::PathBuf;

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Initialise logging. With `debug` set the default level is `debug` and the
/// `RUST_LOG` environment variable may override it; otherwise the level is
/// fixed at `info`.
///
/// When `file` is given, events are also appended to that file through a
/// non-blocking writer. Only the first call installs a subscriber.
pub fn init(debug: bool, file: Option<PathBuf>) {
    // Without debug we force `info` so a stray `RUST_LOG` in the user's
    // environment cannot make an embedding host noisy.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let file_layer = file.and_then(|path| {
        let dir = path.parent().map(PathBuf::from).unwrap_or_default();
        let name = path.file_name()?.to_owned();
        if !dir.as_os_str().is_empty() {
            if let Err(err) = std::fs::create_dir_all(&dir) {
                eprintln!("failed to create log directory {}: {err}", dir.display());
                return None;
            }
        }
        let appender = tracing_appender::rolling::never(dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init();
}
