use anyhow::{anyhow, Result};
use std::io::{IsTerminal, Write};
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter (e.g. `debug`, `nu_aggregate=trace`).
pub const LOG_ENV: &str = "NU_AGGREGATE_LOG";

static BUFFER: Mutex<Option<Vec<u8>>> = Mutex::new(None);

fn buffer() -> MutexGuard<'static, Option<Vec<u8>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Activate buffering. While active, log lines are stored instead of
/// being written to stderr, so they cannot corrupt a full-screen UI.
pub fn activate() {
    *buffer() = Some(Vec::new());
}

/// Deactivate buffering and return all collected lines.
pub fn drain() -> Vec<String> {
    let bytes = buffer().take().unwrap_or_default();
    String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// stderr writer that diverts into the buffer while it is active.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedStderr;

impl Write for BufferedStderr {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = buffer();
        if let Some(stored) = guard.as_mut() {
            stored.extend_from_slice(buf);
            Ok(buf.len())
        } else {
            drop(guard);
            std::io::stderr().write(buf)
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        std::io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for BufferedStderr {
    type Writer = BufferedStderr;

    fn make_writer(&'a self) -> Self::Writer {
        *self
    }
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Install the global tracing subscriber.
///
/// `NU_AGGREGATE_LOG` wins over `--verbose` when set.
pub fn init(verbose: bool) -> Result<()> {
    let env_filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter(verbose))
            .map_err(|e| anyhow!("invalid log filter: {}", e))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(BufferedStderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}
