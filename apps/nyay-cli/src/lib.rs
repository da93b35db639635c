//! Shared startup for the command-line tools.

use nyay_core::config::{Config, Settings};
use tracing_subscriber::{fmt, EnvFilter};

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

/// Read `.env` if present, then the layered configuration.
pub fn load_settings() -> anyhow::Result<Settings> {
    let _ = dotenvy::dotenv();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    Ok(config.settings()?)
}

/// Byte-safe prefix of at most `max_chars` characters.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
