//! Environment configuration for the framemoji server.
//!
//! Consolidates the `FRAMEMOJI_*` and KV connection variables read at
//! startup. All settings are absent-by-default with safe fallbacks: no
//! secret means dev mode (the daily answer is exposed in `GET /daily`),
//! no KV credentials means the local file backend.

use std::path::PathBuf;

use crate::constants::DEV_SECRET;

/// Resolved server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Daily-selection HMAC secret. `None` means dev mode.
    pub secret: Option<String>,
    /// Upstash/Vercel KV REST endpoint, if configured.
    pub kv_url: Option<String>,
    /// Bearer token for the KV REST endpoint.
    pub kv_token: Option<String>,
    /// `FRAMEMOJI_USE_FILE_STATS=1`: force the file backend even when KV
    /// credentials are present.
    pub use_file_stats: bool,
    /// Root directory for the file backend (`var/daily`, `var/stats`).
    pub var_dir: PathBuf,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            secret: std::env::var("FRAMEMOJI_DAILY_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
            kv_url: std::env::var("KV_REST_API_URL")
                .or_else(|_| std::env::var("UPSTASH_REDIS_REST_URL"))
                .ok()
                .filter(|s| !s.is_empty()),
            kv_token: std::env::var("KV_REST_API_TOKEN")
                .or_else(|_| std::env::var("UPSTASH_REDIS_REST_TOKEN"))
                .ok()
                .filter(|s| !s.is_empty()),
            use_file_stats: std::env::var("FRAMEMOJI_USE_FILE_STATS")
                .map(|v| v == "1")
                .unwrap_or(false),
            var_dir: PathBuf::from("var"),
        }
    }

    /// True when the remote KV backend should be used: credentials present
    /// and the file-stats override not set.
    pub fn has_kv(&self) -> bool {
        self.kv_url.is_some() && self.kv_token.is_some() && !self.use_file_stats
    }

    /// Dev mode: no daily secret configured. Relaxes the admin pin endpoint
    /// and exposes the answer in `GET /daily` for local testing.
    pub fn dev_mode(&self) -> bool {
        self.secret.is_none()
    }

    /// Secret used for daily selection, with the documented dev fallback.
    pub fn effective_secret(&self) -> &str {
        self.secret.as_deref().unwrap_or(DEV_SECRET)
    }
}

/// Read `FRAMEMOJI_BASE_PATH` (default `"."`), chdir, print path. Exits on
/// failure since a wrong working directory means the catalog cannot load.
pub fn init_base_path() -> PathBuf {
    let base_path = std::env::var("FRAMEMOJI_BASE_PATH").unwrap_or_else(|_| ".".to_string());
    println!("FRAMEMOJI_BASE_PATH={}", base_path);
    let path = PathBuf::from(&base_path);
    if std::env::set_current_dir(&base_path).is_err() {
        eprintln!("Failed to change directory to {}", base_path);
        std::process::exit(1);
    }
    if let Ok(cwd) = std::env::current_dir() {
        println!("Working directory: {}", cwd.display());
    }
    path
}

/// Read `FRAMEMOJI_PORT` (default 9000).
pub fn server_port() -> u16 {
    std::env::var("FRAMEMOJI_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9000)
}
