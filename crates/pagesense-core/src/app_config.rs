use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub database_path: PathBuf,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    /// Maximum number of characters of cleaned page text kept for analysis.
    pub content_max_chars: usize,
    /// Pause between successive pipeline runs in a batch or feed.
    pub batch_delay_ms: u64,
}

impl AppConfig {
    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    #[must_use]
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}
