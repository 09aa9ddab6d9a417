use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Json,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Synthetic,
    Store,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub web_port: u16,
    pub log_level: String,
    pub static_directory: String,
    pub store: StoreKind,
    pub data_directory: String,
    pub feed: FeedKind,
    pub feed_page_size: usize,
    /// Number of pages the synthetic feed serves before reporting exhaustion.
    /// Absent means the demo feed never runs dry.
    pub feed_max_pages: Option<u32>,
    pub fallback_aspect_ratio: f64,
    pub prefetch_margin_px: u32,
    /// Upper bound on `pages` for one demo-photo append request.
    pub demo_max_pages: u32,
    pub admin_username: String,
    pub admin_password: String,
}

impl AppConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/default", config_dir)))
            .add_source(File::with_name(&format!("{}/{}", config_dir, env)).required(false))
            .add_source(File::with_name(&format!("{}/local", config_dir)).required(false))
            .add_source(Environment::with_prefix("INFINI"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        Self {
            web_port: 0,
            log_level: "debug".into(),
            static_directory: "./static".into(),
            store: StoreKind::Memory,
            data_directory: "./data".into(),
            feed: FeedKind::Synthetic,
            feed_page_size: 4,
            feed_max_pages: Some(2),
            fallback_aspect_ratio: 1.25,
            prefetch_margin_px: 600,
            demo_max_pages: 3,
            admin_username: "admin".into(),
            admin_password: "password".into(),
        }
    }
}
