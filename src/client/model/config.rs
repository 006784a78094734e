use std::env;
use std::time::Duration;
use anyhow::{Context, Error};

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_BEHAVIOR_QUEUE_CAPACITY: usize = 64;

/// Client configs
#[derive(Debug, Clone)]
pub(crate) struct ClientConfig {
    /// scheme + authority of the platform, without the `/api` prefix
    pub base_url: String,
    /// merchant order board refresh period
    pub poll_interval: Duration,
    /// pending behavior events kept before new ones are dropped
    pub behavior_queue_capacity: usize,
    /// per-request deadline, none by default
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            behavior_queue_capacity: DEFAULT_BEHAVIOR_QUEUE_CAPACITY,
            request_timeout: None,
        }
    }

    pub fn from_env() -> Result<Self, Error> {
        let mut config = Self::new(env::var("API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL.to_string()));
        if let Ok(secs) = env::var("ORDER_POLL_INTERVAL_SECS") {
            let secs: u64 = secs.parse().context("ORDER_POLL_INTERVAL_SECS must be a number of seconds")?;
            config.poll_interval = Duration::from_secs(secs.max(1));
        }
        if let Ok(capacity) = env::var("BEHAVIOR_QUEUE_CAPACITY") {
            let capacity: usize = capacity.parse().context("BEHAVIOR_QUEUE_CAPACITY must be a positive integer")?;
            config.behavior_queue_capacity = capacity.max(1);
        }
        if let Ok(secs) = env::var("REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().context("REQUEST_TIMEOUT_SECS must be a number of seconds")?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }
}
