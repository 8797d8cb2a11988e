//! Plain config structs with `from_env()` constructors, mirroring the
//! teacher's `NatsConfig`/`WorkerConfig` pattern (§10 ambient stack).

use std::path::PathBuf;
use std::time::Duration;

/// C1 broker host configuration (§4.1).
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub enable_logging: bool,
    pub server_name: String,
    pub enable_durable_log: bool,
    pub durable_log_domain: String,
    pub port: u16,
    pub store_dir: PathBuf,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            enable_logging: true,
            server_name: "compozy-transport".to_string(),
            enable_durable_log: true,
            durable_log_domain: "compozy_0.1.0".to_string(),
            port: 0,
            store_dir: PathBuf::from("./state/broker"),
        }
    }
}

impl BrokerConfig {
    /// Reads overrides from the process environment; any variable absent or
    /// unparseable falls back to [`Default`].
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enable_logging: std::env::var("COMPOZY_BROKER_ENABLE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_logging),
            server_name: std::env::var("COMPOZY_BROKER_SERVER_NAME")
                .unwrap_or(defaults.server_name),
            enable_durable_log: std::env::var("COMPOZY_BROKER_ENABLE_DURABLE_LOG")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_durable_log),
            durable_log_domain: std::env::var("COMPOZY_BROKER_DURABLE_LOG_DOMAIN")
                .unwrap_or(defaults.durable_log_domain),
            port: std::env::var("COMPOZY_BROKER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            store_dir: std::env::var("COMPOZY_BROKER_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
        }
    }
}

/// C4 subscribe loop configuration (§4.4).
#[derive(Debug, Clone)]
pub struct SubscribeConfig {
    pub batch_size: usize,
    pub fetch_timeout: Duration,
    /// Reserved for a future per-message retry policy; unused by the loop
    /// itself (Open Question decision, §9).
    pub max_retries: usize,
}

impl Default for SubscribeConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            fetch_timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }
}

impl SubscribeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            batch_size: std::env::var("COMPOZY_SUBSCRIBE_BATCH_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.batch_size),
            fetch_timeout: std::env::var("COMPOZY_SUBSCRIBE_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            max_retries: std::env::var("COMPOZY_SUBSCRIBE_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
        }
    }
}

/// C3 consumer policy — fixed, not caller-configurable (§4.3 contract).
#[derive(Debug, Clone, Copy)]
pub struct ConsumerPolicy {
    pub ack_wait: Duration,
    pub max_deliver: u32,
}

impl Default for ConsumerPolicy {
    fn default() -> Self {
        Self {
            ack_wait: Duration::from_secs(30),
            max_deliver: 3,
        }
    }
}
