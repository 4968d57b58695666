use std::{env, time::Duration};

use accfb_tools::OrdersConfig;
use log::*;

use crate::{integrations::line::LineConfig, mailer::MailConfig, notify_worker::DEFAULT_POLL_INTERVAL};

const DEFAULT_PGS_HOST: &str = "127.0.0.1";
const DEFAULT_PGS_PORT: u16 = 8360;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How often the notification worker polls the orders backend for new orders.
    pub poll_interval: Duration,
    /// When false, the worker is not started at all (useful for running several
    /// replicas behind one notifier).
    pub enable_notify_worker: bool,
    pub orders_config: OrdersConfig,
    pub line_config: LineConfig,
    pub mail_config: MailConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PGS_HOST.to_string(),
            port: DEFAULT_PGS_PORT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            enable_notify_worker: true,
            orders_config: OrdersConfig::default(),
            line_config: LineConfig::default(),
            mail_config: MailConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("PGS_HOST").ok().unwrap_or_else(|| DEFAULT_PGS_HOST.into());
        let port = env::var("PGS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for PGS_PORT. {e} Using the default, {DEFAULT_PGS_PORT}, instead."
                    );
                    DEFAULT_PGS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PGS_PORT);
        let poll_interval = env::var("PGS_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for PGS_POLL_INTERVAL_SECS. {e}"))
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);
        let enable_notify_worker =
            env::var("PGS_DISABLE_NOTIFY_WORKER").map(|s| &s != "1" && &s != "true").unwrap_or(true);
        let orders_config = OrdersConfig::from_env_or_default();
        let line_config = LineConfig::from_env_or_default();
        let mail_config = MailConfig::from_env_or_default();
        Self { host, port, poll_interval, enable_notify_worker, orders_config, line_config, mail_config }
    }
}
