use log::*;
use pgs_common::helpers::normalize_base_url;

const DEFAULT_ORDERS_API: &str = "https://accfbapi.accfb-ads.com";

/// Base urls for the orders backend. The messages endpoint can live on a different host
/// than the orders endpoints, so it is configured separately and falls back to the
/// orders url when unset.
#[derive(Debug, Clone)]
pub struct OrdersConfig {
    pub orders_url: String,
    pub messages_url: String,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self { orders_url: DEFAULT_ORDERS_API.to_string(), messages_url: DEFAULT_ORDERS_API.to_string() }
    }
}

impl OrdersConfig {
    pub fn new(orders_url: &str, messages_url: &str) -> Self {
        Self { orders_url: normalize_base_url(orders_url), messages_url: normalize_base_url(messages_url) }
    }

    pub fn from_env_or_default() -> Self {
        let orders_url = std::env::var("PGS_ORDERS_API").map(|s| normalize_base_url(&s)).unwrap_or_else(|_| {
            warn!("📦️ PGS_ORDERS_API is not set. Using the default, {DEFAULT_ORDERS_API}, instead.");
            DEFAULT_ORDERS_API.to_string()
        });
        let messages_url = std::env::var("PGS_MESSAGES_API").map(|s| normalize_base_url(&s)).unwrap_or_else(|_| {
            info!("📦️ PGS_MESSAGES_API is not set. Using the orders url, {orders_url}, instead.");
            orders_url.clone()
        });
        Self { orders_url, messages_url }
    }
}
