use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::OrdersConfig,
    data_objects::{DeleteOutcome, Order, OrderId, STATUS_CANCELLED, STATUS_DELETED},
    traits::OrdersGateway,
    OrdersApiError,
};

#[derive(Clone)]
pub struct OrdersApi {
    config: OrdersConfig,
    client: Arc<Client>,
}

impl OrdersApi {
    pub fn new(config: OrdersConfig) -> Result<Self, OrdersApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| OrdersApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn orders_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.orders_url)
    }

    pub fn messages_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.messages_url)
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<B>,
    ) -> Result<T, OrdersApiError> {
        trace!("📦️ Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| OrdersApiError::RestRequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("📦️ REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| OrdersApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| OrdersApiError::RestResponseError(e.to_string()))?;
            Err(OrdersApiError::QueryError { status, message })
        }
    }

    /// Fire a request where only success/failure matters (the delete fallback chain).
    /// Transport errors and non-2xx responses both come back as `false`.
    async fn attempt(&self, method: Method, url: &str, body: Option<serde_json::Value>) -> bool {
        let mut req = self.client.request(method.clone(), url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        match req.send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                debug!("📦️ {method} {url} returned {}", response.status());
                false
            },
            Err(e) => {
                debug!("📦️ {method} {url} failed: {e}");
                false
            },
        }
    }

    /// The fixed delete fallback chain. The backend only supports a subset of these
    /// operations, and which subset has changed before, so [`OrdersApi::soft_delete`]
    /// walks the chain and the first successful attempt wins. Hard delete variants come
    /// before the status patches.
    fn delete_plan(&self, id: OrderId) -> Vec<DeleteAttempt> {
        vec![
            DeleteAttempt {
                outcome: DeleteOutcome::HardDeleteOrdersPath,
                method: Method::DELETE,
                url: self.orders_url(&format!("/orders/{}", id.value())),
                body: None,
            },
            DeleteAttempt {
                outcome: DeleteOutcome::HardDeleteDeletePath,
                method: Method::DELETE,
                url: self.orders_url(&format!("/delete/{}", id.value())),
                body: None,
            },
            DeleteAttempt {
                outcome: DeleteOutcome::HardDeleteQueryParam,
                method: Method::DELETE,
                url: self.orders_url(&format!("/delete?id={}", id.value())),
                body: None,
            },
            DeleteAttempt {
                outcome: DeleteOutcome::StatusPatchedDeleted,
                method: Method::PATCH,
                url: self.orders_url(&format!("/status/{}", id.value())),
                body: Some(serde_json::json!({ "status": STATUS_DELETED })),
            },
            DeleteAttempt {
                outcome: DeleteOutcome::StatusPatchedCancelled,
                method: Method::PATCH,
                url: self.orders_url(&format!("/status/{}", id.value())),
                body: Some(serde_json::json!({ "status": STATUS_CANCELLED })),
            },
        ]
    }
}

struct DeleteAttempt {
    outcome: DeleteOutcome,
    method: Method,
    url: String,
    body: Option<serde_json::Value>,
}

/// Walk a delete plan with the given attempt runner; the first successful step wins.
/// The runner is injected so the walk can be exercised against scripted outcomes.
async fn walk_delete_plan<F, Fut>(plan: Vec<DeleteAttempt>, mut attempt: F) -> Result<DeleteOutcome, OrdersApiError>
where
    F: FnMut(DeleteAttempt) -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for step in plan {
        let outcome = step.outcome;
        if attempt(step).await {
            return Ok(outcome);
        }
    }
    Err(OrdersApiError::NoDeleteEndpoint)
}

impl OrdersGateway for OrdersApi {
    async fn fetch_all(&self) -> Result<Vec<Order>, OrdersApiError> {
        let url = self.orders_url("/get");
        debug!("📦️ Fetching all orders");
        let orders = self.rest_query::<Vec<Order>, ()>(Method::GET, &url, None).await?;
        debug!("📦️ Fetched {} orders", orders.len());
        Ok(orders)
    }

    async fn soft_delete(&self, id: OrderId) -> Result<DeleteOutcome, OrdersApiError> {
        debug!("📦️ Deleting order {id}");
        let result = walk_delete_plan(self.delete_plan(id), |step| async move {
            self.attempt(step.method, &step.url, step.body).await
        })
        .await;
        match &result {
            Ok(outcome) => info!("📦️ Order {id} removed: {outcome}"),
            Err(_) => warn!("📦️ Every delete strategy failed for order {id}"),
        }
        result
    }

    async fn save_note(&self, id: OrderId, text: &str) -> Result<Order, OrdersApiError> {
        let url = self.messages_url(&format!("/messages/{}", id.value()));
        let body = serde_json::json!({ "detels": text });
        debug!("📦️ Saving admin note for order {id}");
        let updated = self.rest_query::<Order, _>(Method::PUT, &url, Some(body)).await?;
        info!("📦️ Saved admin note for order {id}");
        Ok(updated)
    }

    async fn patch_status(&self, id: OrderId, status: &str) -> Result<(), OrdersApiError> {
        let url = self.orders_url(&format!("/status/{}", id.value()));
        let body = serde_json::json!({ "status": status });
        debug!("📦️ Patching order {id} status to {status}");
        self.rest_query::<serde_json::Value, _>(Method::PATCH, &url, Some(body)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::OrdersConfig;

    #[test]
    fn urls_compose_against_each_base() {
        let config = OrdersConfig::new("https://orders.example.com/", "https://messages.example.com");
        let api = OrdersApi::new(config).unwrap();
        assert_eq!(api.orders_url("/get"), "https://orders.example.com/get");
        assert_eq!(api.messages_url("/messages/9"), "https://messages.example.com/messages/9");
    }

    #[test]
    fn delete_plan_tries_hard_deletes_before_status_patches() {
        let api = OrdersApi::new(OrdersConfig::new("https://orders.example.com", "https://orders.example.com")).unwrap();
        let plan = api.delete_plan(OrderId(12));
        let outcomes = plan.iter().map(|a| a.outcome).collect::<Vec<_>>();
        assert_eq!(outcomes, vec![
            DeleteOutcome::HardDeleteOrdersPath,
            DeleteOutcome::HardDeleteDeletePath,
            DeleteOutcome::HardDeleteQueryParam,
            DeleteOutcome::StatusPatchedDeleted,
            DeleteOutcome::StatusPatchedCancelled,
        ]);
        assert_eq!(plan[0].url, "https://orders.example.com/orders/12");
        assert_eq!(plan[2].url, "https://orders.example.com/delete?id=12");
        assert_eq!(plan[3].url, "https://orders.example.com/status/12");
        assert_eq!(plan[3].body, Some(serde_json::json!({ "status": "DELETED" })));
        assert_eq!(plan[4].body, Some(serde_json::json!({ "status": "CANCELLED" })));
    }

    fn test_api() -> OrdersApi {
        OrdersApi::new(OrdersConfig::new("https://orders.example.com", "https://orders.example.com")).unwrap()
    }

    // fail,fail,fail,fail,success: the CANCELLED status patch is the one reported.
    #[tokio::test]
    async fn last_strategy_wins_when_the_first_four_fail() {
        let plan = test_api().delete_plan(OrderId(5));
        let mut calls = 0;
        let outcome = walk_delete_plan(plan, |_| {
            calls += 1;
            let ok = calls == 5;
            async move { ok }
        })
        .await
        .unwrap();
        assert_eq!(outcome, DeleteOutcome::StatusPatchedCancelled);
        assert_eq!(calls, 5);
    }

    #[tokio::test]
    async fn exhausted_plan_is_no_delete_endpoint() {
        let plan = test_api().delete_plan(OrderId(5));
        let err = walk_delete_plan(plan, |_| async { false }).await.unwrap_err();
        assert!(matches!(err, OrdersApiError::NoDeleteEndpoint));
        let plan = test_api().delete_plan(OrderId(5));
        let outcome = walk_delete_plan(plan, |_| async { true }).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::HardDeleteOrdersPath);
    }
}
