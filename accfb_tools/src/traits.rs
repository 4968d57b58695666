use crate::{
    data_objects::{DeleteOutcome, Order, OrderId},
    OrdersApiError,
};

/// The contract between the storefront and the external orders backend.
///
/// [`crate::OrdersApi`] is the production implementation over REST. The server's routes
/// and the notification worker are generic over this trait so they can run against a
/// mock in tests.
#[allow(async_fn_in_trait)]
pub trait OrdersGateway {
    /// Retrieve the full current order list, unfiltered.
    async fn fetch_all(&self) -> Result<Vec<Order>, OrdersApiError>;

    /// Remove the order from circulation. Tries each delete strategy in a fixed order
    /// and reports the first that succeeds; exhausting them all yields
    /// [`OrdersApiError::NoDeleteEndpoint`].
    async fn soft_delete(&self, id: OrderId) -> Result<DeleteOutcome, OrdersApiError>;

    /// Replace the order's free-text admin note (`detels`) and return the updated
    /// record. Non-success responses surface as [`OrdersApiError::QueryError`] with the
    /// backend's status and body.
    async fn save_note(&self, id: OrderId, text: &str) -> Result<Order, OrdersApiError>;

    /// Patch the order's status field.
    async fn patch_status(&self, id: OrderId, status: &str) -> Result<(), OrdersApiError>;
}
