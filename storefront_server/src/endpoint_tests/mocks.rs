use accfb_tools::{DeleteOutcome, Order, OrderId, OrdersApiError, OrdersGateway};
use mockall::mock;

mock! {
    pub OrdersBackend {}
    impl OrdersGateway for OrdersBackend {
        async fn fetch_all(&self) -> Result<Vec<Order>, OrdersApiError>;
        async fn soft_delete(&self, id: OrderId) -> Result<DeleteOutcome, OrdersApiError>;
        async fn save_note(&self, id: OrderId, text: &str) -> Result<Order, OrdersApiError>;
        async fn patch_status(&self, id: OrderId, status: &str) -> Result<(), OrdersApiError>;
    }
}
