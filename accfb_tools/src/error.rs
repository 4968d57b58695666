use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST request: {0}")]
    RestRequestError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The orders backend exposes no working delete endpoint and no status patch succeeded")]
    NoDeleteEndpoint,
}
