use accfb_tools::OrdersApiError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;

use crate::{integrations::line::LineApiError, mailer::MailerError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Missing required field. {0}")]
    ValidationError(String),
    #[error("The orders backend rejected the request. Error {status}. {message}")]
    GatewayError { status: u16, message: String },
    #[error("Could not reach the orders backend. {0}")]
    GatewayUnreachable(String),
    #[error("No delete-capable endpoint was found for this order.")]
    NoDeleteEndpoint,
    #[error("The messaging provider rejected the request. Error {status}. {body}")]
    RelayFailure { status: u16, body: String },
    #[error("No push destination given and no admin recipients configured.")]
    NoDestination,
    #[error("Authentication Error. {0}")]
    AuthenticationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::NoDestination => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::FORBIDDEN,
            Self::NoDeleteEndpoint => StatusCode::NOT_FOUND,
            Self::GatewayError { .. } => StatusCode::BAD_GATEWAY,
            Self::GatewayUnreachable(_) => StatusCode::BAD_GATEWAY,
            Self::RelayFailure { .. } => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<OrdersApiError> for ServerError {
    fn from(e: OrdersApiError) -> Self {
        match e {
            OrdersApiError::QueryError { status, message } => Self::GatewayError { status, message },
            OrdersApiError::NoDeleteEndpoint => Self::NoDeleteEndpoint,
            OrdersApiError::Initialization(s) => Self::InitializeError(s),
            OrdersApiError::RestRequestError(s) |
            OrdersApiError::RestResponseError(s) |
            OrdersApiError::JsonError(s) => Self::GatewayUnreachable(s),
        }
    }
}

impl From<LineApiError> for ServerError {
    fn from(e: LineApiError) -> Self {
        match e {
            LineApiError::NoDestination => Self::NoDestination,
            LineApiError::Initialization(s) => Self::InitializeError(s),
            LineApiError::TransportError(s) => Self::RelayFailure { status: 0, body: s },
        }
    }
}

impl From<MailerError> for ServerError {
    fn from(e: MailerError) -> Self {
        match e {
            MailerError::Validation(s) => Self::ValidationError(s),
            MailerError::Config(s) => Self::ConfigurationError(s),
            MailerError::Transport(s) => Self::RelayFailure { status: 0, body: s },
        }
    }
}

#[cfg(test)]
mod test {
    use accfb_tools::OrdersApiError;
    use actix_web::{error::ResponseError, http::StatusCode};

    use super::ServerError;

    #[test]
    fn gateway_errors_keep_the_backend_status() {
        let e = ServerError::from(OrdersApiError::QueryError { status: 404, message: "no such order".into() });
        match &e {
            ServerError::GatewayError { status, message } => {
                assert_eq!(*status, 404);
                assert_eq!(message, "no such order");
            },
            other => panic!("unexpected variant: {other:?}"),
        }
        assert_eq!(e.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn exhausted_delete_chain_maps_to_not_found() {
        let e = ServerError::from(OrdersApiError::NoDeleteEndpoint);
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
    }
}
