//! Webhook signature middleware.
//!
//! LINE signs every webhook delivery with HMAC-SHA256 over the raw request body, keyed
//! by the channel secret and base64 encoded, carried in the `x-line-signature` header.
//! This middleware recomputes the signature, rejects mismatches before the handler runs,
//! and replays the consumed body so the handler can still deserialize it.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorBadRequest, ErrorForbidden},
    web,
    Error,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};
use pgs_common::Secret;

use crate::helpers::calculate_hmac;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

pub struct SignatureMiddlewareFactory {
    secret: Secret<String>,
}

impl SignatureMiddlewareFactory {
    pub fn new(secret: Secret<String>) -> Self {
        Self { secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SignatureMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = SignatureMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SignatureMiddlewareService { secret: self.secret.clone(), service: Rc::new(service) }))
    }
}

pub struct SignatureMiddlewareService<S> {
    secret: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SignatureMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.secret.reveal().clone();
        Box::pin(async move {
            trace!("🔐️ Checking webhook signature");
            let body = req.extract::<web::Bytes>().await.map_err(|e| {
                warn!("🔐️ Failed to read webhook body: {e:?}");
                ErrorBadRequest("Failed to read request body.")
            })?;
            let expected = calculate_hmac(&secret, body.as_ref());
            let provided = req
                .headers()
                .get(SIGNATURE_HEADER)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    warn!("🔐️ No webhook signature header present. Denying access.");
                    ErrorForbidden("Bad signature")
                })?;
            if provided == expected {
                trace!("🔐️ Webhook signature verified ✅️");
                req.set_payload(bytes_to_payload(body));
                service.call(req).await
            } else {
                warn!("🔐️ Webhook signature mismatch. Denying access.");
                Err(ErrorForbidden("Bad signature"))
            }
        })
    }
}

fn bytes_to_payload(buf: web::Bytes) -> Payload {
    let (_, mut pl) = h1::Payload::create(true);
    pl.unread_data(buf);
    Payload::from(pl)
}
