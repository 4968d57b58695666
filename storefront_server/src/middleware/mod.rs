mod hmac;

pub use hmac::{SIGNATURE_HEADER, SignatureMiddlewareFactory, SignatureMiddlewareService};
