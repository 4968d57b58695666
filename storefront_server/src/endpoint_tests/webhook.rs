use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, App};
use pgs_common::Secret;

use crate::{
    helpers::calculate_hmac,
    integrations::line::{LineApi, LineConfig},
    middleware::{SIGNATURE_HEADER, SignatureMiddlewareFactory},
    relay_routes::line_webhook,
};

const CHANNEL_SECRET: &str = "test-channel-secret";
const EMPTY_DELIVERY: &str = r#"{"events":[]}"#;

#[actix_web::test]
async fn verified_delivery_is_acknowledged() {
    let _ = env_logger::try_init().ok();
    let signature = calculate_hmac(CHANNEL_SECRET, EMPTY_DELIVERY.as_bytes());
    let (status, body) = webhook_request(EMPTY_DELIVERY, Some(&signature)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""success":true"#), "body was {body}");
}

#[actix_web::test]
async fn tampered_body_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let signature = calculate_hmac(CHANNEL_SECRET, EMPTY_DELIVERY.as_bytes());
    let (status, body) = webhook_request(r#"{"events":[{"type":"join"}]}"#, Some(&signature)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "Bad signature");
}

#[actix_web::test]
async fn missing_signature_header_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let (status, body) = webhook_request(EMPTY_DELIVERY, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "Bad signature");
}

// Middleware rejections come back as service errors, so render those into a response to
// get at the status code.
async fn webhook_request(payload: &str, signature: Option<&str>) -> (StatusCode, String) {
    let config = LineConfig { channel_secret: Secret::new(CHANNEL_SECRET.to_string()), ..LineConfig::default() };
    let secret = config.channel_secret.clone();
    let line = LineApi::new(config).expect("LINE client should build");
    let app = App::new()
        .wrap(SignatureMiddlewareFactory::new(secret))
        .service(line_webhook)
        .app_data(web::Data::new(line));
    let service = test::init_service(app).await;
    let mut req = TestRequest::post()
        .uri("/webhook")
        .insert_header(("content-type", "application/json"))
        .set_payload(payload.to_string());
    if let Some(signature) = signature {
        req = req.insert_header((SIGNATURE_HEADER, signature));
    }
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let (_, res) = res.into_parts();
            let status = res.status();
            let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
            (status, body)
        },
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
            (status, body)
        },
    }
}
