use actix_web::{http::StatusCode, web, web::ServiceConfig};

use super::helpers::post_request;
use crate::{
    integrations::line::{LineApi, LineConfig},
    mailer::{MailConfig, Mailer},
    relay_routes::{email_send, line_push},
};

#[actix_web::test]
async fn email_without_recipient_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "subject": "hi", "text": "hello" });
    let (status, body) = post_request("/email/send", body, configure_email).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("'to' is required"), "body was {body}");
}

#[actix_web::test]
async fn email_without_smtp_settings_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "to": "buyer@example.com", "subject": "hi", "text": "hello" });
    let (status, body) = post_request("/email/send", body, configure_email).await.expect("Request failed");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("SMTP"), "body was {body}");
}

#[actix_web::test]
async fn push_without_destination_or_admins_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "text": "new order" });
    let (status, body) = post_request("/push", body, configure_push).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("No push destination"), "body was {body}");
}

fn configure_email(cfg: &mut ServiceConfig) {
    cfg.service(email_send).app_data(web::Data::new(Mailer::new(MailConfig::default())));
}

fn configure_push(cfg: &mut ServiceConfig) {
    let line = LineApi::new(LineConfig::default()).expect("LINE client should build");
    cfg.service(line_push).app_data(web::Data::new(line));
}
