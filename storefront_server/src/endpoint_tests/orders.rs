use accfb_tools::{Order, OrderId, OrdersApiError};
use actix_web::{http::StatusCode, web, web::ServiceConfig};
use pgs_common::Baht;

use super::helpers::{delete_request, get_request, put_request};
use crate::{
    endpoint_tests::mocks::MockOrdersBackend,
    mailer::{MailConfig, Mailer},
    routes::{DeleteOrderRoute, MyOrdersRoute, OrdersListRoute, SaveOrderMessageRoute},
};

#[actix_web::test]
async fn order_list_hides_deleted_and_cancelled_rows() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/orders", configure_list).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<Order> = serde_json::from_str(&body).expect("Expected an order list");
    let ids = orders.iter().map(|o| o.id).collect::<Vec<OrderId>>();
    assert_eq!(ids, vec![OrderId(1), OrderId(3)]);
}

#[actix_web::test]
async fn my_orders_requires_an_email() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/orders/mine", configure_list).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("'email' is required"), "body was {body}");
}

#[actix_web::test]
async fn my_orders_matches_email_case_insensitively() {
    let _ = env_logger::try_init().ok();
    let (status, body) =
        get_request("/orders/mine?email=ALICE%40example.com", configure_list).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<Order> = serde_json::from_str(&body).expect("Expected an order list");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, OrderId(1));
}

#[actix_web::test]
async fn delete_reports_the_winning_strategy() {
    let _ = env_logger::try_init().ok();
    let (status, body) = delete_request("/orders/3", configure_delete_ok).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("status patched to DELETED"), "body was {body}");
}

#[actix_web::test]
async fn exhausted_delete_chain_is_a_404() {
    let _ = env_logger::try_init().ok();
    let (status, body) = delete_request("/orders/3", configure_delete_exhausted).await.expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("No delete-capable endpoint"), "body was {body}");
}

#[actix_web::test]
async fn empty_admin_message_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "detels": "   " });
    let (status, body) = put_request("/orders/1/message", body, configure_save_note).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("'detels' must not be empty"), "body was {body}");
}

#[actix_web::test]
async fn saved_message_reports_skipped_email() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "detels": "จัดส่งแล้วครับ" });
    let (status, body) = put_request("/orders/1/message", body, configure_save_note).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""success":true"#), "body was {body}");
    // No SMTP configured in this test, so the follow-up email is skipped.
    assert!(body.contains(r#""email_sent":false"#), "body was {body}");
}

#[actix_web::test]
async fn backend_rejection_surfaces_as_bad_gateway() {
    let _ = env_logger::try_init().ok();
    let body = serde_json::json!({ "detels": "note" });
    let (status, body) = put_request("/orders/999/message", body, configure_save_note_404).await.expect("Request failed");
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("404"), "body was {body}");
}

fn configure_list(cfg: &mut ServiceConfig) {
    let mut backend = MockOrdersBackend::new();
    backend.expect_fetch_all().returning(|| Ok(order_fixtures()));
    cfg.service(MyOrdersRoute::<MockOrdersBackend>::new())
        .service(OrdersListRoute::<MockOrdersBackend>::new())
        .app_data(web::Data::new(backend));
}

fn configure_delete_ok(cfg: &mut ServiceConfig) {
    let mut backend = MockOrdersBackend::new();
    backend.expect_soft_delete().returning(|_| Ok(accfb_tools::DeleteOutcome::StatusPatchedDeleted));
    cfg.service(DeleteOrderRoute::<MockOrdersBackend>::new()).app_data(web::Data::new(backend));
}

fn configure_delete_exhausted(cfg: &mut ServiceConfig) {
    let mut backend = MockOrdersBackend::new();
    backend.expect_soft_delete().returning(|_| Err(OrdersApiError::NoDeleteEndpoint));
    cfg.service(DeleteOrderRoute::<MockOrdersBackend>::new()).app_data(web::Data::new(backend));
}

fn configure_save_note(cfg: &mut ServiceConfig) {
    let mut backend = MockOrdersBackend::new();
    backend.expect_save_note().returning(|id, text| {
        let mut order = Order::new(id.value());
        order.detels = Some(text.to_string());
        order.buyer_email = Some("alice@example.com".to_string());
        Ok(order)
    });
    cfg.service(SaveOrderMessageRoute::<MockOrdersBackend>::new())
        .app_data(web::Data::new(backend))
        .app_data(web::Data::new(Mailer::new(MailConfig::default())));
}

fn configure_save_note_404(cfg: &mut ServiceConfig) {
    let mut backend = MockOrdersBackend::new();
    backend
        .expect_save_note()
        .returning(|_, _| Err(OrdersApiError::QueryError { status: 404, message: "order not found".to_string() }));
    cfg.service(SaveOrderMessageRoute::<MockOrdersBackend>::new())
        .app_data(web::Data::new(backend))
        .app_data(web::Data::new(Mailer::new(MailConfig::default())));
}

// Mock response to `fetch_all`: one live order per buyer plus a soft-deleted one.
fn order_fixtures() -> Vec<Order> {
    let mut alice = Order::new(1);
    alice.buyer_email = Some("alice@example.com".to_string());
    alice.status = Some("CONFIRMED".to_string());
    alice.total_price = Some(Baht::from_baht(350));
    let mut deleted = Order::new(2);
    deleted.status = Some("DELETED".to_string());
    let mut bob = Order::new(3);
    bob.buyer_email = Some("bob@example.com".to_string());
    bob.status = Some("PENDING_PAYMENT".to_string());
    vec![alice, deleted, bob]
}
