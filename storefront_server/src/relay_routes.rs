//----------------------------------------------   LINE relays  ----------------------------------------------------

use actix_web::{post, web, HttpResponse};
use log::*;

use crate::{
    data_objects::{JsonResponse, PushRequest, WebhookEvent, WebhookPayload},
    errors::ServerError,
    integrations::line::{build_messages, LineApi, MessageObject},
    mailer::{EmailRequest, Mailer},
};

/// Keywords (case-insensitive, Thai or English) that make the webhook echo the sender's
/// ids back instead of the help text.
const REGISTER_KEYWORDS: [&str; 2] = ["register", "ลงทะเบียน"];

#[post("/push")]
pub async fn line_push(body: web::Json<PushRequest>, line: web::Data<LineApi>) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("💬️ POST LINE push (broadcast: {})", request.broadcast);
    let messages = build_messages(request.text.as_deref(), request.image_url.as_deref());
    let to = request.to.map(|t| t.into_vec());
    let outcome = line.push(request.broadcast, to, messages).await?;
    // Provider-side rejections are part of the result, not an error; the caller checks
    // the `ok` flag.
    let response = if outcome.ok { HttpResponse::Ok().json(outcome) } else { HttpResponse::BadGateway().json(outcome) };
    Ok(response)
}

#[post("/email/send")]
pub async fn email_send(body: web::Json<EmailRequest>, mailer: web::Data<Mailer>) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    debug!("📧️ POST email send");
    let receipt = mailer.send(&request).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "receipt": receipt })))
}

/// Inbound LINE webhook. Signature verification happens in
/// [`crate::middleware::SignatureMiddlewareFactory`] before this handler runs, so every
/// event seen here is authenticated. Always answers 200 on verified deliveries;
/// per-event reply failures are logged, never propagated, so one bad event cannot make
/// LINE retry the whole delivery.
#[post("/webhook")]
pub async fn line_webhook(body: web::Json<WebhookPayload>, line: web::Data<LineApi>) -> HttpResponse {
    let payload = body.into_inner();
    debug!("💬️ Webhook delivery with {} event(s)", payload.events.len());
    for event in &payload.events {
        handle_webhook_event(event, line.as_ref()).await;
    }
    HttpResponse::Ok().json(JsonResponse::success("ok"))
}

async fn handle_webhook_event(event: &WebhookEvent, line: &LineApi) {
    let source = event.source.clone().unwrap_or_default();
    trace!(
        "💬️ Event {} from {} source",
        event.event_type,
        source.source_type.as_deref().unwrap_or("unknown")
    );
    if event.event_type == "join" && source.source_type.as_deref() == Some("group") {
        info!("💬️ Joined group {}", source.group_id.as_deref().unwrap_or("-"));
        return;
    }
    let (reply_token, text) = match (&event.reply_token, &event.message) {
        (Some(token), Some(message)) if message.message_type == "text" => {
            (token.as_str(), message.text.as_deref().unwrap_or_default())
        },
        _ => return,
    };
    let reply = if is_register_keyword(text) {
        let mut lines = vec!["บันทึก ID นี้ไว้ใช้ push:".to_string()];
        if let Some(user_id) = &source.user_id {
            lines.push(format!("userId: {user_id}"));
        }
        if let Some(group_id) = &source.group_id {
            lines.push(format!("groupId: {group_id}"));
        }
        if let Some(room_id) = &source.room_id {
            lines.push(format!("roomId: {room_id}"));
        }
        lines.join("\n")
    } else {
        "พิมพ์ register เพื่อรับ userId/groupId สำหรับตั้งค่า".to_string()
    };
    match line.reply(reply_token, vec![MessageObject::text(reply)]).await {
        Ok(outcome) if !outcome.ok => warn!("💬️ LINE reply rejected: {} {}", outcome.status, outcome.body),
        Ok(_) => {},
        Err(e) => warn!("💬️ Could not send LINE reply: {e}"),
    }
}

fn is_register_keyword(text: &str) -> bool {
    let text = text.trim().to_lowercase();
    REGISTER_KEYWORDS.iter().any(|k| *k == text)
}
