use accfb_tools::Order;
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Base64-encoded HMAC-SHA256 over the raw request body, as LINE computes it for the
/// `X-Line-Signature` header.
pub fn calculate_hmac(secret: &str, data: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(data);
    base64::encode(mac.finalize().into_bytes())
}

/// The admin-facing alert text for a newly arrived order. Used for the LINE push and as
/// the plain-text flavour of notification emails.
pub fn build_order_notification(order: &Order) -> String {
    let status = order.status_uppercase();
    let status = if status.is_empty() { "-".to_string() } else { status };
    let mut lines = vec![
        "🛎️ มีคำสั่งซื้อใหม่เข้ามา".to_string(),
        format!("📦 สินค้า: {}", order.product_name.as_deref().unwrap_or("-")),
        format!("🔢 จำนวน: {}", order.qty.map(|q| q.to_string()).unwrap_or_else(|| "-".to_string())),
        format!("💰 รวม: {} บาท", order.total_price.map(|p| p.to_string()).unwrap_or_else(|| "0".to_string())),
        format!("👤 ผู้สั่งซื้อ: {}", order.buyer_email.as_deref().unwrap_or("-")),
        format!(
            "🕒 เวลา: {}",
            order.created_at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()).unwrap_or_else(|| "-".to_string())
        ),
        format!("🏷️ สถานะ: {status}"),
    ];
    if let Some(order_no) = order.order_no.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!("#ออเดอร์: {order_no}"));
    }
    lines.join("\n")
}

/// HTML body of the email sent to a buyer when the admin saves a reply on their order.
pub fn build_admin_reply_html(order: &Order, admin_text: &str) -> String {
    let created =
        order.created_at.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string()).unwrap_or_else(|| "-".to_string());
    let total = order.total_price.map(|p| p.to_string()).unwrap_or_else(|| "0".to_string());
    let order_no_row = order
        .order_no
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|no| {
            format!(
                r#"<tr><td style="padding:6px 0;color:#666">เลขออเดอร์</td><td>{}</td></tr>"#,
                escape_html(no)
            )
        })
        .unwrap_or_default();
    format!(
        r#"<div style="font-family:system-ui,-apple-system,Segoe UI,Roboto,Helvetica,Arial,sans-serif;line-height:1.6;color:#222">
  <h2 style="margin:0 0 12px">ข้อความจากแอดมิน (PG Phone)</h2>
  <p style="margin:0 0 16px">เกี่ยวกับคำสั่งซื้อของคุณ</p>
  <table style="border-collapse:collapse;width:100%;max-width:600px;font-size:14px">
    <tr><td style="padding:6px 0;width:140px;color:#666">สินค้า</td><td>{product}</td></tr>
    <tr><td style="padding:6px 0;color:#666">จำนวน</td><td>{qty}</td></tr>
    <tr><td style="padding:6px 0;color:#666">ยอดรวม</td><td>{total} บาท</td></tr>
    <tr><td style="padding:6px 0;color:#666">เวลา</td><td>{created}</td></tr>
    {order_no_row}
    <tr><td style="padding:6px 0;color:#666;vertical-align:top">ข้อความจากแอดมิน</td>
        <td><pre style="white-space:pre-wrap;background:#f7f7f8;border:1px solid #eee;border-radius:6px;padding:10px;margin:6px 0 0">{admin_text}</pre></td></tr>
  </table>
  <p style="margin:16px 0 0;color:#666">หากมีข้อสงสัย ตอบกลับอีเมลฉบับนี้ได้ทันที</p>
</div>"#,
        product = escape_html(order.product_name.as_deref().unwrap_or("-")),
        qty = order.qty.map(|q| q.to_string()).unwrap_or_else(|| "-".to_string()),
        admin_text = escape_html(admin_text),
    )
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
