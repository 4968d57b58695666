//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers that talk to the orders backend are generic over [`OrdersGateway`] so the
//! endpoint tests can run them against a mock backend.

use accfb_tools::{helpers::filter_visible, Order, OrderId, OrdersGateway};
use actix_web::{get, web, HttpResponse, Responder};
use log::*;

use crate::{
    data_objects::{JsonResponse, MyOrdersQuery, NoteSavedResponse, SaveMessageParams},
    errors::ServerError,
    helpers::build_admin_reply_html,
    mailer::{EmailRequest, Mailer},
    products::catalog,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Catalog  ----------------------------------------------------
#[get("/products")]
pub async fn products() -> impl Responder {
    trace!("💻️ GET product catalog");
    HttpResponse::Ok().json(catalog())
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(orders_list => Get "/orders" impl OrdersGateway);
/// The admin table's data source: the full order list with soft-deleted and cancelled
/// rows already filtered out.
pub async fn orders_list<B: OrdersGateway>(api: web::Data<B>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET all orders");
    let orders = api.fetch_all().await?;
    let visible = filter_visible(orders);
    debug!("💻️ Returning {} visible orders", visible.len());
    Ok(HttpResponse::Ok().json(visible))
}

route!(my_orders => Get "/orders/mine" impl OrdersGateway);
/// The waiting page's data source: the caller's own orders, newest first as served by
/// the backend.
pub async fn my_orders<B: OrdersGateway>(
    query: web::Query<MyOrdersQuery>,
    api: web::Data<B>,
) -> Result<HttpResponse, ServerError> {
    let email = query.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ServerError::ValidationError("'email' is required".to_string()));
    }
    trace!("💻️ GET orders for one buyer");
    let orders = api.fetch_all().await?;
    let mine = filter_visible(orders)
        .into_iter()
        .filter(|o| o.buyer_email.as_deref().map(|e| e.trim().to_lowercase()) == Some(email.clone()))
        .collect::<Vec<Order>>();
    Ok(HttpResponse::Ok().json(mine))
}

route!(delete_order => Delete "/orders/{id}" impl OrdersGateway);
/// Remove an order via the delete fallback chain. An exhausted chain surfaces as an
/// error to the admin; deletes must never fail silently.
pub async fn delete_order<B: OrdersGateway>(
    path: web::Path<i64>,
    api: web::Data<B>,
) -> Result<HttpResponse, ServerError> {
    let id = OrderId(path.into_inner());
    debug!("💻️ DELETE order {id}");
    let outcome = api.soft_delete(id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(outcome)))
}

route!(save_order_message => Put "/orders/{id}/message" impl OrdersGateway);
/// Save the admin's note into the order's `detels` field, then email the buyer a copy
/// when the order carries an email address. The email is best-effort: a failed send is
/// reported in the response but does not undo or fail the note save.
pub async fn save_order_message<B: OrdersGateway>(
    path: web::Path<i64>,
    body: web::Json<SaveMessageParams>,
    api: web::Data<B>,
    mailer: web::Data<Mailer>,
) -> Result<HttpResponse, ServerError> {
    let id = OrderId(path.into_inner());
    let text = body.into_inner().detels.trim().to_string();
    if text.is_empty() {
        return Err(ServerError::ValidationError("'detels' must not be empty".to_string()));
    }
    debug!("💻️ PUT admin message for order {id}");
    let updated = api.save_note(id, &text).await?;
    let email_sent = send_admin_reply_email(&updated, &text, mailer.as_ref()).await;
    Ok(HttpResponse::Ok().json(NoteSavedResponse {
        success: true,
        message: format!("Saved admin message for order {id}"),
        email_sent,
    }))
}

async fn send_admin_reply_email(order: &Order, admin_text: &str, mailer: &Mailer) -> bool {
    let to = match order.buyer_email.as_deref().filter(|e| !e.trim().is_empty()) {
        Some(to) => to.to_string(),
        None => {
            debug!("💻️ Order {} has no buyer email, skipping the reply email", order.id);
            return false;
        },
    };
    let subject = match order.order_no.as_deref().filter(|s| !s.is_empty()) {
        Some(no) => format!("ข้อความจากแอดมินเกี่ยวกับคำสั่งซื้อของคุณ (#{no})"),
        None => "ข้อความจากแอดมินเกี่ยวกับคำสั่งซื้อของคุณ".to_string(),
    };
    let request = EmailRequest {
        to: Some(to),
        subject: Some(subject),
        text: Some(admin_text.to_string()),
        html: Some(build_admin_reply_html(order, admin_text)),
    };
    match mailer.send(&request).await {
        Ok(receipt) => {
            info!("💻️ Buyer notified by email for order {}. {receipt}", order.id);
            true
        },
        Err(e) => {
            warn!("💻️ Could not email the buyer for order {}: {e}", order.id);
            false
        },
    }
}
