use std::time::Duration;

use accfb_tools::OrdersApi;
use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::line::LineApi,
    mailer::Mailer,
    middleware::SignatureMiddlewareFactory,
    notify_worker::{start_notify_worker, LineNotifier},
    relay_routes::{email_send, line_push, line_webhook},
    routes::{health, products, DeleteOrderRoute, MyOrdersRoute, OrdersListRoute, SaveOrderMessageRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let worker = if config.enable_notify_worker {
        let api = OrdersApi::new(config.orders_config.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        let line = LineApi::new(config.line_config.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Some(start_notify_worker(api, LineNotifier::new(line), config.poll_interval))
    } else {
        info!("🛎️ Notification worker is disabled by configuration");
        None
    };
    let srv = create_server_instance(config)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    if let Some(worker) = worker {
        worker.abort();
    }
    result
}

pub fn create_server_instance(config: ServerConfig) -> Result<Server, ServerError> {
    let orders_api =
        OrdersApi::new(config.orders_config.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let line_api = LineApi::new(config.line_config.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let mailer = Mailer::new(config.mail_config.clone());
    let channel_secret = config.line_config.channel_secret.clone();
    let srv = HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("pgs::access_log"))
            .app_data(web::Data::new(orders_api.clone()))
            .app_data(web::Data::new(line_api.clone()))
            .app_data(web::Data::new(mailer.clone()));
        let api_scope = web::scope("/api")
            .service(products)
            .service(MyOrdersRoute::<OrdersApi>::new())
            .service(OrdersListRoute::<OrdersApi>::new())
            .service(DeleteOrderRoute::<OrdersApi>::new())
            .service(SaveOrderMessageRoute::<OrdersApi>::new())
            .service(email_send)
            .service(web::scope("/line").service(line_push));
        // The inbound webhook sits on its own scope so the signature check only runs
        // against provider deliveries.
        let webhook_scope =
            web::scope("/line").wrap(SignatureMiddlewareFactory::new(channel_secret.clone())).service(line_webhook);
        app.service(health).service(api_scope).service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
