use actix_web::{web, App, HttpServer};
use medrush_service::{config::Config, error::AppError, logging, routes, state::AppState};

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    logging::init_tracing();

    let config = Config::from_env()?;
    let bind_addr = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(config);

    tracing::info!(%bind_addr, "starting medrush dispatch service");

    HttpServer::new(move || {
        let cors = actix_cors::Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .service(routes::stream::stream)
            .service(routes::stream::stream_status)
            .service(routes::notify::notify)
            .service(routes::hospitals::list_hospitals)
            .service(routes::hospitals::get_hospital)
            .service(routes::devices::esp32)
            .service(routes::devices::blynk)
            .service(routes::devices::mqtt)
            .service(routes::devices::websocket_bridge)
            .route("/health", web::get().to(|| async { "OK" }))
    })
    .bind(&bind_addr)
    .map_err(|e| AppError::StartServer(format!("bind {bind_addr}: {e}")))?
    .run()
    .await
    .map_err(|e| AppError::StartServer(format!("run server: {e}")))
}
