use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use dotenvy::dotenv;

mod api;
mod board;
mod config;
mod docs;
mod grid;
mod model;
mod routes;
mod state;
mod utils;

use config::Config;
use state::AppState;

use crate::docs::ApiDoc;
use crate::utils::{seed, summary_cache};
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "CRM attendance service"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let state = Data::new(AppState::new());

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    if config.seed_demo {
        let seed_state = state.clone();
        let policy = config.overtime_policy();
        actix_web::rt::spawn(async move {
            if let Err(e) = seed::seed_demo_data(&seed_state, policy) {
                eprintln!("Failed to seed demo data: {:?}", e);
                return;
            }
            summary_cache::warmup(&seed_state).await;
        });
    }

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(state.clone())
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await
}
