use actix_governor::Governor;
use actix_web::middleware::{Condition, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

use presensi::config::Config;
use presensi::docs;
use presensi::routes;
use presensi::store::AttendanceStore;

use tracing::info;
use tracing_appender::rolling;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Presensi service is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "presensi.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(
        addr = %config.server_addr,
        daily_rule = config.enforce_daily_rule,
        rate_per_min = config.rate_presensi_per_min,
        "Server starting..."
    );

    // one store for every worker, dropped when the server stops
    let store = Data::new(AttendanceStore::new(config.enforce_daily_rule));
    let limiter = routes::build_limiter(config.rate_presensi_per_min)?;
    let rate_limited = config.rate_limit_enabled();
    let server_addr = config.server_addr.clone();
    let app_store = store.clone();
    let api_doc = docs::openapi_for(&config.api_prefix);

    HttpServer::new(move || {
        App::new()
            .wrap(Condition::new(rate_limited, Governor::new(&limiter)))
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", api_doc.clone()),
            )
            .app_data(app_store.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {}", server_addr))?
    .run()
    .await?;

    info!(records = store.len().unwrap_or_default(), "Server stopped, attendance log discarded");
    Ok(())
}
