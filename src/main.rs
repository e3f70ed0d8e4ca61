//! Diabetes prediction service
//!
//! Main entry point: load configuration, deserialize the model artifact,
//! connect the record store and start the HTTP server.

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use diapredict::error::Error;
use diapredict::model::Predictor;
use diapredict::store::RecordStore;
use diapredict::{api, config};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::load_config().context("failed to load configuration")?;

    // Model load failure is fatal; the service must not start without it.
    let predictor =
        Predictor::load(&config.model.path).context("failed to load model artifact")?;
    info!(version = predictor.version(), "model artifact loaded");

    let store = RecordStore::connect(&config.store)
        .await
        .context("failed to connect record store")?;

    let predictor = web::Data::new(predictor);
    let store = web::Data::new(store);

    let bind_addr = (config.server.host.clone(), config.server.port);
    info!(host = %config.server.host, port = config.server.port, "starting server");

    HttpServer::new(move || {
        App::new()
            .app_data(predictor.clone())
            .app_data(store.clone())
            // Undecodable request bodies get the same error shape as
            // validation failures.
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                Error::Validation(err.to_string()).into()
            }))
            // The browser frontend is served from a different origin.
            .wrap(Cors::permissive())
            .wrap(TracingLogger::default())
            .configure(api::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
