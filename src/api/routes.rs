//! Route table.

use actix_web::web;

use super::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health)).service(
        web::scope("/api")
            .route("/predict", web::post().to(handlers::predict))
            .route("/records", web::get().to(handlers::list_records))
            .route("/records/{id}", web::get().to(handlers::get_record))
            .route("/records/{id}", web::delete().to(handlers::delete_record)),
    );
}
