//! Request handlers: normalize, predict, persist, respond.
//!
//! Every failure converts to `{"error": msg}` via [`crate::error::Error`]'s
//! `ResponseError` impl; a failed prediction request stores nothing.

use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use tracing::info;

use crate::error::Result;
use crate::model::Predictor;
use crate::models::NewPatientRecord;
use crate::normalize::normalize;
use crate::store::RecordStore;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub async fn predict(
    body: web::Json<Value>,
    predictor: web::Data<Predictor>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse> {
    let features = normalize(&body)?;
    let outcome = predictor.predict(&features)?;

    let record = NewPatientRecord::from_prediction(&features, outcome);
    let id = store.create(&record).await?;

    info!(record_id = %id, result = %outcome, "prediction stored");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Prediction saved successfully",
        "result": outcome.as_str(),
        "recordId": id,
    })))
}

pub async fn list_records(store: web::Data<RecordStore>) -> Result<HttpResponse> {
    let records = store.list().await?;
    Ok(HttpResponse::Ok().json(records))
}

pub async fn get_record(
    path: web::Path<String>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse> {
    let record = store.get(&path).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn delete_record(
    path: web::Path<String>,
    store: web::Data<RecordStore>,
) -> Result<HttpResponse> {
    store.delete(&path).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Record deleted successfully" })))
}
