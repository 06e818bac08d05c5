use crate::state::RelayState;
use actix_web::{web, HttpResponse, Responder};
use log::{info, warn};

/// Actix handler for `GET /businesses`.
///
/// # Returns
/// - `200 OK` with the JSON array of records.
/// - `200 OK` with `null` when the store could not be read; the failure is
///   logged here and the client treats it as an empty directory.
pub async fn process(state: web::Data<RelayState>) -> impl Responder {
    match state.store.fetch_all().await {
        Ok(records) => {
            info!("GET /businesses -> {} records", records.len());
            HttpResponse::Ok().json(records)
        }
        Err(err) => {
            warn!("GET /businesses: store read failed: {err}");
            HttpResponse::Ok().json(serde_json::Value::Null)
        }
    }
}
