use crate::state::RelayState;
use actix_web::{web, HttpResponse, Responder};
use common::model::NewBusinessRecord;
use common::requests::InsertResponse;
use common::store::StoreError;
use log::{error, info};

/// Actix handler for `POST /businesses`.
///
/// The body is read as raw bytes so that a payload which is not a
/// new-business record still gets the `{ data, error }` envelope instead of
/// Actix's default plain-text 400.
///
/// # Returns
/// `200 OK` with an `InsertResponse` in every case.
pub async fn process(state: web::Data<RelayState>, body: web::Bytes) -> impl Responder {
    let record: NewBusinessRecord = match serde_json::from_slice(&body) {
        Ok(record) => record,
        Err(err) => {
            let err = StoreError::validation(format!("malformed business payload: {err}"));
            info!("POST /businesses rejected: {err}");
            return HttpResponse::Ok().json(InsertResponse::failed(&err));
        }
    };

    match state.store.insert(record).await {
        Ok(stored) => {
            info!("POST /businesses -> stored {} as {}", stored.name, stored.id);
            HttpResponse::Ok().json(InsertResponse::inserted(stored))
        }
        Err(err) => {
            error!("POST /businesses: store write failed: {err}");
            HttpResponse::Ok().json(InsertResponse::failed(&err))
        }
    }
}
