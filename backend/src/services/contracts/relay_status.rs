use crate::relay_controller::state::RelayState;
use actix_web::{web, HttpResponse, Responder};

/// `GET /api/contracts/relay/{contract_id}` — outcome of the background
/// forward attempt for one contract, if one was started this run.
pub(crate) async fn process(
    contract_id: web::Path<String>,
    state: web::Data<RelayState>,
) -> impl Responder {
    let attempts = state.attempts.read().await;
    match attempts.get(&contract_id.into_inner()) {
        Some(status) => HttpResponse::Ok().json(status),
        None => HttpResponse::NotFound().body("No relay attempt recorded for this contract"),
    }
}
