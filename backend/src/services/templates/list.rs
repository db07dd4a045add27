use crate::error::ContractError;
use crate::store::RecordStore;
use actix_web::{web, HttpResponse};

/// Actix web handler for `GET /api/templates`.
pub(crate) async fn process(store: web::Data<RecordStore>) -> Result<HttpResponse, ContractError> {
    Ok(HttpResponse::Ok().json(store.list_templates()?))
}
