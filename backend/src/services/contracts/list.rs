use crate::error::ContractError;
use crate::store::RecordStore;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// `GET /api/contracts` — the full listing, newest first.
pub(crate) async fn process(store: web::Data<RecordStore>) -> Result<HttpResponse, ContractError> {
    Ok(HttpResponse::Ok().json(store.list_contracts()?))
}

/// `GET /api/contracts/search?q=` — substring search over signer name,
/// template name and phone. An empty query is the full listing.
pub(crate) async fn search(
    store: web::Data<RecordStore>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ContractError> {
    Ok(HttpResponse::Ok().json(store.search_contracts(&query.q)?))
}
