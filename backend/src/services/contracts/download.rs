use crate::error::ContractError;
use crate::services::{decode_document, filename_component};
use crate::store::RecordStore;
use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse};

/// `GET /api/contracts/{contract_id}/download` — the stored document as a
/// PDF attachment named `<signer>_<template>.pdf`.
pub(crate) async fn process(
    store: web::Data<RecordStore>,
    contract_id: web::Path<String>,
) -> Result<HttpResponse, ContractError> {
    let contract_id = contract_id.into_inner();
    let contract = store.get_contract(&contract_id)?;
    let document = contract
        .document
        .as_deref()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ContractError::NotFound(format!("document for contract {contract_id}")))?;
    let bytes = decode_document(document)?;

    let filename = format!(
        "{}_{}.pdf",
        filename_component(&contract.signer_name),
        filename_component(&contract.template_name)
    );
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition::attachment(filename))
        .body(bytes))
}
