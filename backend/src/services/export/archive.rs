use crate::error::ContractError;
use crate::services::export::groups::month_key;
use crate::services::{decode_document, filename_component};
use crate::store::RecordStore;
use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse};
use common::model::contract::SignedContract;
use log::info;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// `GET /api/export/archive/{group_key}` — the group's documents as a ZIP
/// attachment named `Contracts_<group_key>.zip`.
pub(crate) async fn process(
    store: web::Data<RecordStore>,
    group_key: web::Path<String>,
) -> Result<HttpResponse, ContractError> {
    let group_key = group_key.into_inner();
    let contracts: Vec<SignedContract> = store
        .list_contracts()?
        .into_iter()
        .filter(|contract| month_key(&contract.signed_at) == group_key)
        .collect();
    let bytes = to_grouped_archive(&group_key, &contracts)?;

    let filename = format!("Contracts_{group_key}.zip");
    Ok(HttpResponse::Ok()
        .content_type("application/zip")
        .insert_header(ContentDisposition::attachment(filename))
        .body(bytes))
}

/// Bundles every payload-bearing contract into a `Contracts_<group_key>/`
/// folder inside a deflate-compressed archive. Entry names combine signer,
/// template and a short identifier suffix so same-name signers do not
/// collide. Contracts without a stored document are skipped and counted; an
/// all-skipped or empty input is a nothing-to-export condition, never an
/// empty archive.
pub(crate) fn to_grouped_archive(
    group_key: &str,
    contracts: &[SignedContract],
) -> Result<Vec<u8>, ContractError> {
    let folder = format!("Contracts_{group_key}");
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut included = 0usize;
    let mut skipped = 0usize;
    for contract in contracts {
        let Some(document) = contract.document.as_deref().filter(|d| !d.is_empty()) else {
            skipped += 1;
            continue;
        };
        let bytes = decode_document(document)?;

        let id_suffix: String = contract.id.chars().take(8).collect();
        let entry = format!(
            "{folder}/{}_{}_{id_suffix}.pdf",
            filename_component(&contract.signer_name),
            filename_component(&contract.template_name)
        );
        writer.start_file(entry, options).map_err(archive_err)?;
        writer
            .write_all(&bytes)
            .map_err(|e| ContractError::Storage(e.to_string()))?;
        included += 1;
    }

    if included == 0 {
        return Err(ContractError::ExportEmpty);
    }
    if skipped > 0 {
        info!("archive {group_key}: skipped {skipped} contract(s) without a stored document");
    }

    let cursor = writer.finish().map_err(archive_err)?;
    Ok(cursor.into_inner())
}

fn archive_err(err: zip::result::ZipError) -> ContractError {
    ContractError::Storage(err.to_string())
}
