//! # Template Upload Service
//!
//! Handles `POST /api/templates/upload`. The administrator sends a
//! multipart request with a `json` metadata part (name, category) followed
//! by the PDF `file` part. The uploaded bytes are kept whole on the record
//! as a data URL, together with a human-readable size label and a
//! best-effort page count.

use crate::error::ContractError;
use crate::store::{RecordStore, TemplateDraft};
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use common::model::template::TemplateCategory;
use common::requests::TemplateUploadMeta;
use futures_util::StreamExt;
use serde_json::from_slice;

/// Actix web handler for `POST /api/templates/upload`.
pub(crate) async fn process(
    store: web::Data<RecordStore>,
    payload: Multipart,
) -> Result<HttpResponse, ContractError> {
    let draft = read_upload(payload).await?;
    let template = store.add_template(draft)?;
    Ok(HttpResponse::Ok().json(template))
}

/// Reads the multipart stream into a template draft. The metadata part must
/// arrive before the file part so the upload can be rejected early.
async fn read_upload(mut payload: Multipart) -> Result<TemplateDraft, ContractError> {
    let mut meta: Option<TemplateUploadMeta> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| ContractError::Validation(format!("invalid multipart payload: {e}")))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match name.as_deref() {
            Some("json") => {
                let bytes = read_field(&mut field).await?;
                let parsed: TemplateUploadMeta = from_slice(&bytes).map_err(|e| {
                    ContractError::Validation(format!("invalid template metadata: {e}"))
                })?;
                meta = Some(parsed);
            }
            Some("file") => {
                if meta.is_none() {
                    return Err(ContractError::Validation(
                        "template metadata must be sent before the file".to_string(),
                    ));
                }
                let filename = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                if !filename.to_ascii_lowercase().ends_with(".pdf") {
                    return Err(ContractError::Validation(
                        "the file must end with .pdf".to_string(),
                    ));
                }
                file_bytes = Some(read_field(&mut field).await?);
            }
            _ => {}
        }
    }

    let meta = meta.ok_or_else(|| {
        ContractError::Validation("missing template metadata".to_string())
    })?;
    let bytes = file_bytes
        .ok_or_else(|| ContractError::Validation("missing file".to_string()))?;
    if meta.name.trim().is_empty() {
        return Err(ContractError::Validation(
            "template name is required".to_string(),
        ));
    }

    Ok(TemplateDraft {
        name: meta.name.trim().to_string(),
        category: TemplateCategory::parse(&meta.category),
        file_size: Some(human_size(bytes.len())),
        page_count: scan_page_count(&bytes),
        source_document: Some(format!(
            "data:application/pdf;base64,{}",
            BASE64.encode(&bytes)
        )),
    })
}

async fn read_field(field: &mut Field) -> Result<Vec<u8>, ContractError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk =
            chunk.map_err(|e| ContractError::Validation(format!("upload interrupted: {e}")))?;
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Human-readable size label stored alongside the template.
fn human_size(len: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    let size = len as f64;
    if size >= MB {
        format!("{:.1} MB", size / MB)
    } else if size >= KB {
        format!("{:.1} KB", size / KB)
    } else {
        format!("{len} B")
    }
}

/// Best-effort page count: counts page objects in the raw bytes. Returns
/// `None` when the scan finds nothing, leaving the field empty.
fn scan_page_count(bytes: &[u8]) -> Option<u32> {
    let pages_with_spacing =
        count_occurrences(bytes, b"/Type /Page") + count_occurrences(bytes, b"/Type/Page");
    let page_trees =
        count_occurrences(bytes, b"/Type /Pages") + count_occurrences(bytes, b"/Type/Pages");
    let pages = pages_with_spacing.saturating_sub(page_trees);
    if pages == 0 {
        None
    } else {
        Some(pages as u32)
    }
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    if needle.is_empty() || haystack.len() < needle.len() {
        return 0;
    }
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_labels_pick_a_sensible_unit() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn page_scan_counts_page_objects_not_the_tree() {
        let pdf = b"%PDF-1.4 1 0 obj <</Type /Pages /Count 2>> \
                    2 0 obj <</Type /Page>> 3 0 obj <</Type /Page>>";
        assert_eq!(scan_page_count(pdf), Some(2));
    }

    #[test]
    fn page_scan_on_opaque_bytes_is_empty() {
        assert_eq!(scan_page_count(b"not a pdf at all"), None);
        assert_eq!(scan_page_count(b""), None);
    }
}
