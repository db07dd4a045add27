use crate::error::ContractError;
use crate::store::RecordStore;
use actix_web::http::header::ContentDisposition;
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Local};
use common::model::contract::SignedContract;
use csv::{QuoteStyle, WriterBuilder};

/// Byte-order marker so spreadsheet tools decode non-Latin signer names.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// `GET /api/export/csv` — every stored contract as a CSV attachment named
/// `Contracts_Export_<date>.csv`.
pub(crate) async fn process(store: web::Data<RecordStore>) -> Result<HttpResponse, ContractError> {
    let contracts = store.list_contracts()?;
    let bytes = to_tabular(&contracts)?;

    let filename = format!("Contracts_Export_{}.csv", Local::now().format("%Y-%m-%d"));
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition::attachment(filename))
        .body(bytes))
}

/// Renders the records as a fully quoted CSV table, one row per contract in
/// input order, prefixed with the UTF-8 BOM. An empty input is a
/// nothing-to-export condition, never an empty file.
pub(crate) fn to_tabular(contracts: &[SignedContract]) -> Result<Vec<u8>, ContractError> {
    if contracts.is_empty() {
        return Err(ContractError::ExportEmpty);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    writer
        .write_record(["Contract ID", "Template", "Signer", "Phone", "Email", "Signed At"])
        .map_err(table_err)?;

    for contract in contracts {
        let signed_at = display_timestamp(&contract.signed_at);
        writer
            .write_record([
                contract.id.as_str(),
                contract.template_name.as_str(),
                contract.signer_name.as_str(),
                contract.signer_phone.as_str(),
                contract.signer_email.as_str(),
                signed_at.as_str(),
            ])
            .map_err(table_err)?;
    }

    let table = writer
        .into_inner()
        .map_err(|e| ContractError::Storage(e.to_string()))?;
    let mut bytes = Vec::with_capacity(UTF8_BOM.len() + table.len());
    bytes.extend_from_slice(UTF8_BOM);
    bytes.extend_from_slice(&table);
    Ok(bytes)
}

/// Stored timestamps are RFC 3339; the export shows the short operator-facing
/// form. Records that predate that convention keep their raw value.
fn display_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn table_err(err: csv::Error) -> ContractError {
    ContractError::Storage(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::contract::ContractStatus;

    fn contract(id: &str, signer: &str, phone: &str) -> SignedContract {
        SignedContract {
            id: id.to_string(),
            template_id: "t-1".to_string(),
            template_name: "Membership Agreement".to_string(),
            signer_name: signer.to_string(),
            signer_phone: phone.to_string(),
            signer_email: "hong@x.com".to_string(),
            signed_at: "2024-05-02T10:15:00+09:00".to_string(),
            document: None,
            status: ContractStatus::Sent,
        }
    }

    #[test]
    fn empty_input_is_nothing_to_export() {
        assert!(matches!(to_tabular(&[]), Err(ContractError::ExportEmpty)));
    }

    #[test]
    fn table_starts_with_the_bom_and_the_fixed_header() {
        let bytes = to_tabular(&[contract("c-1", "Hong Gildong", "010-1234-5678")]).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"Contract ID\",\"Template\",\"Signer\",\"Phone\",\"Email\",\"Signed At\""
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"c-1\",\"Membership Agreement\",\"Hong Gildong\",\"010-1234-5678\",\"hong@x.com\",\"2024-05-02 10:15\""
        );
    }

    #[test]
    fn every_field_is_quoted_so_embedded_commas_survive() {
        let mut with_comma = contract("c-2", "Doe, Jane", "010-9999-0000");
        with_comma.signer_name = "Doe, Jane".to_string();

        let bytes = to_tabular(&[with_comma]).unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.contains("\"Doe, Jane\""));
    }

    #[test]
    fn rows_keep_input_order() {
        let bytes = to_tabular(&[
            contract("first", "Hong Gildong", "010-1111-2222"),
            contract("second", "Jane Doe", "010-3333-4444"),
        ])
        .unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let first = text.find("\"first\"").unwrap();
        let second = text.find("\"second\"").unwrap();
        assert!(first < second);
    }
}
