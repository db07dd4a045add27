pub mod contracts;
pub mod export;
pub mod templates;

use crate::error::ContractError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

const PDF_DATA_PREFIX: &str = "data:application/pdf;base64,";

/// Filename-safe rendition of a display string; anything outside
/// alphanumerics, dash and underscore becomes an underscore.
pub(crate) fn filename_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "contract".to_string()
    } else {
        cleaned
    }
}

/// Decodes a stored `data:application/pdf;base64,...` payload back into the
/// raw document bytes.
pub(crate) fn decode_document(data_url: &str) -> Result<Vec<u8>, ContractError> {
    let payload = data_url.strip_prefix(PDF_DATA_PREFIX).unwrap_or(data_url);
    BASE64
        .decode(payload)
        .map_err(|e| ContractError::Storage(format!("stored document is not valid base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::{decode_document, filename_component};

    #[test]
    fn replaces_separators_and_keeps_word_characters() {
        assert_eq!(filename_component("Hong Gildong"), "Hong_Gildong");
        assert_eq!(filename_component("a/b\\c"), "a_b_c");
    }

    #[test]
    fn never_returns_an_empty_component() {
        assert_eq!(filename_component("   "), "contract");
    }

    #[test]
    fn document_payload_round_trips() {
        let data_url = "data:application/pdf;base64,JVBERi0xLjc=";
        assert_eq!(decode_document(data_url).unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn corrupt_document_payload_is_a_storage_error() {
        assert!(decode_document("data:application/pdf;base64,??").is_err());
    }
}
