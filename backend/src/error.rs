use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

/// Failure taxonomy for the signing pipeline.
///
/// Relay failures are absent on purpose: they are logged and tracked in the
/// relay status map, never returned to the operator. A synthesis or storage
/// failure aborts the whole attempt; no partial record is persisted.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("{0}")]
    Validation(String),
    #[error("document synthesis failed: {0}")]
    Synthesis(String),
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("local storage is full; the record could not be saved")]
    StorageQuota,
    #[error("nothing to export")]
    ExportEmpty,
    #[error("{0} not found")]
    NotFound(String),
}

impl actix_web::ResponseError for ContractError {
    fn status_code(&self) -> StatusCode {
        match self {
            ContractError::Validation(_) => StatusCode::BAD_REQUEST,
            ContractError::Synthesis(_) => StatusCode::SERVICE_UNAVAILABLE,
            ContractError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            ContractError::StorageQuota => StatusCode::INSUFFICIENT_STORAGE,
            ContractError::ExportEmpty => StatusCode::UNPROCESSABLE_ENTITY,
            ContractError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}
