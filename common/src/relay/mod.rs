use serde::{Deserialize, Serialize};

/// JSON document POSTed to the remote relay after a contract is saved
/// locally. The relay persists the file under its dated tree and emails a
/// copy; both are its own concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPayload {
    pub template_name: String,
    pub signer_name: String,
    pub signer_phone: String,
    pub signer_email: String,
    /// ISO 8601 signing timestamp.
    pub signed_at: String,
    /// `data:application/pdf;base64,...` document payload.
    pub pdf_data: String,
}

/// Success body returned by the relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Observable outcome of a per-contract forward attempt.
#[derive(Clone, Debug, Serialize)]
pub enum RelayStatus {
    Pending,
    /// Carries the relative file URL (or filename) reported by the relay.
    Forwarded(String),
    Failed(String),
}
