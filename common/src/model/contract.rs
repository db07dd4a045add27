use serde::{Deserialize, Serialize};

/// Immutable record of a completed signing event.
///
/// Signer fields and the template name are denormalized copies taken at
/// signing time; renaming a template later never rewrites history. The
/// document payload is self-contained so the record can be downloaded,
/// bundled or relayed without touching the template it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignedContract {
    /// Unique identifier (UUID), assigned when the record is saved.
    pub id: String,
    pub template_id: String,
    pub template_name: String,
    pub signer_name: String,
    pub signer_phone: String,
    pub signer_email: String,
    /// ISO 8601 signing timestamp.
    pub signed_at: String,
    /// `data:application/pdf;base64,...` payload; absent on records whose
    /// document could not be kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    pub status: ContractStatus,
}

/// `Sent` is assigned on save. `Completed` is only ever reached through the
/// relay-confirmation flag on the backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Sent,
    Completed,
}
