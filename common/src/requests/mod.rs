use crate::model::signer::SignerInfo;
use serde::{Deserialize, Serialize};

/// Metadata part of the multipart template upload, sent in the `json` field
/// ahead of the PDF `file` field.
#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateUploadMeta {
    pub name: String,
    /// Raw category string; unknown values map to `OTHER`.
    pub category: String,
}

/// Payload of `POST /api/contracts/complete` once the operator finishes the
/// three wizard steps.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteContractRequest {
    pub template_id: String,
    pub signer: SignerInfo,
    /// `data:image/png;base64,...` from the signature pad, or empty when no
    /// strokes were captured.
    #[serde(default)]
    pub signature: String,
}
