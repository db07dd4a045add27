use serde::{Deserialize, Serialize};

/// Personal data collected in the wizard. Not persisted standalone; it is
/// rendered into the synthesized document and copied onto the saved record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignerInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub birth_date: String,
}
