use serde::{Deserialize, Serialize};

/// A reusable contract form descriptor created by an administrator upload.
///
/// Sample templates seeded on first run carry no `source_document`; uploaded
/// ones keep the original PDF as a `data:application/pdf;base64,...` string
/// together with a human-readable size label and a best-effort page count.
/// Records are never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Template {
    /// Unique, immutable identifier (UUID), assigned at creation.
    pub id: String,
    /// Display name shown to the operator and used as the document title.
    pub name: String,
    pub category: TemplateCategory,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateCategory {
    Membership,
    Waiver,
    PtAgreement,
    Other,
}

impl TemplateCategory {
    /// Total mapping from raw input; anything unrecognized becomes `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "MEMBERSHIP" => TemplateCategory::Membership,
            "WAIVER" => TemplateCategory::Waiver,
            "PT_AGREEMENT" => TemplateCategory::PtAgreement,
            _ => TemplateCategory::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TemplateCategory::Membership => "Membership",
            TemplateCategory::Waiver => "Waiver",
            TemplateCategory::PtAgreement => "PT Agreement",
            TemplateCategory::Other => "Other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TemplateCategory;

    #[test]
    fn parse_maps_known_categories() {
        assert_eq!(
            TemplateCategory::parse("membership"),
            TemplateCategory::Membership
        );
        assert_eq!(
            TemplateCategory::parse("PT_AGREEMENT"),
            TemplateCategory::PtAgreement
        );
    }

    #[test]
    fn parse_never_fails_on_unknown_input() {
        assert_eq!(TemplateCategory::parse("lease"), TemplateCategory::Other);
        assert_eq!(TemplateCategory::parse(""), TemplateCategory::Other);
    }
}
