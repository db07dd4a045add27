//! Durable local persistence for the template and contract collections.
//!
//! The store keeps two named collections (`templates`, `contracts`) in a
//! single SQLite key/value table, each serialized as a JSON array ordered
//! newest first. A connection is opened per operation; the handle itself is
//! a cheap clone injected into the Actix application state, so no consumer
//! ever touches an ambient global.
//!
//! Consumers always receive owned copies of the records and only ever append
//! new ones. The single exception is `set_contract_status`, reserved for the
//! relay-confirmation path behind the `RELAY_CONFIRMS_COMPLETION` flag.

use crate::error::ContractError;
use chrono::Local;
use common::model::contract::{ContractStatus, SignedContract};
use common::model::template::{Template, TemplateCategory};
use log::warn;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const TEMPLATES_KEY: &str = "templates";
const CONTRACTS_KEY: &str = "contracts";

/// Draft of a template before the store assigns identity.
#[derive(Debug, Clone)]
pub struct TemplateDraft {
    pub name: String,
    pub category: TemplateCategory,
    pub source_document: Option<String>,
    pub file_size: Option<String>,
    pub page_count: Option<u32>,
}

/// Draft of a signed contract before the store assigns identity and status.
#[derive(Debug, Clone)]
pub struct ContractDraft {
    pub template_id: String,
    pub template_name: String,
    pub signer_name: String,
    pub signer_phone: String,
    pub signer_email: String,
    pub document: Option<String>,
}

#[derive(Clone)]
pub struct RecordStore {
    db_path: PathBuf,
}

impl RecordStore {
    /// Opens (creating if needed) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let store = Self {
            db_path: path.as_ref().to_path_buf(),
        };
        let conn = store.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS collections (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .map_err(storage_err)?;
        Ok(store)
    }

    fn connect(&self) -> Result<Connection, ContractError> {
        Connection::open(&self.db_path).map_err(storage_err)
    }

    /// Lists templates newest first, seeding the sample set on first access
    /// so the template picker is never empty.
    pub fn list_templates(&self) -> Result<Vec<Template>, ContractError> {
        let conn = self.connect()?;
        match read_collection::<Template>(&conn, TEMPLATES_KEY)? {
            Some(templates) => Ok(templates),
            None => {
                let seeded = sample_templates();
                write_collection(&conn, TEMPLATES_KEY, &seeded)?;
                Ok(seeded)
            }
        }
    }

    /// Assigns identity to the draft, prepends it and persists the whole
    /// collection. When the write fails for lack of space the draft's
    /// source document (by far the largest field) is dropped and the write
    /// retried once; only a second failure surfaces as a quota error. The
    /// in-memory view never claims success for a record that was not
    /// persisted.
    pub fn add_template(&self, draft: TemplateDraft) -> Result<Template, ContractError> {
        let conn = self.connect()?;
        let mut templates =
            read_collection::<Template>(&conn, TEMPLATES_KEY)?.unwrap_or_else(sample_templates);

        let template = Template {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            category: draft.category,
            created_at: Local::now().to_rfc3339(),
            source_document: draft.source_document,
            file_size: draft.file_size,
            page_count: draft.page_count,
        };
        templates.insert(0, template.clone());

        match write_collection(&conn, TEMPLATES_KEY, &templates) {
            Ok(()) => Ok(template),
            Err(ContractError::StorageQuota) => {
                warn!("template write hit the storage quota; retrying without the source document");
                templates[0].source_document = None;
                write_collection(&conn, TEMPLATES_KEY, &templates)?;
                Ok(templates[0].clone())
            }
            Err(other) => Err(other),
        }
    }

    /// Lists contracts newest first.
    pub fn list_contracts(&self) -> Result<Vec<SignedContract>, ContractError> {
        let conn = self.connect()?;
        Ok(read_collection(&conn, CONTRACTS_KEY)?.unwrap_or_default())
    }

    /// Case-insensitive substring match on signer or template name, raw
    /// substring match on the phone number. An empty query is the full
    /// listing, order preserved.
    pub fn search_contracts(&self, query: &str) -> Result<Vec<SignedContract>, ContractError> {
        let contracts = self.list_contracts()?;
        let needle = query.trim();
        if needle.is_empty() {
            return Ok(contracts);
        }
        let folded = needle.to_lowercase();
        Ok(contracts
            .into_iter()
            .filter(|contract| {
                contract.signer_name.to_lowercase().contains(&folded)
                    || contract.template_name.to_lowercase().contains(&folded)
                    || contract.signer_phone.contains(needle)
            })
            .collect())
    }

    /// Assigns identity, the signing timestamp and the initial SENT status,
    /// prepends the record and persists it before returning.
    pub fn add_contract(&self, draft: ContractDraft) -> Result<SignedContract, ContractError> {
        let conn = self.connect()?;
        let mut contracts =
            read_collection::<SignedContract>(&conn, CONTRACTS_KEY)?.unwrap_or_default();

        let contract = SignedContract {
            id: Uuid::new_v4().to_string(),
            template_id: draft.template_id,
            template_name: draft.template_name,
            signer_name: draft.signer_name,
            signer_phone: draft.signer_phone,
            signer_email: draft.signer_email,
            signed_at: Local::now().to_rfc3339(),
            document: draft.document,
            status: ContractStatus::Sent,
        };
        contracts.insert(0, contract.clone());
        write_collection(&conn, CONTRACTS_KEY, &contracts)?;
        Ok(contract)
    }

    pub fn get_contract(&self, id: &str) -> Result<SignedContract, ContractError> {
        self.list_contracts()?
            .into_iter()
            .find(|contract| contract.id == id)
            .ok_or_else(|| ContractError::NotFound(format!("contract {id}")))
    }

    /// Transitions a stored record's status. Only the relay-confirmation
    /// path calls this; everything else treats records as append-only.
    pub fn set_contract_status(
        &self,
        id: &str,
        status: ContractStatus,
    ) -> Result<(), ContractError> {
        let conn = self.connect()?;
        let mut contracts =
            read_collection::<SignedContract>(&conn, CONTRACTS_KEY)?.unwrap_or_default();
        let Some(entry) = contracts.iter_mut().find(|contract| contract.id == id) else {
            return Err(ContractError::NotFound(format!("contract {id}")));
        };
        entry.status = status;
        write_collection(&conn, CONTRACTS_KEY, &contracts)
    }
}

fn read_collection<T: DeserializeOwned>(
    conn: &Connection,
    key: &str,
) -> Result<Option<Vec<T>>, ContractError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM collections WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(storage_err)?;
    match raw {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| ContractError::Storage(e.to_string())),
        None => Ok(None),
    }
}

fn write_collection<T: Serialize>(
    conn: &Connection,
    key: &str,
    items: &[T],
) -> Result<(), ContractError> {
    let json = serde_json::to_string(items).map_err(|e| ContractError::Storage(e.to_string()))?;
    conn.execute(
        "INSERT OR REPLACE INTO collections (key, value) VALUES (?1, ?2)",
        params![key, json],
    )
    .map_err(|e| {
        if is_quota_error(&e) {
            ContractError::StorageQuota
        } else {
            storage_err(e)
        }
    })?;
    Ok(())
}

fn is_quota_error(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(e.code, ErrorCode::DiskFull | ErrorCode::TooBig | ErrorCode::OutOfMemory)
    )
}

fn storage_err(err: rusqlite::Error) -> ContractError {
    ContractError::Storage(err.to_string())
}

/// Defaults persisted on the first listing so the dashboard has content
/// before any administrator upload.
fn sample_templates() -> Vec<Template> {
    let created_at = Local::now().to_rfc3339();
    let sample = |name: &str, category: TemplateCategory| Template {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        category,
        created_at: created_at.clone(),
        source_document: None,
        file_size: None,
        page_count: None,
    };
    vec![
        sample("Membership Agreement", TemplateCategory::Membership),
        sample("Liability Waiver", TemplateCategory::Waiver),
        sample("Personal Training Agreement", TemplateCategory::PtAgreement),
    ]
}
