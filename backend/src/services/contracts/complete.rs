//! # Contract Completion Service
//!
//! This module provides the `POST /api/contracts/complete` endpoint, the
//! final step of the signing wizard. It turns the collected signer details
//! and signature into a durable local record and a best-effort relay
//! forward.
//!
//! ## Workflow:
//!
//! 1.  **Validation**: required signer fields and the email shape are checked
//!     up front; a validation failure never reaches synthesis or storage.
//!
//! 2.  **Synthesis**: the document is rendered from the template name, the
//!     signer details and the signature raster (`pdf::synthesize`). A
//!     synthesis failure aborts the attempt with nothing persisted.
//!
//! 3.  **Local save**: the record is assigned its identity and the initial
//!     SENT status and persisted synchronously. Local persistence is the
//!     source of truth for completion.
//!
//! 4.  **Relay forward**: only after the save succeeds, a detached task
//!     POSTs the record to the remote relay. The response to the operator is
//!     sent without waiting for it; the attempt's outcome is visible in the
//!     relay status map and the log only. With `RELAY_CONFIRMS_COMPLETION`
//!     set, a confirmed forward transitions the stored record to COMPLETED.

use crate::config::AppConfig;
use crate::error::ContractError;
use crate::relay;
use crate::relay_controller::state::{RelayState, RelayUpdate};
use crate::services::contracts::pdf;
use crate::store::{ContractDraft, RecordStore};
use actix_web::{web, HttpResponse};
use common::model::contract::{ContractStatus, SignedContract};
use common::model::signer::SignerInfo;
use common::relay::{RelayPayload, RelayStatus};
use common::requests::CompleteContractRequest;
use log::{info, warn};
use regex::Regex;

/// Actix web handler for `POST /api/contracts/complete`.
pub(crate) async fn process(
    store: web::Data<RecordStore>,
    config: web::Data<AppConfig>,
    relay_state: web::Data<RelayState>,
    payload: web::Json<CompleteContractRequest>,
) -> Result<HttpResponse, ContractError> {
    let request = payload.into_inner();
    validate_signer(&request.signer)?;

    let template = store
        .list_templates()?
        .into_iter()
        .find(|t| t.id == request.template_id)
        .ok_or_else(|| ContractError::NotFound(format!("template {}", request.template_id)))?;

    let document = pdf::synthesize(&template.name, &request.signer, &request.signature)?;

    let contract = store.add_contract(ContractDraft {
        template_id: template.id,
        template_name: template.name,
        signer_name: request.signer.name,
        signer_phone: request.signer.phone,
        signer_email: request.signer.email,
        document: Some(document),
    })?;

    spawn_relay_task(&store, &config, &relay_state, &contract).await;

    Ok(HttpResponse::Ok().json(contract))
}

/// Checks the wizard input before any work is done. The email check is the
/// basic `local@domain.tld` shape; everything else only needs to be present.
fn validate_signer(signer: &SignerInfo) -> Result<(), ContractError> {
    let required = [
        ("name", &signer.name),
        ("phone", &signer.phone),
        ("email", &signer.email),
        ("address", &signer.address),
        ("birth date", &signer.birth_date),
    ];
    for (label, value) in required {
        if value.trim().is_empty() {
            return Err(ContractError::Validation(format!(
                "signer {label} is required"
            )));
        }
    }

    let email_re = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|e| ContractError::Validation(format!("regex error: {e}")))?;
    if !email_re.is_match(signer.email.trim()) {
        return Err(ContractError::Validation(
            "signer email is not a valid address".to_string(),
        ));
    }
    Ok(())
}

/// Registers the attempt as Pending and spawns the detached forward task.
///
/// The task reports its outcome over the relay controller channel; nothing
/// in the request path ever awaits it. A failed forward leaves the local
/// record untouched.
async fn spawn_relay_task(
    store: &web::Data<RecordStore>,
    config: &web::Data<AppConfig>,
    relay_state: &web::Data<RelayState>,
    contract: &SignedContract,
) {
    relay_state
        .attempts
        .write()
        .await
        .insert(contract.id.clone(), RelayStatus::Pending);

    let tx = relay_state.tx.clone();
    let store = store.get_ref().clone();
    let config = config.get_ref().clone();
    let contract = contract.clone();

    tokio::spawn(async move {
        let payload = RelayPayload {
            template_name: contract.template_name.clone(),
            signer_name: contract.signer_name.clone(),
            signer_phone: contract.signer_phone.clone(),
            signer_email: contract.signer_email.clone(),
            signed_at: contract.signed_at.clone(),
            pdf_data: contract.document.clone().unwrap_or_default(),
        };

        let status = match relay::forward_contract(&config, &payload).await {
            Ok(response) => {
                info!("contract {} forwarded to the relay", contract.id);
                if config.relay_confirms_completion {
                    if let Err(e) =
                        store.set_contract_status(&contract.id, ContractStatus::Completed)
                    {
                        warn!("relay confirmed but the status update failed: {e}");
                    }
                }
                RelayStatus::Forwarded(response.url.or(response.file_name).unwrap_or_default())
            }
            Err(e) => {
                warn!("relay forward for contract {} failed: {e}", contract.id);
                RelayStatus::Failed(e)
            }
        };

        let _ = tx
            .send(RelayUpdate {
                contract_id: contract.id.clone(),
                status,
            })
            .await;
    });
}
