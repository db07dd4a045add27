//! # Contract Service Module
//!
//! This module aggregates all API endpoints related to signed contracts.
//! It acts as a router, directing incoming HTTP requests under the
//! `/api/contracts` path to the appropriate handler logic defined in its
//! sub-modules.
//!
//! ## Sub-modules:
//! - `complete`: Finishes a signing run — validation, document synthesis,
//!   local save and the detached relay forward.
//! - `list`: Listing and substring search over the stored records.
//! - `download`: Serves a stored contract's document as a PDF attachment.
//! - `relay_status`: Exposes the outcome of a contract's forward attempt.
//! - `pdf`: The document synthesizer used by `complete`.

mod complete;
mod download;
mod list;
pub mod pdf;
mod relay_status;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for all contract-related API endpoints.
const API_PATH: &str = "/api/contracts";

/// Configures and returns the Actix `Scope` for all contract-related routes.
///
/// # Registered Routes:
///
/// *   **`POST /complete`**:
///     - **Handler**: `complete::process`
///     - **Description**: Completes a signing run. Expects the template id,
///       the signer details and the signature data URL; returns the saved
///       record. The relay forward happens in the background after the
///       response is sent.
///
/// *   **`GET /search`**:
///     - **Handler**: `list::search`
///     - **Description**: Substring search (`?q=`) over signer name,
///       template name and phone.
///
/// *   **`GET /relay/{contract_id}`**:
///     - **Handler**: `relay_status::process`
///     - **Description**: The status of the contract's forward attempt
///       (Pending, Forwarded or Failed).
///
/// *   **`GET /{contract_id}/download`**:
///     - **Handler**: `download::process`
///     - **Description**: The stored document as a PDF attachment.
///
/// *   **`GET /`**:
///     - **Handler**: `list::process`
///     - **Description**: All stored contracts, newest first.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/complete", post().to(complete::process))
        .route("/search", get().to(list::search))
        .route("/relay/{contract_id}", get().to(relay_status::process))
        .route("/{contract_id}/download", get().to(download::process))
        .route("", get().to(list::process))
}
