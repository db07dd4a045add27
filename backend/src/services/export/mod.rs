//! # Export Service Module
//!
//! This module aggregates the archival endpoints under `/api/export`: the
//! tabular CSV export of every stored contract, the year-month group
//! listing, and the per-group ZIP bundle of signed documents.
//!
//! ## Sub-modules:
//! - `tabular`: The CSV export (`Contracts_Export_<date>.csv`).
//! - `groups`: Year-month bucketing of the stored contracts.
//! - `archive`: The per-group ZIP bundle (`Contracts_<group>.zip`).

mod archive;
mod groups;
mod tabular;

use actix_web::web::{get, scope};
use actix_web::Scope;

/// The base path for all export-related API endpoints.
const API_PATH: &str = "/api/export";

/// Configures and returns the Actix `Scope` for all export-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /csv`**:
///     - **Handler**: `tabular::process`
///     - **Description**: Every stored contract as a fully quoted CSV table
///       with a UTF-8 byte-order marker, served as an attachment.
///
/// *   **`GET /groups`**:
///     - **Handler**: `groups::process`
///     - **Description**: Year-month group keys with contract counts,
///       newest period first.
///
/// *   **`GET /archive/{group_key}`**:
///     - **Handler**: `archive::process`
///     - **Description**: A ZIP bundle of the group's signed documents,
///       one PDF per contract with a stored payload.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/csv", get().to(tabular::process))
        .route("/groups", get().to(groups::process))
        .route("/archive/{group_key}", get().to(archive::process))
}
