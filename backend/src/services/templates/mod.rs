//! # Template Service Module
//!
//! This module aggregates all API endpoints related to the management of
//! contract templates. It acts as a router, directing incoming HTTP
//! requests under the `/api/templates` path to the appropriate handler
//! logic defined in its sub-modules.
//!
//! ## Sub-modules:
//! - `list`: Returns the template collection, seeding the sample set on the
//!   very first access so the picker is never empty.
//! - `upload`: Handles the administrator's multipart PDF upload.

mod list;
mod upload;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for all template-related API endpoints.
const API_PATH: &str = "/api/templates";

/// Configures and returns the Actix `Scope` for all template-related routes.
///
/// # Registered Routes:
///
/// *   **`GET /`**:
///     - **Handler**: `list::process`
///     - **Description**: All templates, newest first.
///
/// *   **`POST /upload`**:
///     - **Handler**: `upload::process`
///     - **Description**: Creates a template from a multipart upload: a
///       `json` metadata part (name, category) followed by the `.pdf`
///       `file` part. The uploaded bytes are stored on the record.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/upload", post().to(upload::process))
        .route("", get().to(list::process))
}
