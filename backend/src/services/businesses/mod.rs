//! # Business Relay Endpoints
//!
//! Both routes forward straight to the configured record store and hand its
//! answer back without adding business logic.
//!
//! ## Sub-modules:
//! - `list`: reads every business record.
//! - `create`: inserts one business record.

mod create;
mod list;

use actix_web::web::{get, post, resource};
use actix_web::Resource;

/// Path shared by both relay operations.
const API_PATH: &str = "/businesses";

/// Configures the `/businesses` resource.
///
/// # Registered Routes:
///
/// *   **`GET /businesses`**:
///     - **Handler**: `list::process`
///     - **Description**: Returns the JSON array of all business records. When the
///       store read fails the body is `null`, so clients fall back to an empty list.
///
/// *   **`POST /businesses`**:
///     - **Handler**: `create::process`
///     - **Description**: Takes a JSON new-business payload and answers with
///       `{ "data": [record] | null, "error": { message, code } | null }`.
pub fn configure_routes() -> Resource {
    resource(API_PATH)
        .route(get().to(list::process))
        .route(post().to(create::process))
}
