//! Shared response bodies for API handlers.

use contrack_core::types::DbId;
use serde::Serialize;

/// Body returned by every `DELETE /{id}` endpoint.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: DbId,
    pub message: String,
}

impl DeletedResponse {
    pub fn new(entity: &str, id: DbId) -> Self {
        Self {
            id,
            message: format!("{entity} deleted successfully"),
        }
    }
}
