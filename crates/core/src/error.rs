use crate::payment::{format_percent, headroom_after};
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A payment would push the project's cumulative percentage past 100.
    #[error(
        "Total payment amount cannot exceed 100% (already recorded {}%, requested {}%)",
        format_percent(*existing_sum),
        format_percent(*requested)
    )]
    PaymentCeiling { existing_sum: f64, requested: f64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Remaining percentage a caller may still record, for ceiling rejections.
    pub fn headroom(&self) -> Option<f64> {
        match self {
            CoreError::PaymentCeiling { existing_sum, .. } => {
                Some(headroom_after(*existing_sum))
            }
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| errs.first().map(|e| e.code.to_string()).unwrap_or_default());
                format!("{field}: {detail}")
            })
            .collect();
        fields.sort();
        CoreError::Validation(fields.join("; "))
    }
}
