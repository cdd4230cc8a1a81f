//! Shared query parameter types for API handlers.

use contrack_core::types::{Date, DbId};
use serde::Deserialize;

/// `?company_id=` filter on aggregate and list endpoints.
///
/// Only narrows the caller's tenant scope, never widens it.
#[derive(Debug, Default, Deserialize)]
pub struct CompanyFilter {
    pub company_id: Option<DbId>,
}

/// `?days=` look-ahead window.
#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub days: Option<i64>,
}

/// Filters for listing payments and workers.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectFilter {
    pub company_id: Option<DbId>,
    pub project_id: Option<DbId>,
}

/// Filters for listing attendance records.
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceFilter {
    pub company_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub date: Option<Date>,
}
