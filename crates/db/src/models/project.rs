//! Project entity model, role-conditional field groups, and report rows.

use contrack_core::roles::RoleFieldKind;
use contrack_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status")]
pub enum ProjectStatus {
    Active,
    Expired,
    Completed,
}

/// Plant area where the work takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_location")]
pub enum ProjectLocation {
    #[serde(rename = "NGL")]
    #[sqlx(rename = "NGL")]
    Ngl,
    #[serde(rename = "Flare-Area")]
    #[sqlx(rename = "Flare-Area")]
    FlareArea,
    #[serde(rename = "SRU-HU")]
    #[sqlx(rename = "SRU-HU")]
    SruHu,
    #[serde(rename = "FG")]
    #[sqlx(rename = "FG")]
    Fg,
    #[serde(rename = "UT")]
    #[sqlx(rename = "UT")]
    Ut,
    Cogen,
    #[serde(rename = "Off-Site")]
    #[sqlx(rename = "Off-Site")]
    OffSite,
    #[serde(rename = "Sulfur-Loading")]
    #[sqlx(rename = "Sulfur-Loading")]
    SulfurLoading,
    Handlling,
}

/// End-user unit the project is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "assigned_location")]
pub enum AssignedLocation {
    #[serde(rename = "NGL")]
    #[sqlx(rename = "NGL")]
    Ngl,
    Degital,
    #[serde(rename = "GT")]
    #[sqlx(rename = "GT")]
    Gt,
    #[serde(rename = "SRU")]
    #[sqlx(rename = "SRU")]
    Sru,
    #[serde(rename = "FG")]
    #[sqlx(rename = "FG")]
    Fg,
    #[serde(rename = "UT")]
    #[sqlx(rename = "UT")]
    Ut,
    Elect,
    #[serde(rename = "PSCT")]
    #[sqlx(rename = "PSCT")]
    Psct,
    #[serde(rename = "CU")]
    #[sqlx(rename = "CU")]
    Cu,
    #[serde(rename = "T&l")]
    #[sqlx(rename = "T&l")]
    TAndL,
    #[serde(rename = "Multi-Craft")]
    #[sqlx(rename = "Multi-Craft")]
    MultiCraft,
    #[serde(rename = "PZV")]
    #[sqlx(rename = "PZV")]
    Pzv,
    #[serde(rename = "HVAC")]
    #[sqlx(rename = "HVAC")]
    Hvac,
}

/// Category of a recorded safety event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "safety_type")]
pub enum SafetyType {
    #[serde(rename = "FAI")]
    #[sqlx(rename = "FAI")]
    Fai,
    #[serde(rename = "NEAR-MISS")]
    #[sqlx(rename = "NEAR-MISS")]
    NearMiss,
    Observation,
    Incident,
}

/// Investigation state of a safety event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "incident_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Open,
    Closed,
    #[serde(rename = "under-investigation")]
    #[sqlx(rename = "under-investigation")]
    UnderInvestigation,
}

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub project_number: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: ProjectStatus,
    pub location: ProjectLocation,
    pub assigned_location: AssignedLocation,
    pub company_id: DbId,
    pub contractor_id: DbId,
    pub notes: Option<String>,
    pub safety_type: Option<SafetyType>,
    pub occurred_on: Option<Date>,
    pub incident_description: Option<String>,
    pub incident_status: Option<IncidentStatus>,
    pub ytd_fai: i32,
    pub of_fai_not_completed: i32,
    pub ytd_observation: i32,
    pub of_observation_not_completed: i32,
    pub ytd_incident: i32,
    pub of_incident_not_completed: i32,
    pub total_not_closed: i32,
    pub scheduled_start: Option<Date>,
    pub scheduled_end: Option<Date>,
    pub schedule_remarks: Option<String>,
    pub will_work_next_week: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project with its contractor and company names resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithNames {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,
    pub contractor_name: String,
    pub company_name: String,
}

/// Incident fields and year-to-date counters. Written by safety officers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SafetyFields {
    pub safety_type: Option<SafetyType>,
    pub occurred_on: Option<Date>,
    pub incident_description: Option<String>,
    pub incident_status: Option<IncidentStatus>,
    pub ytd_fai: Option<i32>,
    pub of_fai_not_completed: Option<i32>,
    pub ytd_observation: Option<i32>,
    pub of_observation_not_completed: Option<i32>,
    pub ytd_incident: Option<i32>,
    pub of_incident_not_completed: Option<i32>,
    pub total_not_closed: Option<i32>,
}

impl SafetyFields {
    /// Counter values paired with their column names, for validation.
    pub fn counters(&self) -> [(&'static str, Option<i32>); 7] {
        [
            ("ytd_fai", self.ytd_fai),
            ("of_fai_not_completed", self.of_fai_not_completed),
            ("ytd_observation", self.ytd_observation),
            ("of_observation_not_completed", self.of_observation_not_completed),
            ("ytd_incident", self.ytd_incident),
            ("of_incident_not_completed", self.of_incident_not_completed),
            ("total_not_closed", self.total_not_closed),
        ]
    }
}

/// Contractor schedule fields. Written by contractors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleFields {
    pub scheduled_start: Option<Date>,
    pub scheduled_end: Option<Date>,
    pub schedule_remarks: Option<String>,
    pub will_work_next_week: Option<bool>,
}

/// The role-conditional part of a project write, tagged by `kind`.
///
/// ```json
/// { "kind": "safety", "safety_type": "FAI", "ytd_fai": 2 }
/// { "kind": "schedule", "scheduled_start": "2026-03-01", "will_work_next_week": true }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectRoleFields {
    Safety(SafetyFields),
    Schedule(ScheduleFields),
}

impl ProjectRoleFields {
    pub fn kind(&self) -> RoleFieldKind {
        match self {
            ProjectRoleFields::Safety(_) => RoleFieldKind::Safety,
            ProjectRoleFields::Schedule(_) => RoleFieldKind::Schedule,
        }
    }

    /// Split into the two column groups; the absent group is all-`None`.
    pub fn split(role_fields: Option<&ProjectRoleFields>) -> (SafetyFields, ScheduleFields) {
        match role_fields {
            Some(ProjectRoleFields::Safety(s)) => (s.clone(), ScheduleFields::default()),
            Some(ProjectRoleFields::Schedule(s)) => (SafetyFields::default(), s.clone()),
            None => (SafetyFields::default(), ScheduleFields::default()),
        }
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub project_number: String,
    pub start_date: Date,
    pub end_date: Date,
    /// Defaults to `Active` if omitted.
    pub status: Option<ProjectStatus>,
    pub location: ProjectLocation,
    pub assigned_location: AssignedLocation,
    /// Forced to the caller's company for company owners.
    pub company_id: Option<DbId>,
    /// Forced to the caller's contractor id for contractors.
    pub contractor_id: Option<DbId>,
    pub notes: Option<String>,
    pub role_fields: Option<ProjectRoleFields>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub project_number: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub status: Option<ProjectStatus>,
    pub location: Option<ProjectLocation>,
    pub assigned_location: Option<AssignedLocation>,
    pub contractor_id: Option<DbId>,
    pub notes: Option<String>,
    pub role_fields: Option<ProjectRoleFields>,
}

impl UpdateProject {
    /// Whether any field outside `role_fields` is being changed.
    pub fn changes_base_fields(&self) -> bool {
        self.name.is_some()
            || self.project_number.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.status.is_some()
            || self.location.is_some()
            || self.assigned_location.is_some()
            || self.contractor_id.is_some()
            || self.notes.is_some()
    }
}

/// Project counts for one contractor.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractorProjectCount {
    pub contractor_id: DbId,
    pub contractor_name: String,
    pub total_projects: i64,
    pub active_projects: i64,
    pub completed_projects: i64,
    pub expired_projects: i64,
}

/// Safety counters summed over all projects of one contractor.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractorSafetyReport {
    pub contractor_id: DbId,
    pub contractor_name: String,
    pub project_count: i64,
    pub ytd_fai: i64,
    pub of_fai_not_completed: i64,
    pub ytd_observation: i64,
    pub of_observation_not_completed: i64,
    pub ytd_incident: i64,
    pub of_incident_not_completed: i64,
    pub total_not_closed: i64,
}

/// Safety counters and latest incident details of a single project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSafetyStats {
    pub project_id: DbId,
    pub project_name: String,
    pub safety_type: Option<SafetyType>,
    pub occurred_on: Option<Date>,
    pub incident_description: Option<String>,
    pub incident_status: Option<IncidentStatus>,
    pub ytd_fai: i32,
    pub of_fai_not_completed: i32,
    pub ytd_observation: i32,
    pub of_observation_not_completed: i32,
    pub ytd_incident: i32,
    pub of_incident_not_completed: i32,
    pub total_not_closed: i32,
}

impl From<&Project> for ProjectSafetyStats {
    fn from(p: &Project) -> Self {
        Self {
            project_id: p.id,
            project_name: p.name.clone(),
            safety_type: p.safety_type,
            occurred_on: p.occurred_on,
            incident_description: p.incident_description.clone(),
            incident_status: p.incident_status,
            ytd_fai: p.ytd_fai,
            of_fai_not_completed: p.of_fai_not_completed,
            ytd_observation: p.ytd_observation,
            of_observation_not_completed: p.of_observation_not_completed,
            ytd_incident: p.ytd_incident,
            of_incident_not_completed: p.of_incident_not_completed,
            total_not_closed: p.total_not_closed,
        }
    }
}
