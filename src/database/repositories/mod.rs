//! Persistence seams. Services depend on these traits; the `Pg*` types are
//! the PostgreSQL implementations wired in by the binary.

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    IncidentCustomFieldsUpdate, IncidentDetail, IncidentFilter, IncidentOverview, IncidentRolesUpdate,
    NewIncident, NewUser, OptionItem, OptionKind, User, UserPublicData,
};

pub mod incident;
pub mod options;
pub mod user;

pub use incident::PgIncidentRepository;
pub use options::PgOptionsRepository;
pub use user::PgUserRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user and returns its id. A taken email surfaces as
    /// `DatabaseError::UniqueViolation`.
    async fn create_user(&self, user: &NewUser) -> Result<i32, DatabaseError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn list_public(&self) -> Result<Vec<UserPublicData>, DatabaseError>;
}

#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Inserts the incident and its product/area/indicator links atomically.
    async fn create_incident(&self, incident: &NewIncident) -> Result<i32, DatabaseError>;
    async fn get_incidents(&self, filter: &IncidentFilter) -> Result<Vec<IncidentOverview>, DatabaseError>;
    async fn get_incident_by_id(&self, id: i32) -> Result<IncidentDetail, DatabaseError>;
    async fn update_summary(&self, id: i32, summary: &str) -> Result<(), DatabaseError>;
    async fn update_status(&self, id: i32, status: &str) -> Result<(), DatabaseError>;
    async fn update_severity(&self, id: i32, severity: &str) -> Result<(), DatabaseError>;
    async fn update_type(&self, id: i32, incident_type: i32) -> Result<(), DatabaseError>;
    /// No-op when neither role is given.
    async fn update_roles(&self, roles: &IncidentRolesUpdate) -> Result<(), DatabaseError>;
    /// Replace-all: every relation set ends up exactly as supplied.
    async fn update_custom_fields(&self, update: &IncidentCustomFieldsUpdate) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait OptionsRepository: Send + Sync {
    async fn list_active(&self, kind: OptionKind) -> Result<Vec<OptionItem>, DatabaseError>;
}

/// Turns "zero rows affected" on a targeted write into a not-found error
pub(crate) fn ensure_affected(rows_affected: u64, id: i32) -> Result<(), DatabaseError> {
    if rows_affected == 0 {
        return Err(DatabaseError::NotFound(format!("incident with ID {} not found", id)));
    }
    Ok(())
}
