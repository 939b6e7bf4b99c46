pub mod incident;
pub mod option;
pub mod user;

pub use incident::{
    IncidentCustomFieldsUpdate, IncidentDetail, IncidentFilter, IncidentInput, IncidentOverview,
    IncidentRecord, IncidentRolesUpdate, IncidentSeverityUpdate, IncidentStatusUpdate,
    IncidentSummaryUpdate, IncidentTypeUpdate, NewIncident, RelationKind,
};
pub use option::{OptionItem, OptionKind};
pub use user::{LoginInput, NewUser, RegisterInput, User, UserPublicData};
