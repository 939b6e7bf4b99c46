// handlers/protected/incidents/mod.rs - Incident handlers
//
// POST   /incidents/create
// GET    /incidents[?status=&category=&severity=]
// GET    /incidents/:id
// POST   /incidents/update/{summary,status,severity,type,roles}
// POST   /incidents/custom-fields

pub mod create;
pub mod custom_fields;
pub mod detail;
pub mod list;
pub mod update;

pub use create::incident_create;
pub use custom_fields::incident_custom_fields;
pub use detail::incident_get;
pub use list::incidents_get;
pub use update::{
    incident_update_roles, incident_update_severity, incident_update_status, incident_update_summary,
    incident_update_type,
};
