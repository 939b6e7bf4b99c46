use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool, Row};
use tracing::{debug, info};

use super::{ensure_affected, IncidentRepository};
use crate::database::manager::DatabaseError;
use crate::database::models::incident::distinct_ids;
use crate::database::models::{
    IncidentCustomFieldsUpdate, IncidentDetail, IncidentFilter, IncidentOverview, IncidentRecord,
    IncidentRolesUpdate, NewIncident, OptionItem, RelationKind,
};
use crate::database::statement::{quote_identifier, InsertStatement, SqlResult, SqlValue, UpdateStatement};

const INCIDENTS: &str = "incidents";

const LIST_QUERY: &str = "SELECT i.id, i.title, i.\"type\", i.severity, i.summary, i.status, \
     i.impact_started_at, u.name AS lead, u.avatar_url AS lead_avatar \
     FROM incidents AS i LEFT JOIN users AS u ON i.lead = u.id WHERE 1=1";

const DETAIL_QUERY: &str = r#"
SELECT
    i.id, i.reference, i.title, i."type", i.severity, i.summary, i.status, i.category,
    i.reporter, reporter_user.name AS reporter_name, reporter_user.avatar_url AS reporter_avatar,
    i.lead, lead_user.name AS lead_name, lead_user.avatar_url AS lead_avatar,
    i.qe, qe_user.name AS qe_name, qe_user.avatar_url AS qe_avatar,
    i.impact, i.treatment, i.mitigator, i.post_mortem, i.incident_source,
    i.slack_channel, i.slack_thread, i.related_incident, i.post_to_status_page,
    i.impact_started_at, i.impact_stopped_at, i.reported_at, i.identified_at,
    i.fixed_at, i.documentation_at, i.in_review_at, i.resolved_at, i.closed_at
FROM incidents i
LEFT JOIN users lead_user ON i.lead = lead_user.id
LEFT JOIN users reporter_user ON i.reporter = reporter_user.id
LEFT JOIN users qe_user ON i.qe = qe_user.id
WHERE i.id = $1
"#;

pub struct PgIncidentRepository {
    pool: PgPool,
}

impl PgIncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn update_column(&self, id: i32, column: &'static str, value: SqlValue) -> Result<(), DatabaseError> {
        let Some(sql) = UpdateStatement::new(INCIDENTS, "id", id).set(column, value).to_sql() else {
            return Ok(());
        };

        debug!(incident_id = id, column, "Updating incident column");
        let result = sql.bind().execute(&self.pool).await?;
        ensure_affected(result.rows_affected(), id)?;

        info!(incident_id = id, column, "Updated incident");
        Ok(())
    }
}

/// List query with one `AND` fragment per present filter
pub(crate) fn incident_list_query(filter: &IncidentFilter) -> SqlResult {
    let mut query = LIST_QUERY.to_string();
    let mut params = Vec::new();

    let conditions = [
        ("i.status", &filter.status),
        ("i.category", &filter.category),
        ("i.severity", &filter.severity),
    ];
    for (column, value) in conditions {
        if let Some(value) = value {
            params.push(SqlValue::Text(value.clone()));
            query.push_str(&format!(" AND {} = ${}", column, params.len()));
        }
    }
    query.push_str(" ORDER BY i.id DESC");

    SqlResult { query, params }
}

pub(crate) fn relation_names_query(kind: RelationKind) -> String {
    format!(
        "SELECT o.id, o.name FROM {} AS j JOIN {} AS o ON j.{} = o.id WHERE j.incident_id = $1 ORDER BY o.id",
        quote_identifier(kind.join_table()),
        quote_identifier(kind.option_table()),
        quote_identifier(kind.related_column()),
    )
}

pub(crate) fn delete_relations_query(kind: RelationKind) -> String {
    format!(
        "DELETE FROM {} WHERE incident_id = $1",
        quote_identifier(kind.join_table())
    )
}

pub(crate) fn create_incident_statement(incident: &NewIncident) -> SqlResult {
    InsertStatement::new(INCIDENTS)
        .value("title", incident.title.as_str())
        .value("type", incident.incident_type)
        .value("severity", incident.severity.as_str())
        .value("summary", incident.summary.as_str())
        .value("reporter", incident.reporter)
        .value("status", incident.status.as_str())
        .value("reported_at", incident.reported_at)
        .value_opt("category", incident.category.clone())
        .value_opt("impact", incident.impact.clone())
        .value_opt("lead", incident.lead)
        .value_opt("incident_source", incident.source.clone())
        .value_opt("impact_started_at", incident.impact_started_at)
        .value_opt("slack_thread", incident.slack_thread.clone())
        .returning("id")
        .to_sql()
}

/// One join row per distinct id, inside the caller's transaction
async fn insert_relations(
    conn: &mut PgConnection,
    kind: RelationKind,
    incident_id: i32,
    ids: &[i32],
) -> Result<(), DatabaseError> {
    for related_id in distinct_ids(ids) {
        let sql = InsertStatement::new(kind.join_table())
            .value("incident_id", incident_id)
            .value(kind.related_column(), related_id)
            .to_sql();
        sql.bind().execute(&mut *conn).await?;
    }
    Ok(())
}

#[async_trait]
impl IncidentRepository for PgIncidentRepository {
    async fn create_incident(&self, incident: &NewIncident) -> Result<i32, DatabaseError> {
        // Dropping `tx` on any early return rolls everything back.
        let mut tx = self.pool.begin().await?;

        let sql = create_incident_statement(incident);
        debug!(query = %sql.query, "Inserting incident");
        let row = sql.bind().fetch_one(&mut *tx).await?;
        let incident_id: i32 = row.try_get("id")?;

        let initial = [
            (RelationKind::Products, &incident.products),
            (RelationKind::Areas, &incident.areas),
            (RelationKind::PerformanceIndicators, &incident.indicators),
        ];
        for (kind, ids) in initial {
            insert_relations(&mut *tx, kind, incident_id, ids).await?;
        }

        tx.commit().await?;
        info!(incident_id, "Created incident and related data");
        Ok(incident_id)
    }

    async fn get_incidents(&self, filter: &IncidentFilter) -> Result<Vec<IncidentOverview>, DatabaseError> {
        let sql = incident_list_query(filter);
        debug!(query = %sql.query, "Listing incidents");

        let rows = sql.bind().fetch_all(&self.pool).await?;
        let incidents = rows
            .iter()
            .map(IncidentOverview::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = incidents.len(), "Retrieved incidents");
        Ok(incidents)
    }

    async fn get_incident_by_id(&self, id: i32) -> Result<IncidentDetail, DatabaseError> {
        let record = sqlx::query_as::<_, IncidentRecord>(DETAIL_QUERY)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("incident with ID {} not found", id)))?;

        let mut detail = IncidentDetail::new(record);
        for kind in RelationKind::ALL {
            let query = relation_names_query(kind);
            let items = sqlx::query_as::<_, OptionItem>(&query)
                .bind(id)
                .fetch_all(&self.pool)
                .await?;
            *detail.relation_mut(kind) = items;
        }

        Ok(detail)
    }

    async fn update_summary(&self, id: i32, summary: &str) -> Result<(), DatabaseError> {
        self.update_column(id, "summary", summary.into()).await
    }

    async fn update_status(&self, id: i32, status: &str) -> Result<(), DatabaseError> {
        self.update_column(id, "status", status.into()).await
    }

    async fn update_severity(&self, id: i32, severity: &str) -> Result<(), DatabaseError> {
        self.update_column(id, "severity", severity.into()).await
    }

    async fn update_type(&self, id: i32, incident_type: i32) -> Result<(), DatabaseError> {
        self.update_column(id, "type", incident_type.into()).await
    }

    async fn update_roles(&self, roles: &IncidentRolesUpdate) -> Result<(), DatabaseError> {
        let statement = UpdateStatement::new(INCIDENTS, "id", roles.id)
            .set_opt("lead", roles.lead)
            .set_opt("qe", roles.qe);

        let Some(sql) = statement.to_sql() else {
            debug!(incident_id = roles.id, "No roles to update");
            return Ok(());
        };

        let result = sql.bind().execute(&self.pool).await?;
        ensure_affected(result.rows_affected(), roles.id)?;

        info!(incident_id = roles.id, "Updated incident roles");
        Ok(())
    }

    async fn update_custom_fields(&self, update: &IncidentCustomFieldsUpdate) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so concurrent replacements of the same incident serialize.
        let exists = sqlx::query("SELECT id FROM incidents WHERE id = $1 FOR UPDATE")
            .bind(update.id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DatabaseError::NotFound(format!("incident with ID {} not found", update.id)));
        }

        let fields = UpdateStatement::new(INCIDENTS, "id", update.id)
            .set_opt("impact", update.impact.clone())
            .set_opt("treatment", update.treatment.clone())
            .set_opt("mitigator", update.mitigator.clone());
        if let Some(sql) = fields.to_sql() {
            debug!(query = %sql.query, "Updating incident fields");
            sql.bind().execute(&mut *tx).await?;
        }

        for kind in RelationKind::ALL {
            sqlx::query(&delete_relations_query(kind))
                .bind(update.id)
                .execute(&mut *tx)
                .await?;
            insert_relations(&mut *tx, kind, update.id, update.relation(kind)).await?;
        }

        tx.commit().await?;
        info!(incident_id = update.id, "Updated incident custom fields");
        Ok(())
    }
}
