use async_trait::async_trait;
use sqlx::PgPool;

use super::OptionsRepository;
use crate::database::manager::DatabaseError;
use crate::database::models::{OptionItem, OptionKind};
use crate::database::statement::quote_identifier;

pub struct PgOptionsRepository {
    pool: PgPool,
}

impl PgOptionsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn active_options_query(kind: OptionKind) -> String {
    format!(
        "SELECT id, name FROM {} WHERE active = true ORDER BY id",
        quote_identifier(kind.table())
    )
}

#[async_trait]
impl OptionsRepository for PgOptionsRepository {
    async fn list_active(&self, kind: OptionKind) -> Result<Vec<OptionItem>, DatabaseError> {
        let query = active_options_query(kind);
        let items = sqlx::query_as::<_, OptionItem>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}
