use std::sync::Arc;

use super::ServiceError;
use crate::database::models::{OptionItem, OptionKind};
use crate::database::repositories::OptionsRepository;

/// Read-only access to the classification lookup tables
pub struct OptionsService {
    options: Arc<dyn OptionsRepository>,
}

impl OptionsService {
    pub fn new(options: Arc<dyn OptionsRepository>) -> Self {
        Self { options }
    }

    pub async fn list(&self, kind: OptionKind) -> Result<Vec<OptionItem>, ServiceError> {
        Ok(self.options.list_active(kind).await?)
    }
}
