pub mod auth;
pub mod crop;
pub mod customer;
pub mod dashboard;
pub mod field;
pub mod harvest;
pub mod input;
pub mod livestock;
pub mod product;
pub mod sale;
pub mod task;
pub mod utility;
pub mod view;

use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AgriError, AgriResult};
use crate::validation::ValidationErrors;

#[derive(Debug, Deserialize)]
pub struct IdPayload {
    pub id: Uuid,
}

pub(crate) fn require_id(id: Option<Uuid>) -> AgriResult<Uuid> {
    match id {
        Some(id) => Ok(id),
        None => {
            let mut errors = ValidationErrors::default();
            errors.add("id", "Record id is required");
            Err(AgriError::Validation(errors))
        }
    }
}
