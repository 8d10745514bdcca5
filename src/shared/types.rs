use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned for every non-validation error
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
