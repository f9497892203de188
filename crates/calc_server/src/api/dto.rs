//! Wire shapes for `/api/history`.

use calc_core::{CalculationRecord, NewCalculation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored calculation as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub equation: String,
    pub result: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<CalculationRecord> for CalculationDto {
    fn from(value: CalculationRecord) -> Self {
        Self {
            id: value.id.to_string(),
            equation: value.equation,
            result: value.result,
            created_at: DateTime::<Utc>::from_timestamp_millis(value.created_at)
                .unwrap_or_default(),
        }
    }
}

/// Body of `POST /api/history`.
///
/// Fields are optional so that missing ones reach domain validation instead of
/// failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCalculationRequest {
    pub equation: Option<String>,
    pub result: Option<String>,
}

impl From<CreateCalculationRequest> for NewCalculation {
    fn from(value: CreateCalculationRequest) -> Self {
        NewCalculation::new(
            value.equation.unwrap_or_default(),
            value.result.unwrap_or_default(),
        )
    }
}

/// `{message}` body used by delete endpoints and every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
