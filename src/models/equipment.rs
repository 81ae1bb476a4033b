//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Columns a listing of equipment may be sorted by
pub const EQUIPMENT_SORT_FIELDS: &[&str] = &["id", "name", "brand", "category", "status"];

/// Inventory status of an equipment item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String")]
pub enum EquipmentStatus {
    /// Can be borrowed
    #[serde(rename = "DISPONIVEL")]
    Available,
    /// Currently on loan
    #[serde(rename = "INDISPONIVEL")]
    Unavailable,
    /// Retired, kept for loan history
    #[serde(rename = "INATIVO")]
    Inactive,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Available => "DISPONIVEL",
            EquipmentStatus::Unavailable => "INDISPONIVEL",
            EquipmentStatus::Inactive => "INATIVO",
        }
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EquipmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('Í', "I");
        match normalized.as_str() {
            "DISPONIVEL" | "AVAILABLE" => Ok(EquipmentStatus::Available),
            "INDISPONIVEL" | "UNAVAILABLE" => Ok(EquipmentStatus::Unavailable),
            "INATIVO" | "INACTIVE" => Ok(EquipmentStatus::Inactive),
            _ => Err(AppError::InvalidArgument(format!("Unknown equipment status: {}", s))),
        }
    }
}

impl TryFrom<String> for EquipmentStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// SQLx conversion: stored as TEXT
impl sqlx::Type<Postgres> for EquipmentStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for EquipmentStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: AppError| e.to_string().into())
    }
}

impl Encode<'_, Postgres> for EquipmentStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category: String,
    /// Picture of the item (URL)
    pub image_url: Option<String>,
    pub status: EquipmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short equipment view embedded in loans
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentSummary {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub status: EquipmentStatus,
}

/// Create or update equipment request.
///
/// `status` is only honoured on creation; updates never touch it.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EquipmentForm {
    #[validate(length(min = 1, max = 120, message = "Name must be 1-120 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 1000, message = "Description must be 1-1000 characters"))]
    pub description: String,
    #[validate(length(min = 1, max = 120, message = "Brand must be 1-120 characters"))]
    pub brand: String,
    #[validate(length(min = 1, max = 120, message = "Category must be 1-120 characters"))]
    pub category: String,
    #[validate(url(message = "Image must be a valid URL"))]
    pub image_url: Option<String>,
    pub status: Option<EquipmentStatus>,
}

/// Change status request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeStatusRequest {
    /// DISPONIVEL, INDISPONIVEL or INATIVO
    pub status: String,
}

/// Result of removing an equipment item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// No loan history: the row is gone
    Deleted,
    /// Has loan history: kept as INATIVO
    Inactivated,
}

impl RemovalOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            RemovalOutcome::Deleted => "Equipment deleted successfully!",
            RemovalOutcome::Inactivated => "Equipment inactivated successfully!",
        }
    }
}
