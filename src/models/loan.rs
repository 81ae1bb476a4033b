//! Loan (empréstimo) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{
    equipment::{EquipmentStatus, EquipmentSummary},
    user::UserSummary,
};

/// Columns a listing of loans may be sorted by
pub const LOAN_SORT_FIELDS: &[&str] = &["id", "start_date", "end_date"];

/// Open (vigente) or closed (encerrado)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoanState {
    #[serde(rename = "VIGENTE")]
    Open,
    #[serde(rename = "ENCERRADO")]
    Closed,
}

/// Loan with the borrowed equipment and the borrower
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    /// Null while the loan is open
    pub end_date: Option<DateTime<Utc>>,
    pub state: LoanState,
    pub equipment: EquipmentSummary,
    pub user: UserSummary,
}

impl LoanDetails {
    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Flat row produced by the loans/equipment/users join
#[derive(Debug, Clone, FromRow)]
pub struct LoanDetailsRow {
    pub id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub equipment_id: i64,
    pub equipment_name: String,
    pub equipment_brand: String,
    pub equipment_category: String,
    pub equipment_status: EquipmentStatus,
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
}

impl From<LoanDetailsRow> for LoanDetails {
    fn from(row: LoanDetailsRow) -> Self {
        Self {
            id: row.id,
            start_date: row.start_date,
            end_date: row.end_date,
            state: if row.end_date.is_none() {
                LoanState::Open
            } else {
                LoanState::Closed
            },
            equipment: EquipmentSummary {
                id: row.equipment_id,
                name: row.equipment_name,
                brand: row.equipment_brand,
                category: row.equipment_category,
                status: row.equipment_status,
            },
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
        }
    }
}

/// Which loans a listing covers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoanFilter {
    /// None lists both open and closed loans
    pub state: Option<LoanState>,
    pub user_id: Option<i64>,
}

impl LoanFilter {
    pub fn with_state(state: Option<LoanState>) -> Self {
        Self { state, user_id: None }
    }

    pub fn for_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Some(true) when only open loans match
    pub fn open_only(&self) -> Option<bool> {
        self.state.map(|s| s == LoanState::Open)
    }

    pub fn matches(&self, loan: &LoanDetails) -> bool {
        self.state.map_or(true, |s| s == loan.state)
            && self.user_id.map_or(true, |id| id == loan.user.id)
    }
}
