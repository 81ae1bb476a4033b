//! Repository layer for database operations
//!
//! Services depend on the store traits below; the Postgres implementations
//! live in the submodules.

pub mod equipment;
pub mod loans;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        equipment::{Equipment, EquipmentForm, EquipmentStatus, RemovalOutcome},
        loan::{LoanDetails, LoanFilter},
        pagination::{Page, PageRequest},
        user::{Role, User},
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentStore: Send + Sync {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Equipment>>;
    /// Page of equipment, optionally restricted to one status
    async fn list(
        &self,
        status: Option<EquipmentStatus>,
        page: &PageRequest,
    ) -> AppResult<Page<Equipment>>;
    async fn create(&self, form: &EquipmentForm, status: EquipmentStatus) -> AppResult<Equipment>;
    /// Overwrites the descriptive fields; status is left untouched
    async fn update(&self, id: i64, form: &EquipmentForm) -> AppResult<Option<Equipment>>;
    async fn set_status(&self, id: i64, status: EquipmentStatus) -> AppResult<Option<Equipment>>;
    /// In one transaction with the equipment row locked: deletes an item that was
    /// never lent, moves one with loan history to INATIVO.
    /// None when the item is gone or INDISPONIVEL at lock time.
    async fn remove(&self, id: i64) -> AppResult<Option<RemovalOutcome>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoanStore: Send + Sync {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<LoanDetails>>;
    async fn list(&self, filter: LoanFilter, page: &PageRequest) -> AppResult<Page<LoanDetails>>;
    async fn has_open_loan(&self, equipment_id: i64) -> AppResult<bool>;
    /// Atomically marks the equipment INDISPONIVEL and inserts the open loan.
    /// Fails with `EquipmentNotAvailable` when the equipment is no longer DISPONIVEL.
    async fn open(
        &self,
        equipment_id: i64,
        user_id: i64,
        started_at: DateTime<Utc>,
    ) -> AppResult<LoanDetails>;
    /// Atomically sets the end date and makes the equipment DISPONIVEL again.
    /// Fails with `OperationNotAllowed` when the loan is already closed.
    async fn close(&self, id: i64, ended_at: DateTime<Utc>) -> AppResult<LoanDetails>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>>;
    /// Case-insensitive lookup
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<User>;
    async fn count(&self) -> AppResult<i64>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check_db(&self) -> bool;
}

/// Postgres liveness probe
pub struct PgHealthCheck {
    pool: Pool<Postgres>,
}

#[async_trait]
impl HealthCheck for PgHealthCheck {
    async fn check_db(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}

/// All stores used by the services
#[derive(Clone)]
pub struct Repository {
    pub equipment: Arc<dyn EquipmentStore>,
    pub loans: Arc<dyn LoanStore>,
    pub users: Arc<dyn UserStore>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            equipment: Arc::new(equipment::EquipmentRepository::new(pool.clone())),
            loans: Arc::new(loans::LoansRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            health: Arc::new(PgHealthCheck { pool }),
        }
    }
}
