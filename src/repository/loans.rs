//! Loans repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use super::LoanStore;
use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::EquipmentStatus,
        loan::{LoanDetails, LoanDetailsRow, LoanFilter},
        pagination::{Page, PageRequest},
    },
};

const LOAN_DETAILS_SELECT: &str = r#"
    SELECT l.id, l.start_date, l.end_date,
           e.id AS equipment_id, e.name AS equipment_name, e.brand AS equipment_brand,
           e.category AS equipment_category, e.status AS equipment_status,
           u.id AS user_id, u.name AS user_name, u.email AS user_email
    FROM loans l
    JOIN equipment e ON e.id = l.equipment_id
    JOIN users u ON u.id = l.user_id
"#;

const LOAN_FILTER_WHERE: &str = r#"
    WHERE ($1::bigint IS NULL OR l.user_id = $1)
      AND ($2::boolean IS NULL OR (l.end_date IS NULL) = $2)
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_details(&self, id: i64) -> AppResult<LoanDetails> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Loan {} vanished after write", id)))
    }
}

#[async_trait]
impl LoanStore for LoansRepository {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<LoanDetails>> {
        let query = format!("{} WHERE l.id = $1", LOAN_DETAILS_SELECT);
        let row = sqlx::query_as::<_, LoanDetailsRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(LoanDetails::from))
    }

    async fn list(&self, filter: LoanFilter, page: &PageRequest) -> AppResult<Page<LoanDetails>> {
        let count_query = format!("SELECT COUNT(*) FROM loans l {}", LOAN_FILTER_WHERE);
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(filter.user_id)
            .bind(filter.open_only())
            .fetch_one(&self.pool)
            .await?;

        if total == 0 {
            return Ok(Page::empty(page));
        }

        let query = format!(
            "{} {} ORDER BY {} LIMIT $3 OFFSET $4",
            LOAN_DETAILS_SELECT,
            LOAN_FILTER_WHERE,
            page.order_by("l")
        );

        let rows = sqlx::query_as::<_, LoanDetailsRow>(&query)
            .bind(filter.user_id)
            .bind(filter.open_only())
            .bind(page.size)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(
            rows.into_iter().map(LoanDetails::from).collect(),
            total,
            page,
        ))
    }

    async fn has_open_loan(&self, equipment_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE equipment_id = $1 AND end_date IS NULL)",
        )
        .bind(equipment_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn open(
        &self,
        equipment_id: i64,
        user_id: i64,
        started_at: DateTime<Utc>,
    ) -> AppResult<LoanDetails> {
        let mut tx = self.pool.begin().await?;

        // Conditional update: only one concurrent borrower can flip the status
        let reserved = sqlx::query(
            "UPDATE equipment SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
        )
        .bind(EquipmentStatus::Unavailable)
        .bind(started_at)
        .bind(equipment_id)
        .bind(EquipmentStatus::Available)
        .execute(&mut *tx)
        .await?;

        if reserved.rows_affected() == 0 {
            return Err(AppError::EquipmentNotAvailable(format!(
                "Equipment {} is not available for loan",
                equipment_id
            )));
        }

        let loan_id: i64 = sqlx::query_scalar(
            "INSERT INTO loans (equipment_id, user_id, start_date) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(equipment_id)
        .bind(user_id)
        .bind(started_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        self.fetch_details(loan_id).await
    }

    async fn close(&self, id: i64, ended_at: DateTime<Utc>) -> AppResult<LoanDetails> {
        let mut tx = self.pool.begin().await?;

        let equipment_id: Option<i64> = sqlx::query_scalar(
            "UPDATE loans SET end_date = $1 WHERE id = $2 AND end_date IS NULL RETURNING equipment_id",
        )
        .bind(ended_at)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(equipment_id) = equipment_id else {
            return Err(AppError::OperationNotAllowed(format!(
                "Loan {} is already closed",
                id
            )));
        };

        sqlx::query("UPDATE equipment SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(EquipmentStatus::Available)
            .bind(ended_at)
            .bind(equipment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.fetch_details(id).await
    }
}
