//! Equipment repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use super::EquipmentStore;
use crate::{
    error::AppResult,
    models::{
        equipment::{Equipment, EquipmentForm, EquipmentStatus, RemovalOutcome},
        pagination::{Page, PageRequest},
    },
};

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentStore for EquipmentRepository {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(
        &self,
        status: Option<EquipmentStatus>,
        page: &PageRequest,
    ) -> AppResult<Page<Equipment>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM equipment WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        if total == 0 {
            return Ok(Page::empty(page));
        }

        let query = format!(
            r#"
            SELECT e.* FROM equipment e
            WHERE ($1::text IS NULL OR e.status = $1)
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            page.order_by("e")
        );

        let rows = sqlx::query_as::<_, Equipment>(&query)
            .bind(status)
            .bind(page.size)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(rows, total, page))
    }

    async fn create(&self, form: &EquipmentForm, status: EquipmentStatus) -> AppResult<Equipment> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (name, description, brand, category, image_url, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&form.name)
        .bind(&form.description)
        .bind(&form.brand)
        .bind(&form.category)
        .bind(&form.image_url)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, form: &EquipmentForm) -> AppResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment
            SET name = $1, description = $2, brand = $3, category = $4, image_url = $5,
                updated_at = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&form.name)
        .bind(&form.description)
        .bind(&form.brand)
        .bind(&form.category)
        .bind(&form.image_url)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn set_status(&self, id: i64, status: EquipmentStatus) -> AppResult<Option<Equipment>> {
        let row = sqlx::query_as::<_, Equipment>(
            "UPDATE equipment SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn remove(&self, id: i64) -> AppResult<Option<RemovalOutcome>> {
        let mut tx = self.pool.begin().await?;

        // Opening a loan updates this row first, so holding the lock keeps
        // new loans out until the removal commits
        let status: Option<EquipmentStatus> =
            sqlx::query_scalar("SELECT status FROM equipment WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        match status {
            None | Some(EquipmentStatus::Unavailable) => return Ok(None),
            Some(_) => {}
        }

        let has_history: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE equipment_id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        let outcome = if has_history {
            sqlx::query("UPDATE equipment SET status = $1, updated_at = $2 WHERE id = $3")
                .bind(EquipmentStatus::Inactive)
                .bind(Utc::now())
                .bind(id)
                .execute(&mut *tx)
                .await?;
            RemovalOutcome::Inactivated
        } else {
            sqlx::query("DELETE FROM equipment WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            RemovalOutcome::Deleted
        };

        tx.commit().await?;
        Ok(Some(outcome))
    }
}
