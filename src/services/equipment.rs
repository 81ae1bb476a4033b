//! Equipment lifecycle service

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{Equipment, EquipmentForm, EquipmentStatus, RemovalOutcome},
        pagination::{Page, PageRequest},
    },
    repository::{EquipmentStore, LoanStore},
};

#[derive(Clone)]
pub struct EquipmentService {
    equipment: Arc<dyn EquipmentStore>,
    loans: Arc<dyn LoanStore>,
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Equipment {} not found", id))
}

fn on_loan(status: EquipmentStatus) -> AppError {
    AppError::OperationNotAllowed(format!(
        "Equipment status is {}, so it cannot be inactivated or deleted",
        status
    ))
}

impl EquipmentService {
    pub fn new(equipment: Arc<dyn EquipmentStore>, loans: Arc<dyn LoanStore>) -> Self {
        Self { equipment, loans }
    }

    /// Register new equipment, DISPONIVEL unless the form says otherwise
    pub async fn register(&self, form: &EquipmentForm) -> AppResult<Equipment> {
        let status = form.status.unwrap_or(EquipmentStatus::Available);
        let equipment = self.equipment.create(form, status).await?;
        tracing::info!(equipment_id = equipment.id, %status, "Equipment registered");
        Ok(equipment)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Equipment> {
        self.equipment.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list(&self, page: &PageRequest) -> AppResult<Page<Equipment>> {
        self.equipment.list(None, page).await
    }

    /// List by a status filter as received from the client
    pub async fn list_by_status(&self, status: &str, page: &PageRequest) -> AppResult<Page<Equipment>> {
        let status: EquipmentStatus = status.parse()?;
        self.equipment.list(Some(status), page).await
    }

    pub async fn update(&self, id: i64, form: &EquipmentForm) -> AppResult<Equipment> {
        self.equipment.update(id, form).await?.ok_or_else(|| not_found(id))
    }

    pub async fn change_status(&self, id: i64, status: EquipmentStatus) -> AppResult<Equipment> {
        let equipment = self.get_by_id(id).await?;

        if self.loans.has_open_loan(id).await? {
            return Err(AppError::OperationNotAllowed(format!(
                "Equipment {} has an open loan; close it before changing the status",
                id
            )));
        }
        if equipment.status == EquipmentStatus::Unavailable && status == EquipmentStatus::Inactive {
            return Err(on_loan(equipment.status));
        }

        let updated = self
            .equipment
            .set_status(id, status)
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(equipment_id = id, from = %equipment.status, to = %status, "Equipment status changed");
        Ok(updated)
    }

    /// Delete equipment that was never lent, inactivate equipment with loan history.
    /// Equipment currently on loan is never removed.
    pub async fn remove(&self, id: i64) -> AppResult<RemovalOutcome> {
        let equipment = self.get_by_id(id).await?;

        if equipment.status == EquipmentStatus::Unavailable {
            return Err(on_loan(equipment.status));
        }

        let Some(outcome) = self.equipment.remove(id).await? else {
            // Went on loan or was deleted since the read above
            return Err(match self.equipment.get_by_id(id).await? {
                Some(current) => on_loan(current.status),
                None => not_found(id),
            });
        };

        tracing::info!(equipment_id = id, ?outcome, "Equipment removed");
        Ok(outcome)
    }
}
