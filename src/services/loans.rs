//! Loan management service

use std::sync::Arc;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::EquipmentStatus,
        loan::{LoanDetails, LoanFilter, LoanState},
        pagination::{Page, PageRequest},
        user::Requester,
    },
    repository::{EquipmentStore, LoanStore},
};

#[derive(Clone)]
pub struct LoansService {
    loans: Arc<dyn LoanStore>,
    equipment: Arc<dyn EquipmentStore>,
}

impl LoansService {
    pub fn new(loans: Arc<dyn LoanStore>, equipment: Arc<dyn EquipmentStore>) -> Self {
        Self { loans, equipment }
    }

    /// List every loan, optionally only open or only closed ones
    pub async fn list(
        &self,
        state: Option<LoanState>,
        page: &PageRequest,
    ) -> AppResult<Page<LoanDetails>> {
        self.loans.list(LoanFilter::with_state(state), page).await
    }

    /// List the loans of one borrower
    pub async fn list_by_user(
        &self,
        user_id: i64,
        state: Option<LoanState>,
        requester: &Requester,
        page: &PageRequest,
    ) -> AppResult<Page<LoanDetails>> {
        requester.ensure_can_access(user_id)?;
        self.loans
            .list(LoanFilter::with_state(state).for_user(user_id), page)
            .await
    }

    pub async fn get_by_id(&self, id: i64, requester: &Requester) -> AppResult<LoanDetails> {
        let loan = self
            .loans
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan {} not found", id)))?;
        requester.ensure_can_access(loan.user.id)?;
        Ok(loan)
    }

    /// Borrow an equipment item on behalf of the requester
    pub async fn open(&self, equipment_id: i64, requester: &Requester) -> AppResult<LoanDetails> {
        let equipment = self
            .equipment
            .get_by_id(equipment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", equipment_id)))?;

        if equipment.status != EquipmentStatus::Available {
            return Err(AppError::EquipmentNotAvailable(format!(
                "Equipment {} is {} and cannot be borrowed",
                equipment_id, equipment.status
            )));
        }

        let loan = self
            .loans
            .open(equipment_id, requester.user_id, Utc::now())
            .await?;

        tracing::info!(
            loan_id = loan.id,
            equipment_id,
            user_id = requester.user_id,
            "Loan opened"
        );
        Ok(loan)
    }

    /// Return the equipment: close the loan and make the item available again
    pub async fn close(&self, id: i64, requester: &Requester) -> AppResult<LoanDetails> {
        let loan = self.get_by_id(id, requester).await?;

        if !loan.is_open() {
            return Err(AppError::OperationNotAllowed(format!(
                "Loan {} is already closed",
                id
            )));
        }

        let closed = self.loans.close(id, Utc::now()).await?;
        tracing::info!(
            loan_id = id,
            equipment_id = closed.equipment.id,
            "Loan closed"
        );
        Ok(closed)
    }
}
