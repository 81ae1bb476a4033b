//! Business logic services

pub mod equipment;
pub mod loans;
pub mod users;

use std::sync::Arc;

use crate::{config::AuthConfig, repository::{HealthCheck, Repository}};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub equipment: equipment::EquipmentService,
    pub loans: loans::LoansService,
    pub users: users::UsersService,
    pub health: Arc<dyn HealthCheck>,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            equipment: equipment::EquipmentService::new(
                repository.equipment.clone(),
                repository.loans.clone(),
            ),
            loans: loans::LoansService::new(repository.loans.clone(), repository.equipment.clone()),
            users: users::UsersService::new(repository.users.clone(), auth_config),
            health: repository.health,
        }
    }
}
