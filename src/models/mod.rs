//! Data models for Gerenciador

pub mod equipment;
pub mod loan;
pub mod pagination;
pub mod user;

// Re-export commonly used types
pub use equipment::{Equipment, EquipmentForm, EquipmentStatus, EquipmentSummary, RemovalOutcome};
pub use loan::{LoanDetails, LoanFilter, LoanState};
pub use pagination::{Page, PageQuery, PageRequest, SortDirection};
pub use user::{Requester, Role, User, UserClaims, UserSummary};
