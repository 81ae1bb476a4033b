//! Shared fixtures for router tests: an in-memory store behind the store traits

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use gerenciador_server::{
    api,
    config::AppConfig,
    error::{AppError, AppResult},
    models::{
        equipment::{Equipment, EquipmentForm, EquipmentStatus, EquipmentSummary, RemovalOutcome},
        loan::{LoanDetails, LoanFilter, LoanState},
        pagination::{Page, PageRequest, SortDirection},
        user::{Role, User, UserClaims},
    },
    repository::{EquipmentStore, HealthCheck, LoanStore, Repository, UserStore},
    services::{users::hash_password, Services},
    AppState,
};

#[derive(Clone)]
struct LoanRecord {
    id: i64,
    equipment_id: i64,
    user_id: i64,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Tables {
    equipment: Vec<Equipment>,
    loans: Vec<LoanRecord>,
    users: Vec<User>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn details(&self, loan: &LoanRecord) -> Option<LoanDetails> {
        let equipment = self.equipment.iter().find(|e| e.id == loan.equipment_id)?;
        let user = self.users.iter().find(|u| u.id == loan.user_id)?;
        Some(LoanDetails {
            id: loan.id,
            start_date: loan.start_date,
            end_date: loan.end_date,
            state: if loan.end_date.is_none() {
                LoanState::Open
            } else {
                LoanState::Closed
            },
            equipment: EquipmentSummary {
                id: equipment.id,
                name: equipment.name.clone(),
                brand: equipment.brand.clone(),
                category: equipment.category.clone(),
                status: equipment.status,
            },
            user: user.summary(),
        })
    }

    fn set_equipment_status(&mut self, id: i64, status: EquipmentStatus) -> Option<Equipment> {
        let equipment = self.equipment.iter_mut().find(|e| e.id == id)?;
        equipment.status = status;
        equipment.updated_at = Utc::now();
        Some(equipment.clone())
    }
}

fn paginate<T: Clone + for<'a> utoipa::ToSchema<'a>>(
    mut items: Vec<T>,
    id_of: impl Fn(&T) -> i64,
    page: &PageRequest,
) -> Page<T> {
    items.sort_by_key(|item| id_of(item));
    if page.direction == SortDirection::Desc {
        items.reverse();
    }
    let total = items.len() as i64;
    let rows = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.size as usize)
        .collect();
    Page::new(rows, total, page)
}

/// Store with the same guarded-write semantics as the Postgres repositories
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn add_user(&self, name: &str, email: &str, role: Role) -> User {
        let mut tables = self.tables.lock().unwrap();
        let user = User {
            id: tables.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password("secret123").unwrap(),
            role,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        user
    }

    pub fn add_equipment(&self, name: &str, status: EquipmentStatus) -> Equipment {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let equipment = Equipment {
            id: tables.next_id(),
            name: name.to_string(),
            description: format!("{} for field recordings", name),
            brand: "Zoom".to_string(),
            category: "Audio".to_string(),
            image_url: None,
            status,
            created_at: now,
            updated_at: now,
        };
        tables.equipment.push(equipment.clone());
        equipment
    }

    pub fn equipment_status(&self, id: i64) -> Option<EquipmentStatus> {
        let tables = self.tables.lock().unwrap();
        tables.equipment.iter().find(|e| e.id == id).map(|e| e.status)
    }
}

#[async_trait]
impl EquipmentStore for InMemoryStore {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<Equipment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.equipment.iter().find(|e| e.id == id).cloned())
    }

    async fn list(
        &self,
        status: Option<EquipmentStatus>,
        page: &PageRequest,
    ) -> AppResult<Page<Equipment>> {
        let tables = self.tables.lock().unwrap();
        let items = tables
            .equipment
            .iter()
            .filter(|e| status.map_or(true, |s| e.status == s))
            .cloned()
            .collect();
        Ok(paginate(items, |e| e.id, page))
    }

    async fn create(&self, form: &EquipmentForm, status: EquipmentStatus) -> AppResult<Equipment> {
        let mut tables = self.tables.lock().unwrap();
        let now = Utc::now();
        let equipment = Equipment {
            id: tables.next_id(),
            name: form.name.clone(),
            description: form.description.clone(),
            brand: form.brand.clone(),
            category: form.category.clone(),
            image_url: form.image_url.clone(),
            status,
            created_at: now,
            updated_at: now,
        };
        tables.equipment.push(equipment.clone());
        Ok(equipment)
    }

    async fn update(&self, id: i64, form: &EquipmentForm) -> AppResult<Option<Equipment>> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.equipment.iter_mut().find(|e| e.id == id).map(|e| {
            e.name = form.name.clone();
            e.description = form.description.clone();
            e.brand = form.brand.clone();
            e.category = form.category.clone();
            e.image_url = form.image_url.clone();
            e.updated_at = Utc::now();
            e.clone()
        }))
    }

    async fn set_status(&self, id: i64, status: EquipmentStatus) -> AppResult<Option<Equipment>> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.set_equipment_status(id, status))
    }

    async fn remove(&self, id: i64) -> AppResult<Option<RemovalOutcome>> {
        let mut tables = self.tables.lock().unwrap();
        let removable = tables
            .equipment
            .iter()
            .any(|e| e.id == id && e.status != EquipmentStatus::Unavailable);
        if !removable {
            return Ok(None);
        }
        if tables.loans.iter().any(|l| l.equipment_id == id) {
            tables.set_equipment_status(id, EquipmentStatus::Inactive);
            Ok(Some(RemovalOutcome::Inactivated))
        } else {
            tables.equipment.retain(|e| e.id != id);
            Ok(Some(RemovalOutcome::Deleted))
        }
    }
}

#[async_trait]
impl LoanStore for InMemoryStore {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<LoanDetails>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .loans
            .iter()
            .find(|l| l.id == id)
            .and_then(|l| tables.details(l)))
    }

    async fn list(&self, filter: LoanFilter, page: &PageRequest) -> AppResult<Page<LoanDetails>> {
        let tables = self.tables.lock().unwrap();
        let items = tables
            .loans
            .iter()
            .filter_map(|l| tables.details(l))
            .filter(|l| filter.matches(l))
            .collect();
        Ok(paginate(items, |l| l.id, page))
    }

    async fn has_open_loan(&self, equipment_id: i64) -> AppResult<bool> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .loans
            .iter()
            .any(|l| l.equipment_id == equipment_id && l.end_date.is_none()))
    }

    async fn open(
        &self,
        equipment_id: i64,
        user_id: i64,
        started_at: DateTime<Utc>,
    ) -> AppResult<LoanDetails> {
        let mut tables = self.tables.lock().unwrap();
        let available = tables
            .equipment
            .iter()
            .any(|e| e.id == equipment_id && e.status == EquipmentStatus::Available);
        if !available {
            return Err(AppError::EquipmentNotAvailable(format!(
                "Equipment {} is not available for loan",
                equipment_id
            )));
        }
        tables.set_equipment_status(equipment_id, EquipmentStatus::Unavailable);
        let record = LoanRecord {
            id: tables.next_id(),
            equipment_id,
            user_id,
            start_date: started_at,
            end_date: None,
        };
        tables.loans.push(record.clone());
        tables
            .details(&record)
            .ok_or_else(|| AppError::Internal("dangling loan".to_string()))
    }

    async fn close(&self, id: i64, ended_at: DateTime<Utc>) -> AppResult<LoanDetails> {
        let mut tables = self.tables.lock().unwrap();
        let record = match tables.loans.iter_mut().find(|l| l.id == id) {
            Some(loan) if loan.end_date.is_none() => {
                loan.end_date = Some(ended_at);
                loan.clone()
            }
            _ => {
                return Err(AppError::OperationNotAllowed(format!(
                    "Loan {} is already closed",
                    id
                )))
            }
        };
        tables.set_equipment_status(record.equipment_id, EquipmentStatus::Available);
        tables
            .details(&record)
            .ok_or_else(|| AppError::Internal("dangling loan".to_string()))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> AppResult<User> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(AppError::Conflict(format!("Email {} is already registered", email)));
        }
        let user = User {
            id: tables.next_id(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.tables.lock().unwrap().users.len() as i64)
    }
}

#[async_trait]
impl HealthCheck for InMemoryStore {
    async fn check_db(&self) -> bool {
        true
    }
}

/// Router wired to a fresh in-memory store
pub struct TestApp {
    pub store: InMemoryStore,
    pub config: AppConfig,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = InMemoryStore::default();
        let config = AppConfig::default();
        let shared = Arc::new(store.clone());
        let repository = Repository {
            equipment: shared.clone(),
            loans: shared.clone(),
            users: shared.clone(),
            health: shared,
        };
        let services = Services::new(repository, config.auth.clone());
        let state = AppState {
            config: Arc::new(config.clone()),
            services: Arc::new(services),
        };
        Self {
            store,
            config,
            router: api::router(state),
        }
    }

    pub fn token_for(&self, user: &User) -> String {
        UserClaims::new(user, self.config.auth.jwt_expiration_hours)
            .create_token(&self.config.auth.jwt_secret)
            .unwrap()
    }

    /// Send a request and return the status with the decoded JSON body (Null when empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (axum::http::StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
