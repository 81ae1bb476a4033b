//! API handlers for Gerenciador REST endpoints

pub mod auth;
pub mod equipment;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Users
        .route("/usuarios", post(users::create_user))
        .route("/usuarios/:id", get(users::get_user))
        // Equipment
        .route(
            "/equipamentos",
            get(equipment::list_equipment).post(equipment::create_equipment),
        )
        .route("/equipamentos/status/:status", get(equipment::list_equipment_by_status))
        .route(
            "/equipamentos/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        .route("/equipamentos/:id/status", put(equipment::change_equipment_status))
        // Loans
        .route("/emprestimos", get(loans::list_loans))
        .route("/emprestimos/encerrados", get(loans::list_closed_loans))
        .route("/emprestimos/vigentes", get(loans::list_open_loans))
        .route("/emprestimos/usuario/:id", get(loans::list_user_loans))
        .route("/emprestimos/encerrados/usuario/:id", get(loans::list_user_closed_loans))
        .route("/emprestimos/vigentes/usuario/:id", get(loans::list_user_open_loans))
        .route("/emprestimos/encerrar/:id", put(loans::close_loan))
        .route("/emprestimos/:id", get(loans::get_loan).post(loans::open_loan))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
