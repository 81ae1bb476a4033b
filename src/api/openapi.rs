//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, equipment, health, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gerenciador API",
        version = "1.0.0",
        description = "Equipment inventory and loan management REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::create_user,
        users::get_user,
        // Equipment
        equipment::list_equipment,
        equipment::list_equipment_by_status,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::change_equipment_status,
        equipment::delete_equipment,
        // Loans
        loans::list_loans,
        loans::list_closed_loans,
        loans::list_open_loans,
        loans::list_user_loans,
        loans::list_user_closed_loans,
        loans::list_user_open_loans,
        loans::get_loan,
        loans::open_loan,
        loans::close_loan,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Users
            crate::models::user::User,
            crate::models::user::UserSummary,
            crate::models::user::CreateUser,
            crate::models::user::Role,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentSummary,
            crate::models::equipment::EquipmentForm,
            crate::models::equipment::EquipmentStatus,
            crate::models::equipment::ChangeStatusRequest,
            crate::models::pagination::EquipmentPage,
            equipment::MessageResponse,
            // Loans
            crate::models::loan::LoanDetails,
            crate::models::loan::LoanState,
            crate::models::pagination::LoanPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management"),
        (name = "equipment", description = "Equipment inventory"),
        (name = "loans", description = "Loan management")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
