//! Equipment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        equipment::{ChangeStatusRequest, Equipment, EquipmentForm, EQUIPMENT_SORT_FIELDS},
        pagination::{EquipmentPage, PageQuery},
    },
    AppState,
};

use super::AuthenticatedUser;

/// Plain confirmation message
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// List all equipment
#[utoipa::path(
    get,
    path = "/equipamentos",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Equipment page", body = EquipmentPage),
        (status = 400, description = "Invalid pagination parameters")
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<EquipmentPage>> {
    let page = query.resolve(&state.config.pagination, EQUIPMENT_SORT_FIELDS)?;
    Ok(Json(state.services.equipment.list(&page).await?))
}

/// List equipment with a given status
#[utoipa::path(
    get,
    path = "/equipamentos/status/{status}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(
        ("status" = String, Path, description = "DISPONIVEL, INDISPONIVEL or INATIVO"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Equipment page", body = EquipmentPage),
        (status = 400, description = "Unknown status")
    )
)]
pub async fn list_equipment_by_status(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(status): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<EquipmentPage>> {
    let page = query.resolve(&state.config.pagination, EQUIPMENT_SORT_FIELDS)?;
    Ok(Json(state.services.equipment.list_by_status(&status, &page).await?))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipamentos/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Equipment>> {
    Ok(Json(state.services.equipment.get_by_id(id).await?))
}

/// Register equipment
#[utoipa::path(
    post,
    path = "/equipamentos",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = EquipmentForm,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Invalid form"),
        (status = 403, description = "Administrator privileges required")
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(form): Json<EquipmentForm>,
) -> AppResult<Response> {
    claims.requester().require_admin()?;
    form.validate()?;

    let equipment = state.services.equipment.register(&form).await?;
    let location = format!("/equipamentos/{}", equipment.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(equipment)).into_response())
}

/// Update equipment details
#[utoipa::path(
    put,
    path = "/equipamentos/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    request_body = EquipmentForm,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(form): Json<EquipmentForm>,
) -> AppResult<Json<Equipment>> {
    claims.requester().require_admin()?;
    form.validate()?;
    Ok(Json(state.services.equipment.update(id, &form).await?))
}

/// Change equipment status
#[utoipa::path(
    put,
    path = "/equipamentos/{id}/status",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = Equipment),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment has an open loan")
    )
)]
pub async fn change_equipment_status(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
    Json(request): Json<ChangeStatusRequest>,
) -> AppResult<Json<Equipment>> {
    claims.requester().require_admin()?;
    let status = request.status.parse()?;
    Ok(Json(state.services.equipment.change_status(id, status).await?))
}

/// Delete equipment, or inactivate it when it has loan history
#[utoipa::path(
    delete,
    path = "/equipamentos/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment deleted or inactivated", body = MessageResponse),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment is on loan")
    )
)]
pub async fn delete_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    claims.requester().require_admin()?;
    let outcome = state.services.equipment.remove(id).await?;
    Ok(Json(MessageResponse {
        message: outcome.message().to_string(),
    }))
}
