//! Loan management endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::AppResult,
    models::{
        loan::{LoanDetails, LoanState, LOAN_SORT_FIELDS},
        pagination::{LoanPage, PageQuery},
        user::UserClaims,
    },
    AppState,
};

use super::AuthenticatedUser;

async fn list_all(
    state: &AppState,
    loan_state: Option<LoanState>,
    query: &PageQuery,
) -> AppResult<Json<LoanPage>> {
    let page = query.resolve(&state.config.pagination, LOAN_SORT_FIELDS)?;
    let loans = state
        .services
        .loans
        .list(loan_state, &page)
        .await?;
    Ok(Json(loans))
}

async fn list_for_user(
    state: &AppState,
    claims: &UserClaims,
    user_id: i64,
    loan_state: Option<LoanState>,
    query: &PageQuery,
) -> AppResult<Json<LoanPage>> {
    let page = query.resolve(&state.config.pagination, LOAN_SORT_FIELDS)?;
    let loans = state
        .services
        .loans
        .list_by_user(user_id, loan_state, &claims.requester(), &page)
        .await?;
    Ok(Json(loans))
}

/// List all loans
#[utoipa::path(
    get,
    path = "/emprestimos",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Loan page", body = LoanPage)
    )
)]
pub async fn list_loans(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<LoanPage>> {
    list_all(&state, None, &query).await
}

/// List closed loans
#[utoipa::path(
    get,
    path = "/emprestimos/encerrados",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Closed loans", body = LoanPage)
    )
)]
pub async fn list_closed_loans(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<LoanPage>> {
    list_all(&state, Some(LoanState::Closed), &query).await
}

/// List open loans
#[utoipa::path(
    get,
    path = "/emprestimos/vigentes",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Open loans", body = LoanPage)
    )
)]
pub async fn list_open_loans(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<LoanPage>> {
    list_all(&state, Some(LoanState::Open), &query).await
}

/// List loans of a user
#[utoipa::path(
    get,
    path = "/emprestimos/usuario/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID"), PageQuery),
    responses(
        (status = 200, description = "User's loans", body = LoanPage),
        (status = 409, description = "Not your loans")
    )
)]
pub async fn list_user_loans(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<LoanPage>> {
    list_for_user(&state, &claims, user_id, None, &query).await
}

/// List closed loans of a user
#[utoipa::path(
    get,
    path = "/emprestimos/encerrados/usuario/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID"), PageQuery),
    responses(
        (status = 200, description = "User's closed loans", body = LoanPage),
        (status = 409, description = "Not your loans")
    )
)]
pub async fn list_user_closed_loans(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<LoanPage>> {
    list_for_user(&state, &claims, user_id, Some(LoanState::Closed), &query).await
}

/// List open loans of a user
#[utoipa::path(
    get,
    path = "/emprestimos/vigentes/usuario/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID"), PageQuery),
    responses(
        (status = 200, description = "User's open loans", body = LoanPage),
        (status = 409, description = "Not your loans")
    )
)]
pub async fn list_user_open_loans(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<LoanPage>> {
    list_for_user(&state, &claims, user_id, Some(LoanState::Open), &query).await
}

/// Get loan by ID
#[utoipa::path(
    get,
    path = "/emprestimos/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan details", body = LoanDetails),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Not your loan")
    )
)]
pub async fn get_loan(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.get_by_id(id, &claims.requester()).await?;
    Ok(Json(loan))
}

/// Borrow an equipment item
#[utoipa::path(
    post,
    path = "/emprestimos/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    responses(
        (status = 201, description = "Loan opened", body = LoanDetails),
        (status = 404, description = "Equipment not found"),
        (status = 409, description = "Equipment not available")
    )
)]
pub async fn open_loan(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(equipment_id): Path<i64>,
) -> AppResult<Response> {
    let loan = state
        .services
        .loans
        .open(equipment_id, &claims.requester())
        .await?;
    let location = format!("/emprestimos/{}", loan.id);
    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(loan)).into_response())
}

/// Close a loan (return the equipment)
#[utoipa::path(
    put,
    path = "/emprestimos/encerrar/{id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan closed", body = LoanDetails),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already closed or not yours")
    )
)]
pub async fn close_loan(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.close(id, &claims.requester()).await?;
    Ok(Json(loan))
}
