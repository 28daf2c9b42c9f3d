//! Rutas del ciclo de vida de contratos

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::{ApiResponse, PaginatedResponse};
use crate::dto::contract_dto::{ContractFilters, ContractResponse, VoidContractRequest};
use crate::middleware::auth::AuthenticatedAccount;
use crate::services::ContractService;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_contract_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contracts))
        .route("/:id", get(get_contract))
        .route("/:id/submit", post(submit_contract))
        .route("/:id/sign", post(sign_contract))
        .route("/:id/complete", post(complete_contract))
        .route("/:id/void", post(void_contract))
}

async fn list_contracts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Query(filters): Query<ContractFilters>,
) -> Result<Json<ApiResponse<PaginatedResponse<ContractResponse>>>, AppError> {
    let service = ContractService::new(state.pool.clone());
    let response = service.list(&auth, filters).await?;

    Ok(Json(ApiResponse::success(response)))
}

async fn get_contract(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ContractResponse>>, AppError> {
    let service = ContractService::new(state.pool.clone());
    let response = service.get(&auth, id).await?;

    Ok(Json(ApiResponse::success(response)))
}

async fn submit_contract(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ContractResponse>>, AppError> {
    let service = ContractService::new(state.pool.clone());
    let response = service.submit(&auth, id).await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Contrato presentado para firma".to_string(),
    )))
}

async fn sign_contract(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ContractResponse>>, AppError> {
    let service = ContractService::new(state.pool.clone());
    let response = service.sign(&auth, id).await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Firma registrada".to_string(),
    )))
}

async fn complete_contract(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ContractResponse>>, AppError> {
    let service = ContractService::new(state.pool.clone());
    let response = service.complete(&auth, id).await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Contrato completado".to_string(),
    )))
}

async fn void_contract(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
    Json(request): Json<VoidContractRequest>,
) -> Result<Json<ApiResponse<ContractResponse>>, AppError> {
    request.validate()?;

    let service = ContractService::new(state.pool.clone());
    let response = service.void(&auth, id, request).await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Contrato anulado".to_string(),
    )))
}
