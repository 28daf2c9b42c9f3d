//! Rutas del flujo de check-in

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::checkin_dto::{
    CheckinSessionResponse, ConditionRequest, InspectionPhotoResponse, RejectRequest,
    ScanQrRequest, VerifyDocumentsRequest,
};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::AuthenticatedAccount;
use crate::services::{CheckinSessionService, PhotoStorageService};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_checkin_router() -> Router<AppState> {
    Router::new()
        .route("/scan", post(scan_qr))
        .route("/:id", get(get_session))
        .route("/:id/documents", post(verify_documents))
        .route("/:id/photos", post(upload_photos))
        .route("/:id/condition", post(capture_condition))
        .route("/:id/complete", post(complete_checkin))
        .route("/:id/reject", post(reject_checkin))
}

fn service(state: &AppState) -> CheckinSessionService {
    let photos = PhotoStorageService::new(state.http_client.clone(), &state.config);
    CheckinSessionService::new(state.pool.clone(), photos)
}

async fn scan_qr(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Json(request): Json<ScanQrRequest>,
) -> Result<Json<ApiResponse<CheckinSessionResponse>>, AppError> {
    request.validate()?;

    let response = service(&state).scan(&auth, request).await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Sesión de check-in creada".to_string(),
    )))
}

async fn get_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CheckinSessionResponse>>, AppError> {
    let response = service(&state).get(&auth, id).await?;

    Ok(Json(ApiResponse::success(response)))
}

async fn verify_documents(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
    Json(request): Json<VerifyDocumentsRequest>,
) -> Result<Json<ApiResponse<CheckinSessionResponse>>, AppError> {
    request.validate()?;

    let response = service(&state).verify_documents(&auth, id, request).await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Documentos verificados".to_string(),
    )))
}

async fn upload_photos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Vec<InspectionPhotoResponse>>>, AppError> {
    // Recolectar los archivos del form multipart
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart inválido: {}", e)))?
    {
        let label = field.name().map(str::to_string);
        let filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "photo.jpg".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Error leyendo archivo: {}", e)))?;

        files.push((filename, label, bytes.to_vec()));
    }

    let response = service(&state).upload_photos(&auth, id, files).await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Fotos subidas".to_string(),
    )))
}

async fn capture_condition(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
    Json(request): Json<ConditionRequest>,
) -> Result<Json<ApiResponse<CheckinSessionResponse>>, AppError> {
    request.validate()?;

    let response = service(&state).capture_condition(&auth, id, request).await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Estado del vehículo registrado y contrato generado".to_string(),
    )))
}

async fn complete_checkin(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CheckinSessionResponse>>, AppError> {
    let response = service(&state).complete(&auth, id).await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Check-in aprobado, vehículo entregado".to_string(),
    )))
}

async fn reject_checkin(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectRequest>,
) -> Result<Json<ApiResponse<CheckinSessionResponse>>, AppError> {
    request.validate()?;

    let response = service(&state).reject(&auth, id, request).await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Check-in rechazado".to_string(),
    )))
}
