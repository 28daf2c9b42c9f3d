//! Rutas de consulta de reservas

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::{BookingFilters, BookingResponse};
use crate::dto::common::{ApiResponse, PaginatedResponse};
use crate::middleware::auth::AuthenticatedAccount;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings))
        .route("/:id", get(get_booking))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Query(filters): Query<BookingFilters>,
) -> Result<Json<ApiResponse<PaginatedResponse<BookingResponse>>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.list(&auth, filters).await?;

    Ok(Json(ApiResponse::success(response)))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone());
    let response = controller.get_by_id(&auth, id).await?;

    Ok(Json(ApiResponse::success(response)))
}
