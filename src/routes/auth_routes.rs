//! Rutas de autenticación

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{AccountResponse, LoginRequest, LoginResponse};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedAccount};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Router de autenticación. El login es público, el resto requiere token.
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route_layer(axum::middleware::from_fn_with_state(state, auth_middleware))
        .route("/login", post(login))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    request.validate()?;

    let controller = AuthController::new(state.pool.clone(), &state.config);
    let response = controller.login(request).await?;

    Ok(Json(ApiResponse::success_with_message(
        response,
        "Login exitoso".to_string(),
    )))
}

async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedAccount>,
) -> Result<Json<ApiResponse<AccountResponse>>, AppError> {
    let controller = AuthController::new(state.pool.clone(), &state.config);
    let response = controller.me(&auth).await?;

    Ok(Json(ApiResponse::success(response)))
}
