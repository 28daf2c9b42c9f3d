//! Controller de autenticación

use bcrypt::verify;
use sqlx::PgPool;
use tracing::info;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{AccountResponse, LoginRequest, LoginResponse};
use crate::middleware::auth::AuthenticatedAccount;
use crate::models::account::AccountRole;
use crate::repositories::account_repository::AccountRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    repository: AccountRepository,
    jwt_config: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            repository: AccountRepository::new(pool),
            jwt_config: JwtConfig::from(config),
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        // Buscar cuenta por email
        let account = self
            .repository
            .find_by_email(request.email.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        // Verificar contraseña
        let valid = verify(&request.password, &account.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        if !account.is_active() {
            return Err(AppError::Unauthorized("Cuenta inactiva".to_string()));
        }

        // La estación del staff viaja en los claims para trazabilidad
        let station_id = match account.role {
            AccountRole::Staff => self
                .repository
                .find_staff_by_account(account.id)
                .await?
                .map(|s| s.station_id),
            _ => None,
        };

        let (token, expires_at) =
            generate_token(account.id, account.role, station_id, &self.jwt_config)?;

        info!("Login exitoso: {} ({})", account.email, account.role.as_str());

        Ok(LoginResponse {
            token,
            expires_at,
            account: AccountResponse::from_account(account, station_id),
        })
    }

    pub async fn me(&self, auth: &AuthenticatedAccount) -> Result<AccountResponse, AppError> {
        let account = self
            .repository
            .find_by_id(auth.account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cuenta no encontrada".to_string()))?;

        Ok(AccountResponse::from_account(account, auth.station_id))
    }
}
