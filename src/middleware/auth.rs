//! Middleware de autenticación JWT
//!
//! Este módulo valida el Bearer token, verifica que la cuenta exista y
//! esté activa, e inyecta la cuenta autenticada en las extensions del
//! request.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::account::{Account, AccountRole},
    repositories::account_repository::AccountRepository,
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{extract_token_from_header, verify_token, JwtConfig},
};

/// Cuenta autenticada que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: Uuid,
    pub role: AccountRole,
    pub station_id: Option<Uuid>,
}

impl AuthenticatedAccount {
    pub fn is_staff(&self) -> bool {
        matches!(self.role, AccountRole::Staff | AccountRole::Admin)
    }

    /// Los pasos de check-in y las operaciones de contrato del lado de la
    /// estación requieren rol staff o admin
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Operación reservada al personal de la estación".to_string(),
            ))
        }
    }

    /// Un staff solo puede operar sobre su propia estación; un admin sobre todas
    pub fn can_access_station(&self, station_id: Uuid) -> bool {
        match self.role {
            AccountRole::Admin => true,
            AccountRole::Staff => self.station_id == Some(station_id),
            AccountRole::Renter => false,
        }
    }
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let token = extract_token_from_header(auth_header)?;

    // Decodificar y validar JWT
    let jwt_config = JwtConfig::from(&state.config);
    let claims = verify_token(token, &jwt_config)?;

    let account_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("ID de cuenta inválido".to_string()))?;

    // Verificar que la cuenta existe y está activa
    let repository = AccountRepository::new(state.pool.clone());
    let account: Account = repository
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Cuenta no encontrada".to_string()))?;

    if !account.is_active() {
        return Err(AppError::Unauthorized("Cuenta inactiva".to_string()));
    }

    // La estación se toma de la base de datos, no del token
    let station_id = match account.role {
        AccountRole::Staff => repository
            .find_staff_by_account(account.id)
            .await?
            .map(|s| s.station_id),
        _ => None,
    };

    let authenticated = AuthenticatedAccount {
        account_id: account.id,
        role: account.role,
        station_id,
    };

    request.extensions_mut().insert(authenticated);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(role: AccountRole, station_id: Option<Uuid>) -> AuthenticatedAccount {
        AuthenticatedAccount {
            account_id: Uuid::new_v4(),
            role,
            station_id,
        }
    }

    #[test]
    fn test_require_staff() {
        assert!(auth(AccountRole::Staff, None).require_staff().is_ok());
        assert!(auth(AccountRole::Admin, None).require_staff().is_ok());
        assert!(auth(AccountRole::Renter, None).require_staff().is_err());
    }

    #[test]
    fn test_station_access() {
        let station = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(auth(AccountRole::Admin, None).can_access_station(station));
        assert!(auth(AccountRole::Staff, Some(station)).can_access_station(station));
        assert!(!auth(AccountRole::Staff, Some(other)).can_access_station(station));
        assert!(!auth(AccountRole::Renter, None).can_access_station(station));
    }
}
