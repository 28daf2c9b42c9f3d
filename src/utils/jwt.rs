//! Utilidades JWT
//!
//! Este módulo contiene funciones helper para generación y verificación
//! de tokens JWT de la API.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::environment::EnvironmentConfig,
    models::account::AccountRole,
    utils::errors::AppError,
};

/// Claims del JWT token
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,                // account_id
    pub role: String,               // renter | staff | admin
    pub station_id: Option<String>, // solo para staff
    pub exp: i64,                   // expiration timestamp
    pub iat: i64,                   // issued at timestamp
}

/// Configuración de JWT
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

impl From<&EnvironmentConfig> for JwtConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            expiration_hours: config.jwt_expiration_hours,
        }
    }
}

/// Generar JWT token para una cuenta. Devuelve el token y su expiración.
pub fn generate_token(
    account_id: Uuid,
    role: AccountRole,
    station_id: Option<Uuid>,
    config: &JwtConfig,
) -> Result<(String, DateTime<Utc>), AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.expiration_hours);

    let claims = JwtClaims {
        sub: account_id.to_string(),
        role: role.as_str().to_string(),
        station_id: station_id.map(|id| id.to_string()),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let encoding_key = EncodingKey::from_secret(config.secret.as_ref());

    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Jwt(format!("Error generando token: {}", e)))?;

    Ok((token, expires_at))
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<JwtClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    Ok(token_data.claims)
}

/// Extraer token del header Authorization
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Jwt("Header Authorization debe comenzar con 'Bearer '".to_string()))?;

    if token.is_empty() {
        return Err(AppError::Jwt("Token no puede estar vacío".to_string()));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 24,
        }
    }

    #[test]
    fn test_generate_and_verify_token() {
        let config = test_config();
        let account_id = Uuid::new_v4();
        let station_id = Uuid::new_v4();

        let (token, expires_at) =
            generate_token(account_id, AccountRole::Staff, Some(station_id), &config).unwrap();
        assert!(!token.is_empty());
        assert!(expires_at > Utc::now());

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, account_id.to_string());
        assert_eq!(claims.role, "staff");
        assert_eq!(claims.station_id, Some(station_id.to_string()));
    }

    #[test]
    fn test_verify_token_with_wrong_secret() {
        let config = test_config();
        let (token, _) = generate_token(Uuid::new_v4(), AccountRole::Renter, None, &config).unwrap();

        let other = JwtConfig {
            secret: "other-secret".to_string(),
            expiration_hours: 24,
        };
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_extract_token_from_header() {
        assert_eq!(extract_token_from_header("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }
}
