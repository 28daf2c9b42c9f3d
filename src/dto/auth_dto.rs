//! DTOs de autenticación

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::account::{Account, AccountRole};

/// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Perfil de cuenta (sin password)
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: AccountRole,
    pub station_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl AccountResponse {
    pub fn from_account(account: Account, station_id: Option<Uuid>) -> Self {
        Self {
            id: account.id,
            email: account.email,
            full_name: account.full_name,
            phone: account.phone,
            role: account.role,
            station_id,
            created_at: account.created_at,
        }
    }
}

/// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub account: AccountResponse,
}
