//! Modelo de Account
//!
//! Este módulo contiene el struct Account y los enums de rol y estado.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Renter,
    Staff,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Renter => "renter",
            AccountRole::Staff => "staff",
            AccountRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "renter" => Some(AccountRole::Renter),
            "staff" => Some(AccountRole::Staff),
            "admin" => Some(AccountRole::Admin),
            _ => None,
        }
    }
}

/// Estado de la cuenta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
}

/// Account principal - mapea exactamente a la tabla accounts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: AccountRole,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [AccountRole::Renter, AccountRole::Staff, AccountRole::Admin] {
            assert_eq!(AccountRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(AccountRole::from_str("driver"), None);
    }
}
