//! Repositorio de cuentas y perfiles asociados

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::account::Account;
use crate::models::renter::Renter;
use crate::models::staff::Staff;
use crate::utils::errors::AppError;

pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Perfil de staff de una cuenta, si existe
    pub async fn find_staff_by_account(&self, account_id: Uuid) -> Result<Option<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(staff)
    }

    /// Perfil de cliente de una cuenta, si existe
    pub async fn find_renter_by_account(&self, account_id: Uuid) -> Result<Option<Renter>, AppError> {
        let renter = sqlx::query_as::<_, Renter>("SELECT * FROM renters WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(renter)
    }
}
