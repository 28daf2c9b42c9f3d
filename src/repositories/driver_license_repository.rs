//! Repositorio de licencias de conducir

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::driver_license::DriverLicense;
use crate::utils::errors::AppError;

pub struct DriverLicenseRepository {
    pool: PgPool,
}

impl DriverLicenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_renter(&self, renter_id: Uuid) -> Result<Option<DriverLicense>, AppError> {
        let license = sqlx::query_as::<_, DriverLicense>(
            "SELECT * FROM driver_licenses WHERE renter_id = $1",
        )
        .bind(renter_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(license)
    }

    /// Marca la licencia como verificada dentro de la transacción del paso 2
    pub async fn mark_verified_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<DriverLicense, AppError> {
        let license = sqlx::query_as::<_, DriverLicense>(
            r#"
            UPDATE driver_licenses
            SET verified = TRUE, verified_at = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(license)
    }
}
