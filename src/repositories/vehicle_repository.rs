//! Repositorio de vehículos

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn update_status(&self, id: Uuid, status: VehicleStatus) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    /// Update de estado dentro de una transacción del flujo de check-in
    pub async fn update_status_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: VehicleStatus,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&mut *conn)
        .await?;

        Ok(vehicle)
    }
}
