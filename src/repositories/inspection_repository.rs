//! Repositorio de sesiones de check-in (vehicle_inspections)
//!
//! Los avances de paso usan updates condicionales sobre current_step y
//! status para que dos requests concurrentes no puedan ejecutar el mismo
//! paso dos veces.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::inspection::{InspectionPhoto, InspectionStatus, VehicleInspection};
use crate::utils::errors::AppError;

pub struct InspectionRepository {
    pool: PgPool,
}

impl InspectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        booking_id: Uuid,
        staff_id: Uuid,
        current_step: i32,
    ) -> Result<VehicleInspection, AppError> {
        let inspection = sqlx::query_as::<_, VehicleInspection>(
            r#"
            INSERT INTO vehicle_inspections (id, booking_id, staff_id, current_step, status, license_verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 'pending', FALSE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(booking_id)
        .bind(staff_id)
        .bind(current_step)
        .fetch_one(&self.pool)
        .await?;

        Ok(inspection)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<VehicleInspection>, AppError> {
        let inspection =
            sqlx::query_as::<_, VehicleInspection>("SELECT * FROM vehicle_inspections WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(inspection)
    }

    /// Sesión abierta (status 'pending') de una reserva, si existe
    pub async fn find_open_by_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<VehicleInspection>, AppError> {
        let inspection = sqlx::query_as::<_, VehicleInspection>(
            "SELECT * FROM vehicle_inspections WHERE booking_id = $1 AND status = 'pending'",
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inspection)
    }

    /// Avanza del paso `from` al paso `to` dentro de una transacción.
    /// Devuelve None si la sesión ya no está en el paso esperado
    /// (guardia contra dobles ejecuciones).
    pub async fn advance_step_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        from: i32,
        to: i32,
    ) -> Result<Option<VehicleInspection>, AppError> {
        let inspection = sqlx::query_as::<_, VehicleInspection>(
            r#"
            UPDATE vehicle_inspections
            SET current_step = $3, updated_at = NOW()
            WHERE id = $1 AND current_step = $2 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(inspection)
    }

    pub async fn set_license_verified_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE vehicle_inspections SET license_verified = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Escribe las lecturas del paso 3 y avanza al paso 4, dentro de la
    /// transacción que también crea el contrato
    pub async fn record_condition_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        from_step: i32,
        to_step: i32,
        odometer_km: Decimal,
        battery_percent: i32,
        condition_notes: Option<String>,
    ) -> Result<Option<VehicleInspection>, AppError> {
        let inspection = sqlx::query_as::<_, VehicleInspection>(
            r#"
            UPDATE vehicle_inspections
            SET current_step = $3, odometer_km = $4, battery_percent = $5,
                condition_notes = $6, updated_at = NOW()
            WHERE id = $1 AND current_step = $2 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from_step)
        .bind(to_step)
        .bind(odometer_km)
        .bind(battery_percent)
        .bind(condition_notes)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(inspection)
    }

    /// Cierra la sesión con un estado terminal
    pub async fn set_status_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: InspectionStatus,
        rejection_reason: Option<String>,
    ) -> Result<VehicleInspection, AppError> {
        let inspection = sqlx::query_as::<_, VehicleInspection>(
            r#"
            UPDATE vehicle_inspections
            SET status = $2, rejection_reason = COALESCE($3, rejection_reason), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(rejection_reason)
        .fetch_one(&mut *conn)
        .await?;

        Ok(inspection)
    }

    pub async fn add_photo(
        &self,
        inspection_id: Uuid,
        url: String,
        label: Option<String>,
    ) -> Result<InspectionPhoto, AppError> {
        let photo = sqlx::query_as::<_, InspectionPhoto>(
            r#"
            INSERT INTO inspection_photos (id, inspection_id, url, label, uploaded_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(inspection_id)
        .bind(url)
        .bind(label)
        .fetch_one(&self.pool)
        .await?;

        Ok(photo)
    }

    pub async fn photos_for(&self, inspection_id: Uuid) -> Result<Vec<InspectionPhoto>, AppError> {
        let photos = sqlx::query_as::<_, InspectionPhoto>(
            "SELECT * FROM inspection_photos WHERE inspection_id = $1 ORDER BY uploaded_at",
        )
        .bind(inspection_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }

    pub async fn photo_count(&self, inspection_id: Uuid) -> Result<i64, AppError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM inspection_photos WHERE inspection_id = $1")
                .bind(inspection_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }
}
