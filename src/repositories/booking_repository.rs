//! Repositorio de reservas
//!
//! Incluye el listado con filtros dinámicos y los updates de estado
//! usados por el flujo de check-in.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus};
use crate::utils::errors::AppError;

/// Fila de reserva con cliente, vehículo y estación expandidos
#[derive(Debug, sqlx::FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub code: String,
    pub status: BookingStatus,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub daily_rate: Decimal,
    pub deposit_amount: Decimal,
    pub renter_id: Uuid,
    pub renter_name: String,
    pub vehicle_id: Uuid,
    pub license_plate: String,
    pub vehicle_model: String,
    pub station_id: Uuid,
    pub station_name: String,
    pub created_at: DateTime<Utc>,
}

/// Alcance de visibilidad del listado según el rol del solicitante
#[derive(Debug, Clone, Copy)]
pub enum BookingScope {
    All,
    Station(Uuid),
    Renter(Uuid),
}

const BOOKING_ROW_SELECT: &str = r#"
    SELECT b.id, b.code, b.status, b.start_at, b.end_at, b.daily_rate, b.deposit_amount,
           b.renter_id, a.full_name AS renter_name,
           b.vehicle_id, v.license_plate, v.model AS vehicle_model,
           b.station_id, l.name AS station_name,
           b.created_at
    FROM bookings b
    JOIN renters r ON r.id = b.renter_id
    JOIN accounts a ON a.id = r.account_id
    JOIN vehicles v ON v.id = b.vehicle_id
    JOIN rental_locations l ON l.id = b.station_id
"#;

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn find_row_by_id(&self, id: Uuid) -> Result<Option<BookingRow>, AppError> {
        let sql = format!("{} WHERE b.id = $1", BOOKING_ROW_SELECT);
        let row = sqlx::query_as::<_, BookingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Listado paginado con filtros dinámicos
    pub async fn list(
        &self,
        scope: BookingScope,
        status: Option<BookingStatus>,
        station_id: Option<Uuid>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<BookingRow>, i64), AppError> {
        let rows = {
            let mut qb = self.filtered_query(BOOKING_ROW_SELECT, scope, status, station_id, search);
            qb.push(" ORDER BY b.created_at DESC LIMIT ");
            qb.push_bind(limit);
            qb.push(" OFFSET ");
            qb.push_bind(offset);

            qb.build_query_as::<BookingRow>().fetch_all(&self.pool).await?
        };

        let total = {
            let count_select = r#"
                SELECT COUNT(*)
                FROM bookings b
                JOIN renters r ON r.id = b.renter_id
                JOIN accounts a ON a.id = r.account_id
                JOIN vehicles v ON v.id = b.vehicle_id
                JOIN rental_locations l ON l.id = b.station_id
            "#;
            let mut qb = self.filtered_query(count_select, scope, status, station_id, search);
            qb.build_query_scalar::<i64>().fetch_one(&self.pool).await?
        };

        Ok((rows, total))
    }

    fn filtered_query<'a>(
        &self,
        select: &'a str,
        scope: BookingScope,
        status: Option<BookingStatus>,
        station_id: Option<Uuid>,
        search: Option<&'a str>,
    ) -> QueryBuilder<'a, Postgres> {
        let mut qb = QueryBuilder::new(select);
        qb.push(" WHERE 1 = 1");

        match scope {
            BookingScope::All => {}
            BookingScope::Station(id) => {
                qb.push(" AND b.station_id = ");
                qb.push_bind(id);
            }
            BookingScope::Renter(id) => {
                qb.push(" AND b.renter_id = ");
                qb.push_bind(id);
            }
        }

        if let Some(status) = status {
            qb.push(" AND b.status = ");
            qb.push_bind(status);
        }

        if let Some(station_id) = station_id {
            qb.push(" AND b.station_id = ");
            qb.push_bind(station_id);
        }

        if let Some(search) = search {
            let pattern = format!("%{}%", search.trim());
            qb.push(" AND (b.code ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR a.full_name ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        qb
    }

    /// Update de estado dentro de una transacción del flujo de check-in
    pub async fn update_status_in(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&mut *conn)
        .await?;

        Ok(booking)
    }
}
