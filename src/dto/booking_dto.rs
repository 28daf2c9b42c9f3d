//! DTOs de reservas

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::booking::BookingStatus;
use crate::repositories::booking_repository::BookingRow;

/// Filtros para búsqueda de reservas
#[derive(Debug, Clone, Deserialize)]
pub struct BookingFilters {
    pub status: Option<BookingStatus>,
    pub station_id: Option<Uuid>,
    /// Búsqueda por código de reserva o nombre del cliente
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Response de reserva con cliente, vehículo y estación expandidos
#[derive(Debug, Serialize)]
pub struct BookingResponse {
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

impl From<BookingRow> for BookingResponse {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            status: row.status,
            start_at: row.start_at,
            end_at: row.end_at,
            daily_rate: row.daily_rate,
            deposit_amount: row.deposit_amount,
            renter_id: row.renter_id,
            renter_name: row.renter_name,
            vehicle_id: row.vehicle_id,
            license_plate: row.license_plate,
            vehicle_model: row.vehicle_model,
            station_id: row.station_id,
            station_name: row.station_name,
            created_at: row.created_at,
        }
    }
}
