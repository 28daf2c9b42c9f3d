//! Modelo de Vehicle
//!
//! Vehículo eléctrico asignado a una estación de alquiler.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado operativo del vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    Reserved,
    Rented,
    Maintenance,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::Reserved => "reserved",
            VehicleStatus::Rented => "rented",
            VehicleStatus::Maintenance => "maintenance",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub station_id: Uuid,
    pub license_plate: String,
    pub model: String,
    pub color: Option<String>,
    pub battery_capacity_kwh: Decimal,
    pub odometer_km: Decimal,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
