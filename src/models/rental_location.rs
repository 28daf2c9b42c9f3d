//! Modelo de RentalLocation
//!
//! Estación de alquiler donde se entregan y devuelven los vehículos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RentalLocation {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
