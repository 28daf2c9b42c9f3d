//! Modelo de Renter
//!
//! Perfil de cliente asociado a una cuenta con rol 'renter'.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Renter {
    pub id: Uuid,
    pub account_id: Uuid,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
