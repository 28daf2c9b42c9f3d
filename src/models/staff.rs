//! Modelo de Staff
//!
//! Perfil de operador de estación asociado a una cuenta con rol 'staff'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Staff {
    pub id: Uuid,
    pub account_id: Uuid,
    pub station_id: Uuid,
    pub employee_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
