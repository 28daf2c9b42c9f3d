//! Modelo de Booking
//!
//! Reserva confirmada de un vehículo en una estación. El campo qr_token
//! es el token opaco embebido en el código QR que presenta el cliente.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de la reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub code: String,
    pub renter_id: Uuid,
    pub vehicle_id: Uuid,
    pub station_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub daily_rate: Decimal,
    pub deposit_amount: Decimal,
    pub status: BookingStatus,
    #[serde(skip_serializing)]
    pub qr_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Una reserva solo puede iniciar check-in si está confirmada
    pub fn can_start_checkin(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn booking_with_status(status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            code: "BK-0001".to_string(),
            renter_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            station_id: Uuid::new_v4(),
            start_at: Utc::now(),
            end_at: Utc::now(),
            daily_rate: Decimal::new(35000, 2),
            deposit_amount: Decimal::new(100000, 2),
            status,
            qr_token: "token".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_start_checkin_only_when_confirmed() {
        assert!(booking_with_status(BookingStatus::Confirmed).can_start_checkin());
        assert!(!booking_with_status(BookingStatus::Pending).can_start_checkin());
        assert!(!booking_with_status(BookingStatus::CheckedIn).can_start_checkin());
        assert!(!booking_with_status(BookingStatus::Cancelled).can_start_checkin());
    }
}
