//! Modelo de DriverLicense
//!
//! Licencia de conducir registrada por un cliente, verificada por el
//! personal durante el paso 2 del check-in.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DriverLicense {
    pub id: Uuid,
    pub renter_id: Uuid,
    pub license_number: String,
    pub license_class: String,
    pub issued_at: NaiveDate,
    pub expires_at: NaiveDate,
    pub verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DriverLicense {
    /// Una licencia es válida para un alquiler si no expira antes del
    /// fin del período reservado
    pub fn is_valid_until(&self, end: DateTime<Utc>) -> bool {
        self.expires_at >= end.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn license_expiring(expires_at: NaiveDate) -> DriverLicense {
        DriverLicense {
            id: Uuid::new_v4(),
            renter_id: Uuid::new_v4(),
            license_number: "079123456789".to_string(),
            license_class: "B1".to_string(),
            issued_at: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            expires_at,
            verified: false,
            verified_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_license_valid_until_rental_end() {
        let end = Utc::now() + Duration::days(3);

        let valid = license_expiring(end.date_naive() + Duration::days(30));
        assert!(valid.is_valid_until(end));

        let expired = license_expiring(end.date_naive() - Duration::days(1));
        assert!(!expired.is_valid_until(end));
    }
}
