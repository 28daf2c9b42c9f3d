//! Modelo de Contract
//!
//! Contrato de alquiler generado en el paso 3 del check-in. Ciclo de vida:
//!
//!   Draft -> Active -> Completed
//!     \        \
//!      \        -> Voided
//!       -> Voided
//!
//! 'Completed' y 'Voided' son estados terminales. Completar requiere la
//! firma del cliente y del personal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado del contrato
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "contract_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Active,
    Completed,
    Voided,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "draft",
            ContractStatus::Active => "active",
            ContractStatus::Completed => "completed",
            ContractStatus::Voided => "voided",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ContractStatus::Completed | ContractStatus::Voided)
    }

    /// Transiciones válidas del ciclo de vida
    pub fn can_transition_to(&self, next: ContractStatus) -> bool {
        matches!(
            (self, next),
            (ContractStatus::Draft, ContractStatus::Active)
                | (ContractStatus::Draft, ContractStatus::Voided)
                | (ContractStatus::Active, ContractStatus::Completed)
                | (ContractStatus::Active, ContractStatus::Voided)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contract {
    pub id: Uuid,
    pub contract_number: String,
    pub inspection_id: Uuid,
    pub booking_id: Uuid,
    pub renter_id: Uuid,
    pub staff_id: Uuid,
    pub status: ContractStatus,
    pub terms: String,
    pub daily_rate: Decimal,
    pub deposit_amount: Decimal,
    pub renter_signed_at: Option<DateTime<Utc>>,
    pub staff_signed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub voided_at: Option<DateTime<Utc>>,
    pub void_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// Las firmas solo se registran sobre contratos activos
    pub fn can_sign(&self) -> bool {
        self.status == ContractStatus::Active
    }

    /// Completar requiere ambas firmas
    pub fn fully_signed(&self) -> bool {
        self.renter_signed_at.is_some() && self.staff_signed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(status: ContractStatus) -> Contract {
        Contract {
            id: Uuid::new_v4(),
            contract_number: "EVC-20260829-A1B2C3".to_string(),
            inspection_id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            renter_id: Uuid::new_v4(),
            staff_id: Uuid::new_v4(),
            status,
            terms: "términos".to_string(),
            daily_rate: Decimal::new(35000, 2),
            deposit_amount: Decimal::new(100000, 2),
            renter_signed_at: None,
            staff_signed_at: None,
            completed_at: None,
            voided_at: None,
            void_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_transitions() {
        assert!(ContractStatus::Draft.can_transition_to(ContractStatus::Active));
        assert!(ContractStatus::Draft.can_transition_to(ContractStatus::Voided));
        assert!(ContractStatus::Active.can_transition_to(ContractStatus::Completed));
        assert!(ContractStatus::Active.can_transition_to(ContractStatus::Voided));
    }

    #[test]
    fn test_invalid_transitions() {
        // No se puede completar un borrador sin activarlo
        assert!(!ContractStatus::Draft.can_transition_to(ContractStatus::Completed));
        // Los estados terminales no admiten transiciones
        assert!(!ContractStatus::Completed.can_transition_to(ContractStatus::Voided));
        assert!(!ContractStatus::Voided.can_transition_to(ContractStatus::Active));
        // No hay vuelta atrás
        assert!(!ContractStatus::Active.can_transition_to(ContractStatus::Draft));
    }

    #[test]
    fn test_sign_only_when_active() {
        assert!(contract(ContractStatus::Active).can_sign());
        assert!(!contract(ContractStatus::Draft).can_sign());
        assert!(!contract(ContractStatus::Completed).can_sign());
        assert!(!contract(ContractStatus::Voided).can_sign());
    }

    #[test]
    fn test_fully_signed_requires_both_parties() {
        let mut c = contract(ContractStatus::Active);
        assert!(!c.fully_signed());

        c.renter_signed_at = Some(Utc::now());
        assert!(!c.fully_signed());

        c.staff_signed_at = Some(Utc::now());
        assert!(c.fully_signed());
    }
}
