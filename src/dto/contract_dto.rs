//! DTOs de contratos

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::contract::{Contract, ContractStatus};

/// Filtros para búsqueda de contratos
#[derive(Debug, Clone, Deserialize)]
pub struct ContractFilters {
    pub status: Option<ContractStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Request de anulación de contrato
#[derive(Debug, Deserialize, Validate)]
pub struct VoidContractRequest {
    #[validate(length(min = 3, max = 500))]
    pub reason: String,
}

/// Response de contrato
#[derive(Debug, Serialize)]
pub struct ContractResponse {
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
}

impl From<Contract> for ContractResponse {
    fn from(contract: Contract) -> Self {
        Self {
            id: contract.id,
            contract_number: contract.contract_number,
            inspection_id: contract.inspection_id,
            booking_id: contract.booking_id,
            renter_id: contract.renter_id,
            staff_id: contract.staff_id,
            status: contract.status,
            terms: contract.terms,
            daily_rate: contract.daily_rate,
            deposit_amount: contract.deposit_amount,
            renter_signed_at: contract.renter_signed_at,
            staff_signed_at: contract.staff_signed_at,
            completed_at: contract.completed_at,
            voided_at: contract.voided_at,
            void_reason: contract.void_reason,
            created_at: contract.created_at,
        }
    }
}
