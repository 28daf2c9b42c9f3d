//! Servicio de contratos
//!
//! Ciclo de vida del contrato de alquiler:
//!
//!   submit: Draft -> Active
//!   sign:   registra la firma del cliente o del staff (solo Active)
//!   complete: Active + ambas firmas -> Completed
//!   void:   Draft | Active -> Voided (rechaza la inspección pendiente)
//!
//! Las transiciones se validan primero contra el modelo y después con un
//! update condicional, de modo que dos requests concurrentes no puedan
//! aplicar la misma transición dos veces.

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::common::{PaginatedResponse, PaginationParams};
use crate::dto::contract_dto::{ContractFilters, ContractResponse, VoidContractRequest};
use crate::middleware::auth::AuthenticatedAccount;
use crate::models::account::AccountRole;
use crate::models::booking::Booking;
use crate::models::contract::{Contract, ContractStatus};
use crate::models::inspection::InspectionStatus;
use crate::models::vehicle::VehicleStatus;
use crate::repositories::account_repository::AccountRepository;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::contract_repository::{ContractRepository, ContractScope};
use crate::repositories::inspection_repository::InspectionRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{contract_state_error, AppError};

pub struct ContractService {
    pool: PgPool,
    accounts: AccountRepository,
    bookings: BookingRepository,
    contracts: ContractRepository,
    inspections: InspectionRepository,
    vehicles: VehicleRepository,
}

impl ContractService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            contracts: ContractRepository::new(pool.clone()),
            inspections: InspectionRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            pool,
        }
    }

    /// Listado paginado según la visibilidad del solicitante
    pub async fn list(
        &self,
        auth: &AuthenticatedAccount,
        filters: ContractFilters,
    ) -> Result<PaginatedResponse<ContractResponse>, AppError> {
        let scope = self.scope_for(auth).await?;

        let pagination = PaginationParams {
            page: filters.page,
            per_page: filters.per_page,
        };
        let (page, per_page) = pagination.normalize();

        let (contracts, total) = self
            .contracts
            .list(scope, filters.status, per_page, pagination.offset())
            .await?;

        let items = contracts.into_iter().map(Into::into).collect();

        Ok(PaginatedResponse::new(items, total, page, per_page))
    }

    pub async fn get(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
    ) -> Result<ContractResponse, AppError> {
        let (contract, _) = self.load_visible(auth, id).await?;
        Ok(contract.into())
    }

    /// Draft -> Active. Solo staff de la estación del contrato.
    pub async fn submit(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
    ) -> Result<ContractResponse, AppError> {
        auth.require_staff()?;
        let (contract, booking) = self.load_visible(auth, id).await?;
        self.require_station_access(auth, &booking)?;

        if !contract.status.can_transition_to(ContractStatus::Active) {
            return Err(contract_state_error("presentar", contract.status.as_str()));
        }

        let contract = self
            .contracts
            .transition_status(contract.id, ContractStatus::Draft, ContractStatus::Active)
            .await?
            .ok_or_else(|| contract_state_error("presentar", "modificado"))?;

        info!("Contrato {} presentado para firma", contract.contract_number);

        Ok(contract.into())
    }

    /// Registra la firma del solicitante. El staff firma por la estación,
    /// el cliente firma su propio contrato. Cada parte firma una sola vez.
    pub async fn sign(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
    ) -> Result<ContractResponse, AppError> {
        let (contract, booking) = self.load_visible(auth, id).await?;

        if !contract.can_sign() {
            return Err(contract_state_error("firmar", contract.status.as_str()));
        }

        let contract = match auth.role {
            AccountRole::Staff | AccountRole::Admin => {
                self.require_station_access(auth, &booking)?;

                if contract.staff_signed_at.is_some() {
                    return Err(AppError::Conflict(
                        "El personal ya firmó este contrato".to_string(),
                    ));
                }

                self.contracts
                    .sign_as_staff(contract.id)
                    .await?
                    .ok_or_else(sign_race_error)?
            }
            AccountRole::Renter => {
                let renter = self
                    .accounts
                    .find_renter_by_account(auth.account_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Forbidden("La cuenta no tiene perfil de cliente".to_string())
                    })?;

                if renter.id != contract.renter_id {
                    return Err(AppError::Forbidden(
                        "El contrato pertenece a otro cliente".to_string(),
                    ));
                }

                if contract.renter_signed_at.is_some() {
                    return Err(AppError::Conflict(
                        "El cliente ya firmó este contrato".to_string(),
                    ));
                }

                self.contracts
                    .sign_as_renter(contract.id)
                    .await?
                    .ok_or_else(sign_race_error)?
            }
        };

        info!(
            "Contrato {} firmado por {}",
            contract.contract_number,
            auth.role.as_str()
        );

        Ok(contract.into())
    }

    /// Active + ambas firmas -> Completed
    pub async fn complete(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
    ) -> Result<ContractResponse, AppError> {
        auth.require_staff()?;
        let (contract, booking) = self.load_visible(auth, id).await?;
        self.require_station_access(auth, &booking)?;

        if !contract.status.can_transition_to(ContractStatus::Completed) {
            return Err(contract_state_error("completar", contract.status.as_str()));
        }

        if !contract.fully_signed() {
            return Err(AppError::BadRequest(
                "El contrato requiere la firma del cliente y del personal".to_string(),
            ));
        }

        let contract = self
            .contracts
            .mark_completed(contract.id)
            .await?
            .ok_or_else(|| contract_state_error("completar", "modificado"))?;

        info!("Contrato {} completado", contract.contract_number);

        Ok(contract.into())
    }

    /// Draft | Active -> Voided. Si la inspección sigue pendiente se
    /// rechaza en la misma transacción y el vehículo queda disponible.
    pub async fn void(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
        request: VoidContractRequest,
    ) -> Result<ContractResponse, AppError> {
        auth.require_staff()?;
        let (contract, booking) = self.load_visible(auth, id).await?;
        self.require_station_access(auth, &booking)?;

        if !contract.status.can_transition_to(ContractStatus::Voided) {
            return Err(contract_state_error("anular", contract.status.as_str()));
        }

        let inspection = self.inspections.find_by_id(contract.inspection_id).await?;

        let mut tx = self.pool.begin().await?;

        let voided = self
            .contracts
            .void_in(&mut tx, contract.id, request.reason.clone())
            .await?
            .ok_or_else(|| contract_state_error("anular", "modificado"))?;

        if let Some(inspection) = inspection {
            if inspection.is_open() {
                self.inspections
                    .set_status_in(
                        &mut tx,
                        inspection.id,
                        InspectionStatus::Rejected,
                        Some(format!("Contrato anulado: {}", request.reason)),
                    )
                    .await?;
                self.vehicles
                    .update_status_in(&mut tx, booking.vehicle_id, VehicleStatus::Available)
                    .await?;
            }
        }

        tx.commit().await?;

        info!(
            "Contrato {} anulado: {}",
            voided.contract_number, request.reason
        );

        Ok(voided.into())
    }

    async fn scope_for(&self, auth: &AuthenticatedAccount) -> Result<ContractScope, AppError> {
        match auth.role {
            AccountRole::Admin => Ok(ContractScope::All),
            AccountRole::Staff => {
                let station_id = auth.station_id.ok_or_else(|| {
                    AppError::Forbidden("La cuenta no tiene estación asignada".to_string())
                })?;
                Ok(ContractScope::Station(station_id))
            }
            AccountRole::Renter => {
                let renter = self
                    .accounts
                    .find_renter_by_account(auth.account_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Forbidden("La cuenta no tiene perfil de cliente".to_string())
                    })?;
                Ok(ContractScope::Renter(renter.id))
            }
        }
    }

    /// Carga el contrato y su reserva verificando la visibilidad del
    /// solicitante (estación para staff, propiedad para clientes)
    async fn load_visible(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
    ) -> Result<(Contract, Booking), AppError> {
        let contract = self
            .contracts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contrato no encontrado".to_string()))?;

        let booking = self
            .bookings
            .find_by_id(contract.booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        match auth.role {
            AccountRole::Admin => {}
            AccountRole::Staff => {
                if !auth.can_access_station(booking.station_id) {
                    return Err(AppError::Forbidden(
                        "El contrato pertenece a otra estación".to_string(),
                    ));
                }
            }
            AccountRole::Renter => {
                let renter = self
                    .accounts
                    .find_renter_by_account(auth.account_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Forbidden("La cuenta no tiene perfil de cliente".to_string())
                    })?;

                if renter.id != contract.renter_id {
                    return Err(AppError::Forbidden(
                        "El contrato pertenece a otro cliente".to_string(),
                    ));
                }
            }
        }

        Ok((contract, booking))
    }

    fn require_station_access(
        &self,
        auth: &AuthenticatedAccount,
        booking: &Booking,
    ) -> Result<(), AppError> {
        if auth.can_access_station(booking.station_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "El contrato pertenece a otra estación".to_string(),
            ))
        }
    }
}

/// Una firma concurrente con una anulación u otra firma pierde contra el
/// update condicional del repositorio y se reporta como conflicto
fn sign_race_error() -> AppError {
    AppError::Conflict(
        "La firma no se pudo registrar: el contrato dejó de estar activo o ya estaba firmado"
            .to_string(),
    )
}

/// Genera un número de contrato único: EVC-YYYYMMDD-XXXXXX
pub fn generate_contract_number() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect::<String>()
        .to_uppercase();

    format!("EVC-{}-{}", Utc::now().format("%Y%m%d"), suffix)
}

/// Texto de los términos del contrato a partir de la reserva
pub fn render_contract_terms(booking: &Booking, license_plate: &str, model: &str) -> String {
    format!(
        "Contrato de alquiler de vehículo eléctrico.\n\
         Reserva: {code}\n\
         Vehículo: {model} ({plate})\n\
         Período: {start} a {end}\n\
         Tarifa diaria: {rate}\n\
         Depósito: {deposit}\n\
         El cliente declara recibir el vehículo en el estado documentado \
         por la inspección y se compromete a devolverlo en la estación de \
         origen al finalizar el período.",
        code = booking.code,
        model = model,
        plate = license_plate,
        start = booking.start_at.format("%Y-%m-%d %H:%M"),
        end = booking.end_at.format("%Y-%m-%d %H:%M"),
        rate = booking.daily_rate,
        deposit = booking.deposit_amount,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_number_format() {
        let number = generate_contract_number();
        let parts: Vec<&str> = number.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "EVC");
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn test_contract_numbers_are_random() {
        let a = generate_contract_number();
        let b = generate_contract_number();
        assert_ne!(a, b);
    }

    #[test]
    fn test_losing_sign_race_is_a_conflict() {
        // Una firma que llega después de una anulación (o de otra firma de
        // la misma parte) debe responder 409, nunca escribir la firma
        match sign_race_error() {
            AppError::Conflict(msg) => assert!(msg.contains("activo")),
            other => panic!("se esperaba Conflict, se obtuvo {:?}", other),
        }
    }
}
