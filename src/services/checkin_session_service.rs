//! Servicio de sesiones de check-in
//!
//! Implementa la máquina de estados del check-in de vehículos:
//!
//!   paso 1 (scan QR) -> paso 2 (documentos) -> paso 3 (estado del
//!   vehículo + contrato borrador) -> paso 4 (entrega)
//!
//! Cada operación valida rol, estación, estado de la sesión y orden de
//! pasos antes de escribir. El paso 3 actualiza la inspección y crea el
//! contrato en una única transacción.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::dto::checkin_dto::{
    CheckinSessionResponse, ConditionRequest, InspectionPhotoResponse, RejectRequest,
    ScanQrRequest, VerifyDocumentsRequest,
};
use crate::middleware::auth::AuthenticatedAccount;
use crate::models::booking::{Booking, BookingStatus};
use crate::models::inspection::{
    InspectionStatus, VehicleInspection, STEP_CONDITION, STEP_DOCUMENTS, STEP_HANDOVER,
};
use crate::models::contract::ContractStatus;
use crate::models::staff::Staff;
use crate::models::vehicle::VehicleStatus;
use crate::repositories::account_repository::AccountRepository;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::contract_repository::ContractRepository;
use crate::repositories::driver_license_repository::DriverLicenseRepository;
use crate::repositories::inspection_repository::InspectionRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::contract_service::{generate_contract_number, render_contract_terms};
use crate::services::photo_storage_service::PhotoStorageService;
use crate::utils::errors::{checkin_step_error, AppError};
use crate::utils::validation::validate_license_number;

pub struct CheckinSessionService {
    pool: PgPool,
    accounts: AccountRepository,
    bookings: BookingRepository,
    inspections: InspectionRepository,
    contracts: ContractRepository,
    vehicles: VehicleRepository,
    licenses: DriverLicenseRepository,
    photos: PhotoStorageService,
}

impl CheckinSessionService {
    pub fn new(pool: PgPool, photos: PhotoStorageService) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            inspections: InspectionRepository::new(pool.clone()),
            contracts: ContractRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            licenses: DriverLicenseRepository::new(pool.clone()),
            photos,
            pool,
        }
    }

    /// Paso 1: validación del QR de la reserva y apertura de la sesión
    pub async fn scan(
        &self,
        auth: &AuthenticatedAccount,
        request: ScanQrRequest,
    ) -> Result<CheckinSessionResponse, AppError> {
        let staff = self.require_staff_profile(auth).await?;

        let (code, token) = decode_qr_payload(&request.qr_payload)?;

        let booking = self
            .bookings
            .find_by_code(&code)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        if booking.qr_token != token {
            return Err(AppError::BadRequest(
                "El código QR no corresponde a la reserva".to_string(),
            ));
        }

        if !booking.can_start_checkin() {
            return Err(AppError::BadRequest(format!(
                "La reserva está en estado '{}', se requiere 'confirmed'",
                booking.status.as_str()
            )));
        }

        if !auth.can_access_station(booking.station_id) {
            return Err(AppError::Forbidden(
                "La reserva pertenece a otra estación".to_string(),
            ));
        }

        // Máximo una sesión abierta por reserva
        if let Some(open) = self.inspections.find_open_by_booking(booking.id).await? {
            return Err(AppError::Conflict(format!(
                "Ya existe una sesión de check-in abierta ({}) para esta reserva",
                open.id
            )));
        }

        let vehicle = self
            .vehicles
            .find_by_id(booking.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        if vehicle.status == VehicleStatus::Maintenance {
            return Err(AppError::Conflict(
                "El vehículo asignado está en mantenimiento".to_string(),
            ));
        }

        // El QR queda validado: la sesión nace esperando el paso 2
        let session = self
            .inspections
            .create(booking.id, staff.id, STEP_DOCUMENTS)
            .await?;

        self.vehicles
            .update_status(vehicle.id, VehicleStatus::Reserved)
            .await?;

        info!(
            "Check-in {} abierto para reserva {} por staff {}",
            session.id, booking.code, staff.employee_code
        );

        self.to_response(session, booking.code).await
    }

    /// Detalle de la sesión (fotos y contrato incluidos)
    pub async fn get(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
    ) -> Result<CheckinSessionResponse, AppError> {
        auth.require_staff()?;
        let (session, booking) = self.load_session(auth, id).await?;
        self.to_response(session, booking.code).await
    }

    /// Paso 2: verificación de la licencia de conducir presentada
    pub async fn verify_documents(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
        request: VerifyDocumentsRequest,
    ) -> Result<CheckinSessionResponse, AppError> {
        self.require_staff_profile(auth).await?;
        let (session, booking) = self.load_session(auth, id).await?;

        if !session.can_run_step(STEP_DOCUMENTS) {
            return Err(checkin_step_error(STEP_DOCUMENTS, session.current_step));
        }

        validate_license_number(&request.license_number)?;

        let license = self
            .licenses
            .find_by_renter(booking.renter_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("El cliente no tiene licencia registrada".to_string())
            })?;

        if license.license_number != request.license_number.trim() {
            return Err(AppError::BadRequest(
                "El número de licencia no coincide con el registrado".to_string(),
            ));
        }

        if !license.is_valid_until(booking.end_at) {
            return Err(AppError::BadRequest(
                "La licencia expira antes del fin del alquiler".to_string(),
            ));
        }

        // Licencia, flag de verificación y avance de paso en una sola
        // transacción: si el avance pierde la carrera no queda nada escrito
        let mut tx = self.pool.begin().await?;

        self.licenses.mark_verified_in(&mut tx, license.id).await?;
        self.inspections
            .set_license_verified_in(&mut tx, session.id)
            .await?;

        let session = self
            .inspections
            .advance_step_in(&mut tx, session.id, STEP_DOCUMENTS, STEP_CONDITION)
            .await?
            .ok_or_else(|| {
                AppError::CheckinStep("La sesión cambió de paso durante la operación".to_string())
            })?;

        tx.commit().await?;

        info!("Check-in {}: documentos verificados", session.id);

        self.to_response(session, booking.code).await
    }

    /// Subida de fotos del estado del vehículo, solo durante el paso 3
    pub async fn upload_photos(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
        files: Vec<(String, Option<String>, Vec<u8>)>,
    ) -> Result<Vec<InspectionPhotoResponse>, AppError> {
        self.require_staff_profile(auth).await?;
        let (session, _) = self.load_session(auth, id).await?;

        if !session.can_run_step(STEP_CONDITION) {
            return Err(checkin_step_error(STEP_CONDITION, session.current_step));
        }

        if files.is_empty() {
            return Err(AppError::BadRequest(
                "Se requiere al menos un archivo".to_string(),
            ));
        }

        let mut uploaded = Vec::with_capacity(files.len());
        for (filename, label, bytes) in files {
            if bytes.is_empty() {
                return Err(AppError::BadRequest(format!(
                    "El archivo '{}' está vacío",
                    filename
                )));
            }

            let url = self.photos.upload(&filename, bytes).await?;
            let photo = self.inspections.add_photo(session.id, url, label).await?;
            uploaded.push(photo.into());
        }

        info!("Check-in {}: {} foto(s) subidas", session.id, uploaded.len());

        Ok(uploaded)
    }

    /// Paso 3: captura de lecturas y generación del contrato borrador.
    /// La inspección avanza al paso 4 y el contrato se inserta en la
    /// misma transacción.
    pub async fn capture_condition(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
        request: ConditionRequest,
    ) -> Result<CheckinSessionResponse, AppError> {
        let staff = self.require_staff_profile(auth).await?;
        let (session, booking) = self.load_session(auth, id).await?;

        if !session.can_run_step(STEP_CONDITION) {
            return Err(checkin_step_error(STEP_CONDITION, session.current_step));
        }

        if self.inspections.photo_count(session.id).await? == 0 {
            return Err(AppError::BadRequest(
                "Se requiere al menos una foto del vehículo".to_string(),
            ));
        }

        let odometer = Decimal::from_f64_retain(request.odometer_km)
            .ok_or_else(|| AppError::BadRequest("Lectura de odómetro inválida".to_string()))?;

        let vehicle = self
            .vehicles
            .find_by_id(booking.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehículo no encontrado".to_string()))?;

        let terms = render_contract_terms(&booking, &vehicle.license_plate, &vehicle.model);
        let contract_number = generate_contract_number();

        let mut tx = self.pool.begin().await?;

        let session = self
            .inspections
            .record_condition_in(
                &mut tx,
                session.id,
                STEP_CONDITION,
                STEP_HANDOVER,
                odometer,
                request.battery_percent,
                request.condition_notes,
            )
            .await?
            .ok_or_else(|| {
                AppError::CheckinStep("La sesión cambió de paso durante la operación".to_string())
            })?;

        self.contracts
            .create_in(
                &mut tx,
                contract_number.clone(),
                session.id,
                booking.id,
                booking.renter_id,
                staff.id,
                terms,
                booking.daily_rate,
                booking.deposit_amount,
            )
            .await?;

        tx.commit().await?;

        info!(
            "Check-in {}: contrato {} generado en borrador",
            session.id, contract_number
        );

        self.to_response(session, booking.code).await
    }

    /// Paso 4: entrega del vehículo. Requiere el contrato completado.
    /// Aprueba la inspección, marca la reserva como checked_in y el
    /// vehículo como rented en una única transacción.
    pub async fn complete(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
    ) -> Result<CheckinSessionResponse, AppError> {
        self.require_staff_profile(auth).await?;
        let (session, booking) = self.load_session(auth, id).await?;

        if !session.can_run_step(STEP_HANDOVER) {
            return Err(checkin_step_error(STEP_HANDOVER, session.current_step));
        }

        let contract = self
            .contracts
            .find_by_inspection(session.id)
            .await?
            .ok_or_else(|| {
                AppError::Internal("La sesión llegó al paso 4 sin contrato".to_string())
            })?;

        if contract.status != ContractStatus::Completed {
            return Err(AppError::BadRequest(format!(
                "El contrato {} debe estar completado antes de la entrega (estado actual: '{}')",
                contract.contract_number,
                contract.status.as_str()
            )));
        }

        let mut tx = self.pool.begin().await?;

        let session = self
            .inspections
            .set_status_in(&mut tx, session.id, InspectionStatus::Approved, None)
            .await?;
        self.bookings
            .update_status_in(&mut tx, booking.id, BookingStatus::CheckedIn)
            .await?;
        self.vehicles
            .update_status_in(&mut tx, booking.vehicle_id, VehicleStatus::Rented)
            .await?;

        tx.commit().await?;

        info!(
            "Check-in {} aprobado: vehículo entregado para reserva {}",
            session.id, booking.code
        );

        self.to_response(session, booking.code).await
    }

    /// Rechazo de la sesión en cualquier paso. Anula el contrato no
    /// terminal si existe y libera el vehículo. La reserva queda
    /// confirmada para permitir un nuevo intento.
    pub async fn reject(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
        request: RejectRequest,
    ) -> Result<CheckinSessionResponse, AppError> {
        self.require_staff_profile(auth).await?;
        let (session, booking) = self.load_session(auth, id).await?;

        if !session.is_open() {
            return Err(AppError::Conflict(format!(
                "La sesión ya está en estado terminal '{}'",
                session.status.as_str()
            )));
        }

        let contract = self.contracts.find_by_inspection(session.id).await?;

        let mut tx = self.pool.begin().await?;

        let session = self
            .inspections
            .set_status_in(
                &mut tx,
                session.id,
                InspectionStatus::Rejected,
                Some(request.reason.clone()),
            )
            .await?;

        if let Some(contract) = contract {
            if !contract.status.is_terminal() {
                self.contracts
                    .void_in(
                        &mut tx,
                        contract.id,
                        format!("Check-in rechazado: {}", request.reason),
                    )
                    .await?;
            }
        }

        self.vehicles
            .update_status_in(&mut tx, booking.vehicle_id, VehicleStatus::Available)
            .await?;

        tx.commit().await?;

        info!("Check-in {} rechazado: {}", session.id, request.reason);

        self.to_response(session, booking.code).await
    }

    /// El staff necesita un perfil de estación para operar el check-in
    async fn require_staff_profile(&self, auth: &AuthenticatedAccount) -> Result<Staff, AppError> {
        auth.require_staff()?;

        self.accounts
            .find_staff_by_account(auth.account_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("La cuenta no tiene perfil de staff asignado".to_string())
            })
    }

    async fn load_session(
        &self,
        auth: &AuthenticatedAccount,
        id: Uuid,
    ) -> Result<(VehicleInspection, Booking), AppError> {
        let session = self
            .inspections
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sesión de check-in no encontrada".to_string()))?;

        let booking = self
            .bookings
            .find_by_id(session.booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        if !auth.can_access_station(booking.station_id) {
            return Err(AppError::Forbidden(
                "La sesión pertenece a otra estación".to_string(),
            ));
        }

        Ok((session, booking))
    }

    async fn to_response(
        &self,
        session: VehicleInspection,
        booking_code: String,
    ) -> Result<CheckinSessionResponse, AppError> {
        let photos = self.inspections.photos_for(session.id).await?;
        let contract = self
            .contracts
            .find_by_inspection(session.id)
            .await?
            .map(Into::into);

        Ok(CheckinSessionResponse::from_parts(
            session,
            booking_code,
            photos,
            contract,
        ))
    }
}

/// Decodifica el contenido del QR: base64 de `<booking_code>|<qr_token>`
fn decode_qr_payload(payload: &str) -> Result<(String, String), AppError> {
    let decoded = BASE64
        .decode(payload.trim())
        .map_err(|_| AppError::BadRequest("El código QR no es base64 válido".to_string()))?;

    let text = String::from_utf8(decoded)
        .map_err(|_| AppError::BadRequest("El código QR contiene datos inválidos".to_string()))?;

    let (code, token) = text
        .split_once('|')
        .ok_or_else(|| AppError::BadRequest("Formato de código QR inválido".to_string()))?;

    if code.is_empty() || token.is_empty() {
        return Err(AppError::BadRequest("Formato de código QR inválido".to_string()));
    }

    Ok((code.to_string(), token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_qr_payload() {
        let payload = BASE64.encode("BK-2026-0001|f3a9c1");
        let (code, token) = decode_qr_payload(&payload).unwrap();
        assert_eq!(code, "BK-2026-0001");
        assert_eq!(token, "f3a9c1");
    }

    #[test]
    fn test_decode_qr_payload_rejects_bad_base64() {
        assert!(decode_qr_payload("not base64!!!").is_err());
    }

    #[test]
    fn test_decode_qr_payload_rejects_missing_separator() {
        let payload = BASE64.encode("BK-2026-0001");
        assert!(decode_qr_payload(&payload).is_err());
    }

    #[test]
    fn test_decode_qr_payload_rejects_empty_parts() {
        let payload = BASE64.encode("|token");
        assert!(decode_qr_payload(&payload).is_err());

        let payload = BASE64.encode("code|");
        assert!(decode_qr_payload(&payload).is_err());
    }
}
