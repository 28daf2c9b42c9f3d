//! DTOs del flujo de check-in

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::contract_dto::ContractResponse;
use crate::models::inspection::{InspectionPhoto, InspectionStatus, VehicleInspection};

/// Request del paso 1: escaneo del QR de la reserva
#[derive(Debug, Deserialize, Validate)]
pub struct ScanQrRequest {
    /// Contenido del QR en base64: `<booking_code>|<qr_token>`
    #[validate(length(min = 4, max = 512))]
    pub qr_payload: String,
}

/// Request del paso 2: verificación de documentos
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyDocumentsRequest {
    #[validate(length(min = 5, max = 20))]
    pub license_number: String,
}

/// Request del paso 3: captura del estado del vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct ConditionRequest {
    #[validate(range(min = 0.0))]
    pub odometer_km: f64,

    #[validate(range(min = 0, max = 100))]
    pub battery_percent: i32,

    #[validate(length(max = 2000))]
    pub condition_notes: Option<String>,
}

/// Request de rechazo de la sesión
#[derive(Debug, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(min = 3, max = 500))]
    pub reason: String,
}

/// Foto subida durante el paso 3
#[derive(Debug, Serialize)]
pub struct InspectionPhotoResponse {
    pub id: Uuid,
    pub url: String,
    pub label: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<InspectionPhoto> for InspectionPhotoResponse {
    fn from(photo: InspectionPhoto) -> Self {
        Self {
            id: photo.id,
            url: photo.url,
            label: photo.label,
            uploaded_at: photo.uploaded_at,
        }
    }
}

/// Response de la sesión de check-in
#[derive(Debug, Serialize)]
pub struct CheckinSessionResponse {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub booking_code: String,
    pub staff_id: Uuid,
    pub current_step: i32,
    pub status: InspectionStatus,
    pub license_verified: bool,
    pub odometer_km: Option<Decimal>,
    pub battery_percent: Option<i32>,
    pub condition_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub photos: Vec<InspectionPhotoResponse>,
    pub contract: Option<ContractResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CheckinSessionResponse {
    pub fn from_parts(
        session: VehicleInspection,
        booking_code: String,
        photos: Vec<InspectionPhoto>,
        contract: Option<ContractResponse>,
    ) -> Self {
        Self {
            id: session.id,
            booking_id: session.booking_id,
            booking_code,
            staff_id: session.staff_id,
            current_step: session.current_step,
            status: session.status,
            license_verified: session.license_verified,
            odometer_km: session.odometer_km,
            battery_percent: session.battery_percent,
            condition_notes: session.condition_notes,
            rejection_reason: session.rejection_reason,
            photos: photos.into_iter().map(Into::into).collect(),
            contract,
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}
