//! Modelo de VehicleInspection
//!
//! Sesión de check-in dirigida por el personal de la estación. La sesión
//! avanza por pasos numerados:
//!
//!   1. Validación del código QR de la reserva (se ejecuta al crear la sesión)
//!   2. Verificación de documentos (licencia de conducir)
//!   3. Captura del estado del vehículo (fotos + lecturas) y generación del contrato
//!   4. Entrega del vehículo (requiere contrato completado)
//!
//! `current_step` es el próximo paso pendiente de ejecutar. Los estados
//! 'approved' y 'rejected' son terminales.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pasos del flujo de check-in
pub const STEP_SCAN: i32 = 1;
pub const STEP_DOCUMENTS: i32 = 2;
pub const STEP_CONDITION: i32 = 3;
pub const STEP_HANDOVER: i32 = 4;

/// Estado de la inspección
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "inspection_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    Pending,
    Approved,
    Rejected,
}

impl InspectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Pending => "pending",
            InspectionStatus::Approved => "approved",
            InspectionStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InspectionStatus::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleInspection {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub staff_id: Uuid,
    pub current_step: i32,
    pub status: InspectionStatus,
    pub license_verified: bool,
    pub odometer_km: Option<Decimal>,
    pub battery_percent: Option<i32>,
    pub condition_notes: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VehicleInspection {
    /// La sesión sigue abierta mientras no alcance un estado terminal
    pub fn is_open(&self) -> bool {
        self.status == InspectionStatus::Pending
    }

    /// Verifica que el paso `step` sea el próximo a ejecutar.
    /// El orden de pasos solo avanza de a uno y nunca retrocede.
    pub fn can_run_step(&self, step: i32) -> bool {
        self.is_open() && self.current_step == step
    }
}

/// Foto del estado del vehículo subida durante el paso 3
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InspectionPhoto {
    pub id: Uuid,
    pub inspection_id: Uuid,
    pub url: String,
    pub label: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inspection(step: i32, status: InspectionStatus) -> VehicleInspection {
        VehicleInspection {
            id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            staff_id: Uuid::new_v4(),
            current_step: step,
            status,
            license_verified: false,
            odometer_km: None,
            battery_percent: None,
            condition_notes: None,
            rejection_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_step_guard_requires_exact_step() {
        let session = inspection(STEP_DOCUMENTS, InspectionStatus::Pending);

        assert!(session.can_run_step(STEP_DOCUMENTS));
        // No se puede saltar al paso 3 ni repetir el paso 1
        assert!(!session.can_run_step(STEP_CONDITION));
        assert!(!session.can_run_step(STEP_SCAN));
        assert!(!session.can_run_step(STEP_HANDOVER));
    }

    #[test]
    fn test_step_guard_rejected_session_is_closed() {
        let rejected = inspection(STEP_CONDITION, InspectionStatus::Rejected);
        assert!(!rejected.is_open());
        assert!(!rejected.can_run_step(STEP_CONDITION));
    }

    #[test]
    fn test_step_guard_approved_session_is_closed() {
        let approved = inspection(STEP_HANDOVER, InspectionStatus::Approved);
        assert!(!approved.can_run_step(STEP_HANDOVER));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!InspectionStatus::Pending.is_terminal());
        assert!(InspectionStatus::Approved.is_terminal());
        assert!(InspectionStatus::Rejected.is_terminal());
    }
}
