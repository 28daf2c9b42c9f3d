//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Los
//! servicios encapsulan la máquina de estados del check-in, el ciclo de
//! vida de contratos y la integración con el servicio de imágenes.

pub mod checkin_session_service;
pub mod contract_service;
pub mod photo_storage_service;

pub use checkin_session_service::CheckinSessionService;
pub use contract_service::ContractService;
pub use photo_storage_service::PhotoStorageService;
