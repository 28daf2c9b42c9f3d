//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula las queries SQL de una entidad.

pub mod account_repository;
pub mod booking_repository;
pub mod contract_repository;
pub mod driver_license_repository;
pub mod inspection_repository;
pub mod vehicle_repository;
