//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod account;
pub mod booking;
pub mod contract;
pub mod driver_license;
pub mod inspection;
pub mod rental_location;
pub mod renter;
pub mod staff;
pub mod vehicle;
