//! Controllers de la API
//!
//! Capa entre las rutas y los repositorios/servicios.

pub mod auth_controller;
pub mod booking_controller;
