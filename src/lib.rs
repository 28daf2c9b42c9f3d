//! Back office de alquiler de vehículos eléctricos por estación.
//!
//! Autenticación JWT, consulta de reservas, flujo de check-in dirigido
//! por pasos y ciclo de vida de contratos.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
