//! DTOs de la API
//!
//! Requests, responses y el envelope estándar de la API.

pub mod auth_dto;
pub mod booking_dto;
pub mod checkin_dto;
pub mod common;
pub mod contract_dto;
