//! Utilidades de validación
//!
//! Validadores con regex para los documentos que el personal revisa
//! durante el check-in.

use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::errors::AppError;

lazy_static! {
    // Número de licencia de conducir: 12 dígitos
    static ref LICENSE_NUMBER_REGEX: Regex = Regex::new(r"^[0-9]{12}$").unwrap();
}

/// Validar formato de número de licencia de conducir
pub fn validate_license_number(number: &str) -> Result<(), AppError> {
    if !LICENSE_NUMBER_REGEX.is_match(number.trim()) {
        return Err(AppError::BadRequest(
            "El número de licencia debe tener 12 dígitos".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_license_number() {
        assert!(validate_license_number("079123456789").is_ok());
        assert!(validate_license_number(" 079123456789 ").is_ok());
        assert!(validate_license_number("12345").is_err());
        assert!(validate_license_number("07912345678X").is_err());
    }
}
