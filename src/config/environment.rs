//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub cors_origins: Vec<String>,
    // Servicio de almacenamiento de imágenes (estilo Cloudinary)
    pub image_upload_url: String,
    pub image_upload_preset: Option<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-super-secret-jwt-key-change-in-production".to_string()),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            image_upload_url: env::var("IMAGE_UPLOAD_URL")
                .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1/demo/image/upload".to_string()),
            image_upload_preset: env::var("IMAGE_UPLOAD_PRESET").ok(),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_address() {
        let config = EnvironmentConfig {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_expiration_hours: 24,
            cors_origins: vec!["*".to_string()],
            image_upload_url: "http://localhost/upload".to_string(),
            image_upload_preset: None,
        };

        assert_eq!(config.server_address(), "0.0.0.0:3000");
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
