//! Servicio de almacenamiento de fotos
//!
//! Proxy hacia el servicio externo de imágenes (API de upload estilo
//! Cloudinary). El backend nunca guarda los bytes, solo la URL resultante.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::AppError;

pub struct PhotoStorageService {
    client: Client,
    upload_url: String,
    upload_preset: Option<String>,
}

impl PhotoStorageService {
    pub fn new(client: Client, config: &EnvironmentConfig) -> Self {
        Self {
            client,
            upload_url: config.image_upload_url.clone(),
            upload_preset: config.image_upload_preset.clone(),
        }
    }

    /// Sube una foto y devuelve la URL segura reportada por el servicio
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String, AppError> {
        debug!("Subiendo foto '{}' ({} bytes)", filename, bytes.len());

        let part = Part::bytes(bytes).file_name(filename.to_string());
        let mut form = Form::new().part("file", part);

        if let Some(preset) = &self.upload_preset {
            form = form.text("upload_preset", preset.clone());
        }

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Error subiendo imagen: {}", e)))?;

        if !response.status().is_success() {
            warn!("Servicio de imágenes respondió {}", response.status());
            return Err(AppError::ExternalApi(format!(
                "Servicio de imágenes respondió {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Respuesta de imagen inválida: {}", e)))?;

        body.get("secure_url")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::ExternalApi("Respuesta de imagen sin secure_url".to_string())
            })
    }
}
