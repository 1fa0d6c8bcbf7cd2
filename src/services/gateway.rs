// ============================================================================
// RECORD GATEWAY - Contrato del backend (acopiadores + CSF)
// ============================================================================
// Los ViewModels dependen del trait, no de gloo-net: los tests usan dobles
// en memoria y el navegador usa ApiClient.
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;
use crate::models::{
    AcopiadoresPage, Acopiador, AcopiadorCoordinates, CreateAcopiadorRequest, UpdateAcopiadorRequest,
};

/// Errores de transporte o del backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    /// `success: false` en el sobre de respuesta
    #[error("{0}")]
    Rejected(String),
}

impl GatewayError {
    /// Mensaje del servidor si lo hay, sin el prefijo técnico
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Http { message, .. } if !message.is_empty() => Some(message),
            GatewayError::Rejected(message) if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    /// Texto para mostrar al usuario tras la etiqueta de contexto
    pub fn user_message(&self) -> String {
        self.server_message()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }
}

/// Filtros que viajan como query params (solo los no-default)
pub type FilterParams = Vec<(&'static str, String)>;

/// Operaciones sobre acopiadores y su CSF
#[async_trait(?Send)]
pub trait RecordGateway {
    /// Archivo local que se sube como CSF (web_sys::File en el navegador)
    type Upload: Clone;

    /// Listar acopiadores paginados
    async fn list(&self, page: u32, limit: u32, filters: &FilterParams) -> Result<AcopiadoresPage, GatewayError>;

    /// Registro vigente en el servidor
    async fn get_by_id(&self, id: i64) -> Result<Acopiador, GatewayError>;

    /// Crear acopiador, devuelve el nuevo idProveedor
    async fn create(&self, request: &CreateAcopiadorRequest) -> Result<i64, GatewayError>;

    /// Actualización parcial
    async fn update(&self, id: i64, request: &UpdateAcopiadorRequest) -> Result<(), GatewayError>;

    async fn delete(&self, id: i64) -> Result<(), GatewayError>;

    /// Coordenadas de todos los acopiadores para el mapa
    async fn map_data(&self) -> Result<Vec<AcopiadorCoordinates>, GatewayError>;

    /// Subir CSF (PDF) a los datos fiscales indicados
    async fn upload_document(&self, fiscal_id: i64, file: &Self::Upload) -> Result<(), GatewayError>;

    async fn download_document(&self, fiscal_id: i64) -> Result<Vec<u8>, GatewayError>;

    async fn delete_document(&self, fiscal_id: i64) -> Result<(), GatewayError>;

    /// URL directa de la CSF (sin round trip)
    fn document_url(&self, fiscal_id: i64) -> String;
}
