// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio, solo hace requests HTTP contra el backend AUP
// ============================================================================

use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use crate::config::CONFIG;
use crate::models::api::CreatedAcopiador;
use crate::models::{
    AcopiadoresPage, Acopiador, AcopiadorCoordinates, ApiResponse, CreateAcopiadorRequest,
    UpdateAcopiadorRequest,
};
use crate::services::gateway::{FilterParams, GatewayError, RecordGateway};
use crate::utils::CSF_FORM_FIELD;

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    acopiadores_url: String,
    datos_fiscales_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            acopiadores_url: CONFIG.acopiadores_url(),
            datos_fiscales_url: CONFIG.datos_fiscales_url(),
        }
    }

    fn csf_url(&self, fiscal_id: i64) -> String {
        format!("{}/{}/csf", self.datos_fiscales_url, fiscal_id)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn network_error(e: gloo_net::Error) -> GatewayError {
    GatewayError::Network(e.to_string())
}

/// Convierte una respuesta no-2xx en error, recuperando el mensaje del sobre si existe
async fn http_error(response: Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
        .map(|envelope| envelope.failure_message())
        .unwrap_or_else(|_| {
            if body.is_empty() { response.status_text() } else { body }
        });
    GatewayError::Http { status, message }
}

/// Lee el sobre `{success, message, data?, error?}`
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<ApiResponse<T>, GatewayError> {
    if !response.ok() {
        return Err(http_error(response).await);
    }
    let envelope = response
        .json::<ApiResponse<T>>()
        .await
        .map_err(|e| GatewayError::Parse(e.to_string()))?;
    if envelope.success {
        Ok(envelope)
    } else {
        Err(GatewayError::Rejected(envelope.failure_message()))
    }
}

/// Sobre con `data` obligatorio
async fn read_data<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    read_envelope::<T>(response)
        .await?
        .data
        .ok_or_else(|| GatewayError::Parse("Respuesta sin campo data".to_string()))
}

/// Sobre sin datos útiles (ack)
async fn read_ack(response: Response) -> Result<(), GatewayError> {
    read_envelope::<serde_json::Value>(response).await.map(|_| ())
}

#[async_trait(?Send)]
impl RecordGateway for ApiClient {
    type Upload = web_sys::File;

    async fn list(&self, page: u32, limit: u32, filters: &FilterParams) -> Result<AcopiadoresPage, GatewayError> {
        let mut params: Vec<(&str, String)> = vec![("page", page.to_string()), ("limit", limit.to_string())];
        params.extend(filters.iter().map(|(k, v)| (*k, v.clone())));

        log::info!("📋 GET acopiadores page={} limit={} filtros={:?}", page, limit, filters);

        let response = Request::get(&self.acopiadores_url)
            .query(params.iter().map(|(k, v)| (*k, v.as_str())))
            .send()
            .await
            .map_err(network_error)?;

        let data = read_data::<AcopiadoresPage>(response).await?;
        log::info!("✅ {} acopiadores recibidos", data.acopiadores.len());
        Ok(data)
    }

    async fn get_by_id(&self, id: i64) -> Result<Acopiador, GatewayError> {
        log::info!("🔎 GET acopiador {}", id);
        let url = format!("{}/{}", self.acopiadores_url, id);
        let response = Request::get(&url).send().await.map_err(network_error)?;
        read_data::<Acopiador>(response).await
    }

    async fn create(&self, request: &CreateAcopiadorRequest) -> Result<i64, GatewayError> {
        log::info!("🆕 Creando acopiador: {}", request.nombre);
        let response = Request::post(&self.acopiadores_url)
            .json(request)
            .map_err(|e| GatewayError::Parse(format!("Serialization error: {}", e)))?
            .send()
            .await
            .map_err(network_error)?;
        let created = read_data::<CreatedAcopiador>(response).await?;
        log::info!("✅ Acopiador creado con id {}", created.id_proveedor);
        Ok(created.id_proveedor)
    }

    async fn update(&self, id: i64, request: &UpdateAcopiadorRequest) -> Result<(), GatewayError> {
        log::info!("📝 Actualizando acopiador {}", id);
        let url = format!("{}/{}", self.acopiadores_url, id);
        let response = Request::put(&url)
            .json(request)
            .map_err(|e| GatewayError::Parse(format!("Serialization error: {}", e)))?
            .send()
            .await
            .map_err(network_error)?;
        read_ack(response).await
    }

    async fn delete(&self, id: i64) -> Result<(), GatewayError> {
        log::info!("🗑️ Eliminando acopiador {}", id);
        let url = format!("{}/{}", self.acopiadores_url, id);
        let response = Request::delete(&url).send().await.map_err(network_error)?;
        read_ack(response).await
    }

    async fn map_data(&self) -> Result<Vec<AcopiadorCoordinates>, GatewayError> {
        let url = format!("{}/map/all", self.acopiadores_url);
        let response = Request::get(&url).send().await.map_err(network_error)?;
        read_data::<Vec<AcopiadorCoordinates>>(response).await
    }

    async fn upload_document(&self, fiscal_id: i64, file: &web_sys::File) -> Result<(), GatewayError> {
        log::info!("📤 Subiendo CSF '{}' ({} bytes) a datos fiscales {}", file.name(), file.size(), fiscal_id);
        let form = web_sys::FormData::new()
            .map_err(|e| GatewayError::Network(format!("{:?}", e)))?;
        form.append_with_blob(CSF_FORM_FIELD, file)
            .map_err(|e| GatewayError::Network(format!("{:?}", e)))?;

        let response = Request::post(&self.csf_url(fiscal_id))
            .body(form)
            .map_err(network_error)?
            .send()
            .await
            .map_err(network_error)?;
        read_ack(response).await
    }

    async fn download_document(&self, fiscal_id: i64) -> Result<Vec<u8>, GatewayError> {
        let response = Request::get(&self.csf_url(fiscal_id)).send().await.map_err(network_error)?;
        if !response.ok() {
            return Err(http_error(response).await);
        }
        let bytes = response.binary().await.map_err(|e| GatewayError::Parse(e.to_string()))?;
        log::info!("📥 CSF descargada ({} bytes)", bytes.len());
        Ok(bytes)
    }

    async fn delete_document(&self, fiscal_id: i64) -> Result<(), GatewayError> {
        log::info!("🗑️ Eliminando CSF de datos fiscales {}", fiscal_id);
        let response = Request::delete(&self.csf_url(fiscal_id)).send().await.map_err(network_error)?;
        read_ack(response).await
    }

    fn document_url(&self, fiscal_id: i64) -> String {
        self.csf_url(fiscal_id)
    }
}
