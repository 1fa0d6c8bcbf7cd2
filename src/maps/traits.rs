use serde::Serialize;
use thiserror::Error;
use crate::config::MapConfig;
use crate::models::Coordinates;

/// Posición en el formato que consume el script de mapas
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<Coordinates> for LatLng {
    fn from(c: Coordinates) -> Self {
        Self { lat: c.latitud, lng: c.longitud }
    }
}

/// Marcador del mapa de acopiadores
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub position: LatLng,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

/// Renderizador de mapas (Google Maps en web, dobles en tests)
pub trait MapRenderer {
    /// Crear el mapa dentro del contenedor indicado
    fn initialize(&mut self, container_id: &str, config: &MapConfig) -> Result<(), MapError>;

    /// Reemplazar todos los marcadores
    fn set_markers(&mut self, markers: &[MapMarker]) -> Result<(), MapError>;

    fn clear_markers(&mut self) -> Result<(), MapError>;

    /// Ajustar la vista para mostrar todos los marcadores
    fn fit_to_markers(&mut self) -> Result<(), MapError>;

    fn is_ready(&self) -> bool;
}

/// Error del mapa
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("Map is not ready")]
    NotReady,
    #[error("Google Maps script not loaded")]
    ScriptNotLoaded,
    #[error("Unknown error: {0}")]
    Unknown(String),
}
