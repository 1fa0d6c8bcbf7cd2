use crate::config::MapConfig;
use crate::utils::maps_ffi;
use super::{MapError, MapMarker, MapRenderer};

/// Renderizador de mapas para web usando Google Maps JS (vía maps-glue.js)
pub struct WebMapRenderer {
    container_id: Option<String>,
    marker_count: usize,
    is_ready: bool,
}

impl WebMapRenderer {
    pub fn new() -> Self {
        Self {
            container_id: None,
            marker_count: 0,
            is_ready: false,
        }
    }
}

impl Default for WebMapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MapRenderer for WebMapRenderer {
    fn initialize(&mut self, container_id: &str, config: &MapConfig) -> Result<(), MapError> {
        if !maps_ffi::is_google_maps_loaded() {
            log::warn!("⚠️ Google Maps aún no está cargado");
            return Err(MapError::ScriptNotLoaded);
        }

        log::info!(
            "🗺️ Inicializando mapa en #{} ({}, {}) zoom {}",
            container_id, config.default_center_lat, config.default_center_lng, config.default_zoom
        );
        maps_ffi::init_acopiadores_map(
            container_id,
            config.default_center_lat,
            config.default_center_lng,
            config.default_zoom,
        );
        self.container_id = Some(container_id.to_string());
        self.is_ready = true;
        Ok(())
    }

    fn set_markers(&mut self, markers: &[MapMarker]) -> Result<(), MapError> {
        if !self.is_ready {
            return Err(MapError::NotReady);
        }

        let json = serde_json::to_string(markers).map_err(|e| MapError::Unknown(e.to_string()))?;
        maps_ffi::set_acopiadores_markers(&json);
        self.marker_count = markers.len();
        log::info!("📍 {} marcadores en el mapa", markers.len());
        Ok(())
    }

    fn clear_markers(&mut self) -> Result<(), MapError> {
        self.set_markers(&[])?;
        log::info!("🧹 Marcadores limpiados");
        Ok(())
    }

    fn fit_to_markers(&mut self) -> Result<(), MapError> {
        if !self.is_ready {
            return Err(MapError::NotReady);
        }
        if self.marker_count > 0 {
            maps_ffi::fit_acopiadores_bounds();
        }
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.is_ready
    }
}
