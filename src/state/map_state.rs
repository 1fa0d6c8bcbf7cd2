// ============================================================================
// MAP STATE - Marcadores del mapa de acopiadores y selección
// ============================================================================

use crate::maps::{LatLng, MapMarker};
use crate::models::{Acopiador, AcopiadorCoordinates};
use crate::services::gateway::GatewayError;
use crate::utils::ValidationError;

/// Solo los acopiadores con ambas coordenadas llegan al mapa
pub fn build_markers(agents: &[AcopiadorCoordinates]) -> Vec<MapMarker> {
    agents
        .iter()
        .filter_map(|agent| {
            agent.ubicacion.map(|coords| MapMarker {
                position: LatLng::from(coords),
                title: agent.nombre.clone(),
                info: Some(format!("ID: {} - {}", agent.id_proveedor, agent.nombre)),
                id: Some(agent.id_proveedor),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct MapState {
    pub agents: Vec<AcopiadorCoordinates>,
    pub markers: Vec<MapMarker>,
    pub selected: Option<AcopiadorCoordinates>,
    pub loading: bool,
    pub error: Option<String>,
    /// Acopiador abierto en el modal "Ver en mapa"
    pub focused_record: Option<Acopiador>,
}

impl MapState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Aplica la respuesta del backend; devuelve true si hay marcadores
    pub fn finish_load(&mut self, result: Result<Vec<AcopiadorCoordinates>, GatewayError>) -> bool {
        self.loading = false;
        match result {
            Ok(data) => {
                let total = data.len();
                self.agents = data.into_iter().filter(|a| a.ubicacion.is_some()).collect();
                self.markers = build_markers(&self.agents);
                log::info!("🗺️ {} de {} acopiadores con coordenadas", self.agents.len(), total);
            }
            Err(e) => {
                log::error!("❌ Error cargando datos del mapa: {}", e);
                self.error = Some(format!("Error al cargar el mapa: {}", e));
            }
        }
        !self.markers.is_empty()
    }

    /// Click en un marcador
    pub fn select_marker(&mut self, id: i64) -> bool {
        self.selected = self.agents.iter().find(|a| a.id_proveedor == id).cloned();
        self.selected.is_some()
    }

    pub fn clear(&mut self) {
        self.agents.clear();
        self.markers.clear();
        self.selected = None;
    }

    pub fn has_markers(&self) -> bool {
        !self.markers.is_empty()
    }

    /// "Ver en mapa" desde la tabla: requiere coordenadas
    pub fn focus_record(&mut self, record: &Acopiador) -> Result<MapMarker, ValidationError> {
        let agent = AcopiadorCoordinates::from(record);
        let marker = build_markers(std::slice::from_ref(&agent))
            .pop()
            .ok_or(ValidationError::MissingCoordinates)?;
        self.focused_record = Some(record.clone());
        Ok(marker)
    }

    pub fn close_focus(&mut self) {
        self.focused_record = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents() -> Vec<AcopiadorCoordinates> {
        serde_json::from_str(
            r#"[
                {"idProveedor": 1, "nombre": "Ana", "latitud": 17.0, "longitud": -96.7},
                {"idProveedor": 2, "nombre": "Beto", "latitud": 17.2, "longitud": null},
                {"idProveedor": 3, "nombre": "Caro", "latitud": null, "longitud": null},
                {"idProveedor": 4, "nombre": "Dani", "latitud": "16.9", "longitud": "-96.1"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn markers_only_for_complete_locations() {
        let markers = build_markers(&agents());
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].title, "Ana");
        assert_eq!(markers[0].info.as_deref(), Some("ID: 1 - Ana"));
        assert_eq!(markers[1].position, LatLng { lat: 16.9, lng: -96.1 });
    }

    #[test]
    fn selection_only_among_loaded_agents() {
        let mut state = MapState::new();
        state.begin_load();
        assert!(state.finish_load(Ok(agents())));
        assert!(!state.loading);
        assert!(state.select_marker(4));
        assert_eq!(state.selected.as_ref().map(|a| a.nombre.as_str()), Some("Dani"));
        assert!(!state.select_marker(2));
        assert!(state.selected.is_none());
    }

    #[test]
    fn failure_keeps_existing_markers() {
        let mut state = MapState::new();
        state.finish_load(Ok(agents()));
        state.finish_load(Err(GatewayError::Network("offline".into())));
        assert_eq!(state.markers.len(), 2);
        assert!(state.error.is_some());
    }

    #[test]
    fn focus_requires_coordinates() {
        let mut state = MapState::new();
        let without: Acopiador = serde_json::from_str(r#"{"idProveedor": 9, "nombre": "Sin GPS"}"#).unwrap();
        assert_eq!(state.focus_record(&without), Err(ValidationError::MissingCoordinates));
        assert!(state.focused_record.is_none());

        let with: Acopiador =
            serde_json::from_str(r#"{"idProveedor": 9, "nombre": "GPS", "latitud": 17, "longitud": -96}"#).unwrap();
        let marker = state.focus_record(&with).unwrap();
        assert_eq!(marker.id, Some(9));
        assert!(state.focused_record.is_some());
    }
}
