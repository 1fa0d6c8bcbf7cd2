// ============================================================================
// MAP VIEWMODEL - Mapa de acopiadores
// ============================================================================
// Carga las coordenadas, arma los marcadores y los entrega al renderer
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use crate::config::MapConfig;
use crate::maps::{MapError, MapMarker, MapRenderer};
use crate::models::Acopiador;
use crate::services::RecordGateway;
use crate::state::map_state::MapState;
use crate::utils::ValidationError;

/// Id del `<div>` donde se monta el mapa
pub const MAP_CONTAINER_ID: &str = "acopiadores-map";

pub struct MapViewModel<G: RecordGateway, R: MapRenderer> {
    gateway: Rc<G>,
    renderer: Rc<RefCell<R>>,
    config: MapConfig,
    pub state: Rc<RefCell<MapState>>,
    on_change: Rc<dyn Fn()>,
}

impl<G: RecordGateway, R: MapRenderer> Clone for MapViewModel<G, R> {
    fn clone(&self) -> Self {
        Self {
            gateway: Rc::clone(&self.gateway),
            renderer: Rc::clone(&self.renderer),
            config: self.config.clone(),
            state: Rc::clone(&self.state),
            on_change: Rc::clone(&self.on_change),
        }
    }
}

impl<G: RecordGateway, R: MapRenderer> MapViewModel<G, R> {
    pub fn new(gateway: Rc<G>, renderer: R, config: MapConfig, on_change: Rc<dyn Fn()>) -> Self {
        Self {
            gateway,
            renderer: Rc::new(RefCell::new(renderer)),
            config,
            state: Rc::new(RefCell::new(MapState::new())),
            on_change,
        }
    }

    fn notify(&self) {
        (self.on_change)();
    }

    pub fn is_ready(&self) -> bool {
        self.renderer.borrow().is_ready()
    }

    /// Montar el mapa (centro por defecto: Oaxaca)
    pub fn initialize(&self, container_id: &str) -> Result<(), MapError> {
        self.renderer.borrow_mut().initialize(container_id, &self.config)
    }

    /// Cargar todos los acopiadores con coordenadas
    pub async fn load(&self) {
        self.state.borrow_mut().begin_load();
        self.notify();

        let result = self.gateway.map_data().await;
        let has_markers = self.state.borrow_mut().finish_load(result);
        self.render_markers(has_markers);
        self.notify();
    }

    fn render_markers(&self, fit: bool) {
        let markers = self.state.borrow().markers.clone();
        let mut renderer = self.renderer.borrow_mut();
        if !renderer.is_ready() {
            return;
        }
        if let Err(e) = renderer.set_markers(&markers) {
            log::warn!("⚠️ No se pudieron dibujar los marcadores: {}", e);
            return;
        }
        if fit {
            if let Err(e) = renderer.fit_to_markers() {
                log::warn!("⚠️ No se pudo ajustar la vista: {}", e);
            }
        }
    }

    /// Click en un marcador (llamado desde JS)
    pub fn select_marker(&self, id: i64) {
        if self.state.borrow_mut().select_marker(id) {
            log::info!("📍 Acopiador {} seleccionado en el mapa", id);
        }
        self.notify();
    }

    pub fn clear_map(&self) {
        self.state.borrow_mut().clear();
        if let Err(e) = self.renderer.borrow_mut().clear_markers() {
            log::warn!("⚠️ {}", e);
        }
        self.notify();
    }

    /// Sin marcadores no hace nada
    pub fn fit_to_markers(&self) {
        if !self.state.borrow().has_markers() {
            return;
        }
        if let Err(e) = self.renderer.borrow_mut().fit_to_markers() {
            log::warn!("⚠️ {}", e);
        }
    }

    /// "Ver en mapa": solo el marcador del acopiador indicado
    pub fn focus_record(&self, record: &Acopiador) -> Result<(), ValidationError> {
        let marker = self.state.borrow_mut().focus_record(record)?;
        self.render_focused(&marker);
        self.notify();
        Ok(())
    }

    fn render_focused(&self, marker: &MapMarker) {
        let mut renderer = self.renderer.borrow_mut();
        if !renderer.is_ready() {
            return;
        }
        if let Err(e) = renderer
            .set_markers(std::slice::from_ref(marker))
            .and_then(|_| renderer.fit_to_markers())
        {
            log::warn!("⚠️ No se pudo enfocar el acopiador: {}", e);
        }
    }

    /// Redibujar después de montar el mapa (el mapa se monta al abrirse)
    pub fn redraw(&self) {
        let focused = self.state.borrow().focused_record.clone();
        match focused {
            Some(record) => {
                let marker = self.state.borrow_mut().focus_record(&record);
                if let Ok(marker) = marker {
                    self.render_focused(&marker);
                }
            }
            None => {
                let has_markers = self.state.borrow().has_markers();
                self.render_markers(has_markers);
            }
        }
    }

    /// Cerrar el modal y volver a mostrar todos los marcadores
    pub fn close_focus(&self) {
        self.state.borrow_mut().close_focus();
        let has_markers = self.state.borrow().has_markers();
        self.render_markers(has_markers);
        self.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use crate::testing::{acopiador, MockGateway, MockRenderer};

    fn setup() -> (Rc<MockGateway>, MapViewModel<MockGateway, MockRenderer>) {
        let gateway = Rc::new(MockGateway::default());
        *gateway.map_points.borrow_mut() = serde_json::from_str(
            r#"[
                {"idProveedor": 1, "nombre": "Ana", "latitud": 17.0, "longitud": -96.7},
                {"idProveedor": 2, "nombre": "Beto", "latitud": null, "longitud": -96.0}
            ]"#,
        )
        .unwrap();
        let vm = MapViewModel::new(Rc::clone(&gateway), MockRenderer::default(), MapConfig::default(), Rc::new(|| {}));
        (gateway, vm)
    }

    #[test]
    fn load_pushes_only_located_markers_and_fits() {
        let (_, vm) = setup();
        vm.initialize(MAP_CONTAINER_ID).unwrap();
        block_on(vm.load());

        let renderer = vm.renderer.borrow();
        assert_eq!(renderer.markers.len(), 1);
        assert_eq!(renderer.markers[0].id, Some(1));
        assert_eq!(renderer.fits, 1);
    }

    #[test]
    fn fit_without_markers_is_noop() {
        let (gateway, vm) = setup();
        gateway.map_points.borrow_mut().clear();
        vm.initialize(MAP_CONTAINER_ID).unwrap();
        block_on(vm.load());
        vm.fit_to_markers();
        assert_eq!(vm.renderer.borrow().fits, 0);
    }

    #[test]
    fn focus_rejects_record_without_location() {
        let (_, vm) = setup();
        vm.initialize(MAP_CONTAINER_ID).unwrap();
        let record = acopiador(r#"{"idProveedor": 2, "nombre": "Beto", "longitud": -96.0}"#);
        assert_eq!(vm.focus_record(&record), Err(ValidationError::MissingCoordinates));
        assert!(vm.renderer.borrow().markers.is_empty());
    }

    #[test]
    fn redraw_after_late_initialize() {
        let (_, vm) = setup();
        block_on(vm.load());
        assert!(vm.renderer.borrow().markers.is_empty());

        vm.initialize(MAP_CONTAINER_ID).unwrap();
        vm.redraw();
        assert_eq!(vm.renderer.borrow().markers.len(), 1);
    }

    #[test]
    fn redraw_keeps_focused_record() {
        let (_, vm) = setup();
        block_on(vm.load());
        let record = acopiador(r#"{"idProveedor": 7, "nombre": "Carla", "latitud": 16.5, "longitud": -95.1}"#);
        vm.focus_record(&record).unwrap();

        vm.initialize(MAP_CONTAINER_ID).unwrap();
        vm.redraw();
        let renderer = vm.renderer.borrow();
        assert_eq!(renderer.markers.len(), 1);
        assert_eq!(renderer.markers[0].id, Some(7));
    }

    #[test]
    fn select_and_clear() {
        let (_, vm) = setup();
        block_on(vm.load());
        vm.select_marker(1);
        assert_eq!(vm.state.borrow().selected.as_ref().map(|a| a.id_proveedor), Some(1));
        vm.clear_map();
        assert!(vm.state.borrow().selected.is_none());
        assert!(!vm.state.borrow().has_markers());
    }
}
