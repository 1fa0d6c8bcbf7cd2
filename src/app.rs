// ============================================================================
// APP - Aplicación principal
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use gloo_timers::callback::Timeout;
use crate::dom::{append_child, get_element_by_id, set_inner_html, toggle_class};
use crate::maps::MapError;
use crate::state::app_state::AppState;
use crate::viewmodels::MAP_CONTAINER_ID;
use crate::views::map_panel::{is_map_visible, MAP_PANEL_ID};
use crate::views::render_app;

/// Reintentos mientras el script de Google Maps termina de cargar
const MAP_INIT_RETRIES: u32 = 20;
const MAP_INIT_RETRY_MS: u32 = 500;

/// Aplicación principal
pub struct App {
    state: AppState,
    root: Option<Element>,
    map_init_attempts: u32,
}

impl App {
    /// Crear nueva aplicación
    pub fn new() -> Result<Self, JsValue> {
        let root = get_element_by_id("app")
            .ok_or_else(|| JsValue::from_str("No #app element found"))?;

        let state = AppState::new();

        // Suscribirse a cambios de estado para re-renderizar automáticamente
        state.subscribe_to_changes(move || {
            // Timeout(0) agrupa varios cambios seguidos en un solo render
            Timeout::new(0, move || {
                crate::rerender_app();
            })
            .forget();
        });

        // Carga inicial de la primera página
        let vm = state.acopiadores.clone();
        AppState::spawn(async move { vm.load().await });

        Ok(Self {
            state,
            root: Some(root),
            map_init_attempts: 0,
        })
    }

    /// Renderizar aplicación
    pub fn render(&mut self) -> Result<(), JsValue> {
        if let Some(root) = &self.root {
            set_inner_html(root, "");
            let app_view = render_app(&self.state)?;
            append_child(root, &app_view)?;
        }
        self.sync_map_panel()
    }

    /// Mostrar/ocultar el panel estático del mapa y montarlo la primera vez
    fn sync_map_panel(&mut self) -> Result<(), JsValue> {
        let visible = is_map_visible(&self.state);
        if let Some(panel) = get_element_by_id(MAP_PANEL_ID) {
            toggle_class(&panel, "hidden", !visible)?;
        }
        if !visible || self.state.map.is_ready() {
            return Ok(());
        }

        match self.state.map.initialize(MAP_CONTAINER_ID) {
            Ok(()) => {
                self.map_init_attempts = 0;
                self.state.map.redraw();
            }
            Err(MapError::ScriptNotLoaded) if self.map_init_attempts < MAP_INIT_RETRIES => {
                self.map_init_attempts += 1;
                Timeout::new(MAP_INIT_RETRY_MS, crate::rerender_app).forget();
            }
            Err(e) => log::error!("❌ No se pudo inicializar el mapa: {}", e),
        }
        Ok(())
    }

    /// Obtener referencia al estado
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
