// ============================================================================
// MAP PANEL VIEW - Controles sobre el mapa de acopiadores
// ============================================================================
// El contenedor del mapa vive fuera de #app (index.html) para que el re-render
// no destruya la instancia de Google Maps; aquí solo se pintan los controles.
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, on_click, ElementBuilder};
use crate::state::app_state::AppState;

/// Id del panel estático que contiene el mapa
pub const MAP_PANEL_ID: &str = "map-panel";

/// Panel abierto desde el header o enfocado desde "Ver en mapa"
pub fn is_map_visible(state: &AppState) -> bool {
    *state.show_map_panel.borrow() || state.map.state.borrow().focused_record.is_some()
}

/// Abrir el mapa general; carga las coordenadas la primera vez
pub fn open_map(state: &AppState) {
    let needs_load = {
        let map = state.map.state.borrow();
        !map.loading && map.agents.is_empty()
    };
    state.set_show_map_panel(true);
    if needs_load {
        let vm = state.map.clone();
        AppState::spawn(async move { vm.load().await });
    }
}

/// Cerrar el mapa general; la próxima apertura vuelve a pedir las coordenadas
pub fn close_map(state: &AppState) {
    state.map.clear_map();
    state.set_show_map_panel(false);
}

pub fn render_map_panel(state: &AppState) -> Result<Option<Element>, JsValue> {
    if !is_map_visible(state) {
        return Ok(None);
    }
    let map = state.map.state.borrow().clone();
    let toolbar = ElementBuilder::new("div")?.class("map-toolbar").build();

    let title = match &map.focused_record {
        Some(record) => format!("Ubicación de {}", record.nombre),
        None => "Mapa de acopiadores".to_string(),
    };
    let heading = ElementBuilder::new("h3")?.class("map-title").text(&title).build();
    append_child(&toolbar, &heading)?;

    let status_text = if map.loading {
        "Cargando ubicaciones...".to_string()
    } else if let Some(record) = &map.focused_record {
        record
            .ubicacion
            .map(|c| format!("{:.6}, {:.6}", c.latitud, c.longitud))
            .unwrap_or_default()
    } else {
        format!("{} acopiadores con ubicación", map.markers.len())
    };
    let status = ElementBuilder::new("span")?.class("map-status").text(&status_text).build();
    append_child(&toolbar, &status)?;

    if let Some(error) = &map.error {
        let banner = ElementBuilder::new("div")?.class("map-error").text(error).build();
        append_child(&toolbar, &banner)?;
    }

    if let Some(selected) = &map.selected {
        let card = ElementBuilder::new("div")?
            .class("map-selected")
            .text(&format!("ID: {} - {}", selected.id_proveedor, selected.nombre))
            .build();
        append_child(&toolbar, &card)?;
    }

    let actions = ElementBuilder::new("div")?.class("map-actions").build();

    if map.focused_record.is_none() {
        let fit = ElementBuilder::new("button")?
            .class("btn btn-secondary")
            .flag("disabled", map.markers.is_empty())?
            .text("Ajustar vista")
            .build();
        {
            let vm = state.map.clone();
            on_click(&fit, move |_| vm.fit_to_markers())?;
        }
        append_child(&actions, &fit)?;

        let reload = ElementBuilder::new("button")?
            .class("btn btn-secondary")
            .flag("disabled", map.loading)?
            .text("Recargar")
            .build();
        {
            let vm = state.map.clone();
            on_click(&reload, move |_| {
                let vm = vm.clone();
                AppState::spawn(async move { vm.load().await });
            })?;
        }
        append_child(&actions, &reload)?;
    }

    let close = ElementBuilder::new("button")?.class("btn btn-primary").text("Cerrar").build();
    {
        let state = state.clone();
        let focused = map.focused_record.is_some();
        on_click(&close, move |_| {
            if focused {
                state.map.close_focus();
            } else {
                close_map(&state);
            }
        })?;
    }
    append_child(&actions, &close)?;

    append_child(&toolbar, &actions)?;
    Ok(Some(toolbar))
}
