// ============================================================================
// ACOPIADORES ADMIN - FRONTEND MVVM (RUST PURO + WASM)
// ============================================================================
// - Views: Funciones que renderizan DOM (sin lógica)
// - ViewModels: Estado + Lógica UI
// - Services: SOLO comunicación API y recursos del navegador
// - State: Transiciones de estado puras (Rc<RefCell> en los ViewModels)
// - Models: Estructuras compartidas con backend
// ============================================================================

mod config;
mod models;
mod services;
mod state;
mod viewmodels;
mod maps;
mod dom;
mod views;
mod utils;
mod app;

#[cfg(test)]
mod testing;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_logger::Config;
use crate::app::App;
use crate::config::CONFIG;
use crate::utils::maps_ffi::load_google_maps_script;

// Variable estática global para mantener la instancia de App
thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let level = if CONFIG.is_logging_enabled() { log::Level::Info } else { log::Level::Warn };
    wasm_logger::init(Config::new(level));
    log::info!("🚀 Acopiadores Admin - Rust Puro + MVVM ({})", CONFIG.environment);

    if CONFIG.google_maps_api_key.is_empty() {
        log::warn!("⚠️ GOOGLE_MAPS_API_KEY vacía, el mapa no podrá cargarse");
    } else {
        load_google_maps_script(&CONFIG.google_maps_script_url());
    }

    let mut app = App::new()?;
    app.render()?;

    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    // Click fuera del menú de acciones lo cierra. Listener global: se registra UNA vez.
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
            with_state(|state| state.acopiadores.close_menu());
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);
        document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    Ok(())
}

/// Ejecutar algo con el estado global si la app ya está montada
fn with_state<F>(f: F)
where
    F: FnOnce(&state::AppState),
{
    // Clon del estado para no retener el borrow de APP durante el callback
    let state = APP.with(|app_cell| app_cell.borrow().as_ref().map(|app| app.state().clone()));
    match state {
        Some(state) => f(&state),
        None => log::warn!("⚠️ App no está inicializada"),
    }
}

/// Re-render completo de la app
pub fn rerender_app() {
    APP.with(|app_cell| {
        // try_borrow_mut: un render en curso ya refleja el estado más reciente
        match app_cell.try_borrow_mut() {
            Ok(mut app) => {
                if let Some(app) = app.as_mut() {
                    if let Err(e) = app.render() {
                        log::error!("❌ Error re-renderizando: {:?}", e);
                    }
                }
            }
            Err(_) => log::warn!("⚠️ Render en curso, se omite re-render"),
        }
    });
}

/// Click en un marcador del mapa (llamado desde maps-glue.js)
#[wasm_bindgen]
pub fn handle_map_marker_click(id: f64) {
    with_state(|state| state.map.select_marker(id as i64));
}
