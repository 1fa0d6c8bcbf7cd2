// ============================================================================
// GOOGLE MAPS FFI - Foreign Function Interface para JavaScript
// ============================================================================
// Solo wrappers para funciones JS (static/maps-glue.js) - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = initAcopiadoresMap)]
    pub fn init_acopiadores_map(container_id: &str, lat: f64, lng: f64, zoom: f64);

    #[wasm_bindgen(js_name = setAcopiadoresMarkers)]
    pub fn set_acopiadores_markers(markers_json: &str);

    #[wasm_bindgen(js_name = fitAcopiadoresBounds)]
    pub fn fit_acopiadores_bounds();

    #[wasm_bindgen(js_name = isGoogleMapsLoaded)]
    pub fn is_google_maps_loaded() -> bool;
}

/// Helper: inyectar el script de Google Maps si aún no está en la página
pub fn load_google_maps_script(src: &str) {
    if let Some(window) = web_sys::window() {
        let function = js_sys::Function::new_no_args(&format!(
            "if (!document.getElementById('google-maps-script')) {{ \
                const s = document.createElement('script'); \
                s.id = 'google-maps-script'; s.async = true; s.src = '{}'; \
                document.head.appendChild(s); \
            }}",
            src
        ));
        let _ = function.call0(&window.into());
    }
}
