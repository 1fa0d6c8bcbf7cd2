// ============================================================================
// BROWSER HOST - Object URLs, descargas y diálogos del navegador
// ============================================================================
// Los ViewModels solo conocen los traits; BrowserHost es la implementación
// web_sys. Los tests usan dobles que cuentan create/revoke.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, HtmlInputElement, Url};
use crate::dom::{append_child, create_element, document, get_element_by_id};

/// Id del `<input type="file">` del modal CSF
pub const CSF_FILE_INPUT_ID: &str = "csf-file-input";

/// Recursos del navegador que usa el flujo de documentos
pub trait DocumentHost {
    type File: Clone;

    /// MIME reportado por el navegador para el archivo
    fn media_type(&self, file: &Self::File) -> String;

    fn file_name(&self, file: &Self::File) -> String;

    /// Crear object URL para un archivo local
    fn file_url(&self, file: &Self::File) -> Result<String, String>;

    /// Crear object URL para bytes descargados
    fn bytes_url(&self, bytes: &[u8], media_type: &str) -> Result<String, String>;

    fn revoke_url(&self, url: &str);

    /// Disparar la descarga de una URL con el nombre indicado
    fn trigger_download(&self, url: &str, file_name: &str) -> Result<(), String>;

    fn clear_file_input(&self);
}

/// Confirmaciones y avisos modales
pub trait Dialogs {
    fn confirm(&self, message: &str) -> bool;
    fn alert(&self, message: &str);
}

/// Implementación sobre web_sys
#[derive(Clone, Default)]
pub struct BrowserHost;

impl BrowserHost {
    pub fn new() -> Self {
        Self
    }
}

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

impl DocumentHost for BrowserHost {
    type File = web_sys::File;

    fn media_type(&self, file: &web_sys::File) -> String {
        file.type_()
    }

    fn file_name(&self, file: &web_sys::File) -> String {
        file.name()
    }

    fn file_url(&self, file: &web_sys::File) -> Result<String, String> {
        Url::create_object_url_with_blob(file).map_err(js_error)
    }

    fn bytes_url(&self, bytes: &[u8], media_type: &str) -> Result<String, String> {
        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(bytes));
        let props = BlobPropertyBag::new();
        props.set_type(media_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props).map_err(js_error)?;
        Url::create_object_url_with_blob(&blob).map_err(js_error)
    }

    fn revoke_url(&self, url: &str) {
        if let Err(e) = Url::revoke_object_url(url) {
            log::warn!("⚠️ No se pudo liberar object URL {}: {:?}", url, e);
        }
    }

    fn trigger_download(&self, url: &str, file_name: &str) -> Result<(), String> {
        let anchor = create_element("a")
            .map_err(js_error)?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| "Element is not an anchor".to_string())?;
        anchor.set_href(url);
        anchor.set_download(file_name);

        let body = document()
            .and_then(|d| d.body())
            .ok_or_else(|| "No document body".to_string())?;
        append_child(&body, &anchor).map_err(js_error)?;
        anchor.click();
        body.remove_child(&anchor).map_err(js_error)?;
        Ok(())
    }

    fn clear_file_input(&self) {
        if let Some(input) = get_element_by_id(CSF_FILE_INPUT_ID)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value("");
        }
    }
}

impl Dialogs for BrowserHost {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Some(w) = web_sys::window() {
            let _ = w.alert_with_message(message);
        }
    }
}
