// ============================================================================
// CSF MODAL VIEW - Subida y vista de la Constancia de Situación Fiscal
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};
use crate::dom::{append_child, on_change, on_click, ElementBuilder};
use crate::services::CSF_FILE_INPUT_ID;
use crate::state::app_state::{AppState, DocumentViewModel};
use crate::state::csf_state::CsfMode;
use crate::utils::PDF_MEDIA_TYPE;

/// Lo que la vista necesita del modal (sin retener el borrow)
struct CsfSnapshot {
    mode: CsfMode,
    id: i64,
    nombre: String,
    has_csf: bool,
    file_name: Option<String>,
    preview_url: Option<String>,
    uploading: bool,
    error: Option<String>,
}

fn snapshot(vm: &DocumentViewModel) -> Option<CsfSnapshot> {
    let modal = vm.modal.borrow();
    if !modal.visible {
        return None;
    }
    let record = modal.record.as_ref()?;
    Some(CsfSnapshot {
        mode: modal.mode,
        id: record.id_proveedor,
        nombre: record.nombre.clone(),
        has_csf: record.has_stored_csf(),
        file_name: modal.selected_file.as_ref().map(|f| f.name()),
        preview_url: modal.preview_url().map(str::to_string),
        uploading: modal.uploading,
        error: modal.error.clone(),
    })
}

pub fn render_csf_modal(state: &AppState) -> Result<Option<Element>, JsValue> {
    let vm = &state.csf;
    let Some(snap) = snapshot(vm) else { return Ok(None) };

    let overlay = ElementBuilder::new("div")?.class("modal-overlay").build();
    let modal = ElementBuilder::new("div")?.class("modal csf-modal").build();

    let header = ElementBuilder::new("div")?.class("modal-header").build();
    let title = ElementBuilder::new("h2")?
        .class("modal-title")
        .text(&format!("CSF - {}", snap.nombre))
        .build();
    append_child(&header, &title)?;
    let close = ElementBuilder::new("button")?.class("btn-close").text("✕").build();
    {
        let vm = vm.clone();
        on_click(&close, move |_| vm.close())?;
    }
    append_child(&header, &close)?;
    append_child(&modal, &header)?;

    // Pestañas: "Ver" solo si ya hay una CSF guardada
    if snap.has_csf {
        let tabs = ElementBuilder::new("div")?.class("csf-tabs").build();
        let view_tab = ElementBuilder::new("button")?
            .class(if snap.mode == CsfMode::View { "csf-tab active" } else { "csf-tab" })
            .text("Ver CSF")
            .build();
        {
            let vm = vm.clone();
            on_click(&view_tab, move |_| vm.switch_to_view())?;
        }
        append_child(&tabs, &view_tab)?;
        let upload_tab = ElementBuilder::new("button")?
            .class(if snap.mode == CsfMode::Upload { "csf-tab active" } else { "csf-tab" })
            .text("Reemplazar CSF")
            .build();
        {
            let vm = vm.clone();
            on_click(&upload_tab, move |_| vm.switch_to_upload())?;
        }
        append_child(&tabs, &upload_tab)?;
        append_child(&modal, &tabs)?;
    }

    let body = match snap.mode {
        CsfMode::Upload => render_upload(vm, &snap)?,
        CsfMode::View => render_view(vm, &snap)?,
    };
    append_child(&modal, &body)?;

    if let Some(error) = &snap.error {
        let banner = ElementBuilder::new("div")?.class("csf-error").text(error).build();
        append_child(&modal, &banner)?;
    }

    append_child(&overlay, &modal)?;
    Ok(Some(overlay))
}

fn render_preview(url: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("iframe")?
        .class("csf-preview")
        .attr("src", url)?
        .attr("title", "Vista previa CSF")?
        .build())
}

fn render_upload(vm: &DocumentViewModel, snap: &CsfSnapshot) -> Result<Element, JsValue> {
    let body = ElementBuilder::new("div")?.class("modal-body csf-upload").build();

    let input = ElementBuilder::new("input")?
        .id(CSF_FILE_INPUT_ID)?
        .attr("type", "file")?
        .attr("accept", PDF_MEDIA_TYPE)?
        .flag("disabled", snap.uploading)?
        .build();
    {
        let vm = vm.clone();
        on_change(&input, move |e| {
            let file = e
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            if let Some(file) = file {
                vm.select_file(file);
            }
        })?;
    }
    append_child(&body, &input)?;

    if let Some(name) = &snap.file_name {
        let selected = ElementBuilder::new("div")?.class("csf-selected").build();
        let label = ElementBuilder::new("span")?.text(&format!("📄 {}", name)).build();
        append_child(&selected, &label)?;
        let remove = ElementBuilder::new("button")?
            .class("btn-link")
            .flag("disabled", snap.uploading)?
            .text("Quitar")
            .build();
        {
            let vm = vm.clone();
            on_click(&remove, move |_| vm.remove_file())?;
        }
        append_child(&selected, &remove)?;
        append_child(&body, &selected)?;
    }

    if let Some(url) = &snap.preview_url {
        append_child(&body, &render_preview(url)?)?;
    }

    let upload = ElementBuilder::new("button")?
        .class("btn btn-primary")
        .flag("disabled", snap.uploading || snap.file_name.is_none())?
        .text(if snap.uploading { "Subiendo..." } else { "Subir CSF" })
        .build();
    {
        let vm = vm.clone();
        on_click(&upload, move |_| {
            let vm = vm.clone();
            AppState::spawn(async move { vm.upload().await });
        })?;
    }
    append_child(&body, &upload)?;

    Ok(body)
}

fn render_view(vm: &DocumentViewModel, snap: &CsfSnapshot) -> Result<Element, JsValue> {
    let body = ElementBuilder::new("div")?.class("modal-body csf-view").build();

    if let Some(url) = &snap.preview_url {
        append_child(&body, &render_preview(url)?)?;
    }

    let actions = ElementBuilder::new("div")?.class("csf-actions").build();
    let id = snap.id;

    let download = ElementBuilder::new("button")?.class("btn btn-secondary").text("⬇️ Descargar").build();
    {
        let vm = vm.clone();
        on_click(&download, move |_| {
            let vm = vm.clone();
            AppState::spawn(async move { vm.download(id).await });
        })?;
    }
    append_child(&actions, &download)?;

    let delete = ElementBuilder::new("button")?.class("btn btn-danger").text("🗑️ Eliminar").build();
    {
        let vm = vm.clone();
        on_click(&delete, move |_| {
            let vm = vm.clone();
            AppState::spawn(async move { vm.delete(id).await });
        })?;
    }
    append_child(&actions, &delete)?;

    append_child(&body, &actions)?;
    Ok(body)
}
