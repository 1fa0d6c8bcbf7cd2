// ============================================================================
// ACOPIADORES TABLE VIEW - Tabla paginada con edición inline y menú de acciones
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use gloo_timers::callback::Timeout;
use crate::dom::{append_child, event_value, focus_and_select, on_click, on_input, on_keyup, ElementBuilder};
use crate::models::Acopiador;
use crate::state::app_state::AppState;
use crate::state::inline_edit::{EditableField, InlineEditor};

/// Id del input de edición inline para un campo y registro
pub fn inline_input_id(field: EditableField, id: i64) -> String {
    match field {
        EditableField::IdSagarpa => format!("inline-sagarpa-{}", id),
        EditableField::Nombre => format!("inline-nombre-{}", id),
    }
}

/// Texto de la columna de tipo de miel
fn honey_label(tipo_de_miel: i32) -> String {
    format!("Tipo {}", tipo_de_miel)
}

pub fn render_acopiadores_table(state: &AppState) -> Result<Element, JsValue> {
    let list = state.acopiadores.list.borrow().clone();
    let wrapper = ElementBuilder::new("div")?.class("table-wrapper").build();

    if list.loading && list.records.is_empty() {
        let loading = ElementBuilder::new("div")?
            .class("table-loading")
            .text("Cargando acopiadores...")
            .build();
        append_child(&wrapper, &loading)?;
        return Ok(wrapper);
    }

    if list.records.is_empty() {
        let text = if list.has_active_filters() {
            "No hay acopiadores que coincidan con los filtros"
        } else {
            "No hay acopiadores registrados"
        };
        let empty = ElementBuilder::new("div")?.class("table-empty").text(text).build();
        append_child(&wrapper, &empty)?;
        return Ok(wrapper);
    }

    let table = ElementBuilder::new("table")?
        .class(if list.loading { "acopiadores-table loading" } else { "acopiadores-table" })
        .build();

    // Header
    let thead = ElementBuilder::new("thead")?.build();
    let header_row = ElementBuilder::new("tr")?.build();
    for title in ["#", "ID SAGARPA", "Nombre", "RFC", "Miel", "Ubicación", "CSF", "Estado", ""] {
        let th = ElementBuilder::new("th")?.text(title).build();
        append_child(&header_row, &th)?;
    }
    append_child(&thead, &header_row)?;
    append_child(&table, &thead)?;

    let tbody = ElementBuilder::new("tbody")?.build();
    for (index, record) in list.records.iter().enumerate() {
        let row = render_row(state, record, list.row_index(index))?;
        append_child(&tbody, &row)?;
    }
    append_child(&table, &tbody)?;
    append_child(&wrapper, &table)?;

    Ok(wrapper)
}

fn render_row(state: &AppState, record: &Acopiador, number: i64) -> Result<Element, JsValue> {
    let row = ElementBuilder::new("tr")?
        .class(if record.is_active() { "row-active" } else { "row-inactive" })
        .build();

    let index_cell = ElementBuilder::new("td")?.class("cell-index").text(&number.to_string()).build();
    append_child(&row, &index_cell)?;

    append_child(&row, &render_inline_cell(state, record, EditableField::IdSagarpa)?)?;
    append_child(&row, &render_inline_cell(state, record, EditableField::Nombre)?)?;

    let rfc = ElementBuilder::new("td")?
        .class("cell-rfc")
        .text(record.rfc.as_deref().unwrap_or("-"))
        .build();
    append_child(&row, &rfc)?;

    let honey = ElementBuilder::new("td")?.text(&honey_label(record.tipo_de_miel)).build();
    append_child(&row, &honey)?;

    let location = ElementBuilder::new("td")?
        .class(if record.ubicacion.is_some() { "badge badge-ok" } else { "badge badge-missing" })
        .text(if record.ubicacion.is_some() { "📍" } else { "—" })
        .build();
    append_child(&row, &location)?;

    let csf = ElementBuilder::new("td")?
        .class(if record.has_stored_csf() { "badge badge-ok" } else { "badge badge-missing" })
        .text(if record.has_stored_csf() { "📄" } else { "Sin CSF" })
        .build();
    append_child(&row, &csf)?;

    let status = ElementBuilder::new("td")?
        .class(if record.is_active() { "status status-active" } else { "status status-inactive" })
        .text(if record.is_active() { "Activo" } else { "Inactivo" })
        .build();
    append_child(&row, &status)?;

    append_child(&row, &render_actions(state, record)?)?;

    Ok(row)
}

// ============================================================================
// EDICIÓN INLINE
// ============================================================================

fn render_inline_cell(state: &AppState, record: &Acopiador, field: EditableField) -> Result<Element, JsValue> {
    let editor: InlineEditor = state.acopiadores.inline.borrow().editor(field).clone();
    let id = record.id_proveedor;
    let cell = ElementBuilder::new("td")?.class("cell-inline").build();

    if !editor.is_editing(id) {
        let current = field.value_of(record);
        let label = ElementBuilder::new("span")?
            .class(if current.is_empty() { "inline-value empty" } else { "inline-value" })
            .attr("title", "Click para editar")?
            .text(if current.is_empty() { field.placeholder() } else { current })
            .build();
        let vm = state.acopiadores.clone();
        on_click(&label, move |_| {
            vm.start_inline(field, id);
            // El input existe después del re-render
            let input_id = inline_input_id(field, id);
            Timeout::new(10, move || focus_and_select(&input_id)).forget();
        })?;
        append_child(&cell, &label)?;
        return Ok(cell);
    }

    let input = ElementBuilder::new("input")?
        .id(&inline_input_id(field, id))?
        .class("inline-input")
        .attr("type", "text")?
        .attr("value", &editor.buffer)?
        .attr("placeholder", field.placeholder())?
        .flag("disabled", editor.saving)?
        .build();
    {
        let vm = state.acopiadores.clone();
        on_input(&input, move |e| {
            vm.set_inline_buffer(field, event_value(&e).unwrap_or_default());
        })?;
    }
    {
        let vm = state.acopiadores.clone();
        on_keyup(&input, move |e| {
            let key = e.key();
            let vm = vm.clone();
            AppState::spawn(async move { vm.handle_inline_key(field, id, &key).await });
        })?;
    }
    append_child(&cell, &input)?;

    let save = ElementBuilder::new("button")?
        .class("inline-btn inline-save")
        .attr("title", "Guardar")?
        .flag("disabled", editor.saving)?
        .text(if editor.saving { "…" } else { "✓" })
        .build();
    {
        let vm = state.acopiadores.clone();
        on_click(&save, move |_| {
            let vm = vm.clone();
            AppState::spawn(async move { vm.save_inline(field, id).await });
        })?;
    }
    append_child(&cell, &save)?;

    let cancel = ElementBuilder::new("button")?
        .class("inline-btn inline-cancel")
        .attr("title", "Cancelar")?
        .text("✕")
        .build();
    {
        let vm = state.acopiadores.clone();
        on_click(&cancel, move |_| vm.cancel_inline(field))?;
    }
    append_child(&cell, &cancel)?;

    Ok(cell)
}

// ============================================================================
// MENÚ DE ACCIONES
// ============================================================================

fn menu_item(label: &str, class: &str) -> Result<Element, JsValue> {
    Ok(ElementBuilder::new("button")?
        .class(&format!("menu-item {}", class))
        .text(label)
        .build())
}

fn render_actions(state: &AppState, record: &Acopiador) -> Result<Element, JsValue> {
    let id = record.id_proveedor;
    let open = *state.acopiadores.menu_open.borrow() == Some(id);
    let cell = ElementBuilder::new("td")?.class("cell-actions").build();

    let toggle = ElementBuilder::new("button")?
        .class("btn-menu")
        .attr("title", "Acciones")?
        .text("⋮")
        .build();
    {
        let vm = state.acopiadores.clone();
        on_click(&toggle, move |e| {
            // El click global cierra el menú; este lo alterna
            e.stop_propagation();
            vm.toggle_menu(id);
        })?;
    }
    append_child(&cell, &toggle)?;

    if !open {
        return Ok(cell);
    }

    let menu = ElementBuilder::new("div")?.class("actions-menu").build();

    let edit = menu_item("✏️ Editar", "menu-edit")?;
    {
        let vm = state.acopiadores.clone();
        on_click(&edit, move |_| {
            vm.close_menu();
            let vm = vm.clone();
            AppState::spawn(async move { vm.open_edit_form(id).await });
        })?;
    }
    append_child(&menu, &edit)?;

    let csf_label = if record.has_stored_csf() { "📄 Ver CSF" } else { "📤 Subir CSF" };
    let csf = menu_item(csf_label, "menu-csf")?;
    {
        let vm = state.acopiadores.clone();
        let csf_vm = state.csf.clone();
        on_click(&csf, move |_| {
            vm.close_menu();
            csf_vm.open(id);
        })?;
    }
    append_child(&menu, &csf)?;

    if record.has_stored_csf() {
        let download = menu_item("⬇️ Descargar CSF", "menu-download")?;
        {
            let vm = state.acopiadores.clone();
            let csf_vm = state.csf.clone();
            on_click(&download, move |_| {
                vm.close_menu();
                let csf_vm = csf_vm.clone();
                AppState::spawn(async move { csf_vm.download(id).await });
            })?;
        }
        append_child(&menu, &download)?;

        let remove = menu_item("🗑️ Eliminar CSF", "menu-delete-csf")?;
        {
            let vm = state.acopiadores.clone();
            let csf_vm = state.csf.clone();
            on_click(&remove, move |_| {
                vm.close_menu();
                let csf_vm = csf_vm.clone();
                AppState::spawn(async move { csf_vm.delete(id).await });
            })?;
        }
        append_child(&menu, &remove)?;
    }

    let map = menu_item("🗺️ Ver en mapa", "menu-map")?;
    {
        let vm = state.acopiadores.clone();
        let map_vm = state.map.clone();
        let record = record.clone();
        on_click(&map, move |_| {
            vm.close_menu();
            if let Err(e) = map_vm.focus_record(&record) {
                log::warn!("⚠️ {}", e);
                vm.set_error(e.to_string());
            }
        })?;
    }
    append_child(&menu, &map)?;

    let status_label = if record.is_active() { "⏸️ Desactivar" } else { "▶️ Activar" };
    let status = menu_item(status_label, "menu-status")?;
    {
        let vm = state.acopiadores.clone();
        on_click(&status, move |_| {
            vm.close_menu();
            let vm = vm.clone();
            AppState::spawn(async move { vm.toggle_status(id).await });
        })?;
    }
    append_child(&menu, &status)?;

    let delete = menu_item("❌ Eliminar", "menu-delete")?;
    {
        let vm = state.acopiadores.clone();
        on_click(&delete, move |_| {
            vm.close_menu();
            let vm = vm.clone();
            AppState::spawn(async move { vm.delete_acopiador(id).await });
        })?;
    }
    append_child(&menu, &delete)?;

    append_child(&cell, &menu)?;
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_ids_are_unique_per_field() {
        assert_eq!(inline_input_id(EditableField::Nombre, 12), "inline-nombre-12");
        assert_eq!(inline_input_id(EditableField::IdSagarpa, 12), "inline-sagarpa-12");
    }
}
