// ============================================================================
// FORM MODAL VIEW - Wizard de alta/edición (3 pasos)
// ============================================================================
// Los inputs escriben en el borrador sin re-render; solo la navegación entre
// pasos, guardar y cancelar vuelven a pintar.
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement};
use crate::dom::{
    append_child, event_value, get_element_by_id, input_value_by_id, on_click, on_input,
    set_text_content, ElementBuilder,
};
use crate::state::app_state::{AppState, ListViewModel};
use crate::state::form_state::{FormDraft, FormWizard};
use crate::utils::MAX_FORM_STEPS;

const STEP_TITLES: [&str; MAX_FORM_STEPS] = ["Datos generales", "Datos fiscales", "Dirección"];

const RFC_ERROR_ID: &str = "form-rfc-error";
const CURP_ERROR_ID: &str = "form-curp-error";
const LAT_INPUT_ID: &str = "form-latitud";
const LNG_INPUT_ID: &str = "form-longitud";

/// El asterisco marca solo los campos que bloquean el paso
const RFC_LABEL: &str = "RFC *";
const CURP_LABEL: &str = "CURP";

pub fn render_form_modal(state: &AppState) -> Result<Option<Element>, JsValue> {
    let wizard = state.acopiadores.form.borrow().clone();
    if !wizard.visible {
        return Ok(None);
    }
    let vm = &state.acopiadores;

    let overlay = ElementBuilder::new("div")?.class("modal-overlay").build();
    let modal = ElementBuilder::new("div")?.class("modal form-modal").build();

    let title = if wizard.is_editing() { "Editar acopiador" } else { "Nuevo acopiador" };
    let header = ElementBuilder::new("h2")?.class("modal-title").text(title).build();
    append_child(&modal, &header)?;

    append_child(&modal, &render_step_indicator(vm, &wizard)?)?;

    let body = ElementBuilder::new("div")?.class("modal-body").build();
    let step_content = match wizard.step {
        1 => render_identity_step(vm, &wizard.draft)?,
        2 => render_fiscal_step(vm, &wizard)?,
        _ => render_address_step(vm, &wizard.draft)?,
    };
    append_child(&body, &step_content)?;
    append_child(&modal, &body)?;

    if let Some(error) = &wizard.error {
        let banner = ElementBuilder::new("div")?.class("form-error").text(error).build();
        append_child(&modal, &banner)?;
    }

    append_child(&modal, &render_footer(vm, &wizard)?)?;
    append_child(&overlay, &modal)?;
    Ok(Some(overlay))
}

/// Indicadores 1-2-3; cada uno salta directo a su paso
fn render_step_indicator(vm: &ListViewModel, wizard: &FormWizard) -> Result<Element, JsValue> {
    let steps = ElementBuilder::new("div")?.class("form-steps").build();
    for (index, label) in STEP_TITLES.iter().enumerate() {
        let step = index + 1;
        let mut class = String::from("form-step");
        if step == wizard.step {
            class.push_str(" current");
        }
        if wizard.is_step_valid(step) {
            class.push_str(" valid");
        }
        let indicator = ElementBuilder::new("button")?
            .class(&class)
            .text(&format!("{}. {}", step, label))
            .build();
        let vm = vm.clone();
        on_click(&indicator, move |_| vm.go_to_form_step(step))?;
        append_child(&steps, &indicator)?;
    }
    Ok(steps)
}

/// `<label>` + `<input>` cuyo valor va al borrador en cada tecla
fn text_field(
    vm: &ListViewModel,
    label: &str,
    value: &str,
    input_type: &str,
    write: fn(&mut FormWizard, String),
) -> Result<Element, JsValue> {
    let field = ElementBuilder::new("label")?.class("form-field").text(label).build();
    let input = ElementBuilder::new("input")?
        .class("form-input")
        .attr("type", input_type)?
        .attr("value", value)?
        .build();
    let vm = vm.clone();
    on_input(&input, move |e| {
        let value = event_value(&e).unwrap_or_default();
        vm.edit_draft(|form| write(form, value));
    })?;
    append_child(&field, &input)?;
    Ok(field)
}

fn render_identity_step(vm: &ListViewModel, draft: &FormDraft) -> Result<Element, JsValue> {
    let step = ElementBuilder::new("div")?.class("form-step-content").build();
    append_child(&step, &text_field(vm, "Nombre *", &draft.nombre, "text", |f, v| f.draft.nombre = v)?)?;
    append_child(&step, &text_field(vm, "ID SAGARPA", &draft.id_sagarpa, "text", |f, v| f.draft.id_sagarpa = v)?)?;
    let honey = text_field(vm, "Tipo de miel *", &draft.tipo_de_miel, "number", |f, v| f.draft.tipo_de_miel = v)?;
    append_child(&step, &honey)?;
    Ok(step)
}

/// Input en mayúsculas con mensaje de formato al lado
fn upper_field(
    vm: &ListViewModel,
    label: &str,
    value: &str,
    error: Option<String>,
    error_id: &'static str,
    set: fn(&mut FormWizard, &str),
    error_of: fn(&FormWizard) -> Option<String>,
) -> Result<Element, JsValue> {
    let field = ElementBuilder::new("label")?.class("form-field").text(label).build();
    let input = ElementBuilder::new("input")?
        .class("form-input upper")
        .attr("type", "text")?
        .attr("value", value)?
        .build();
    let message = ElementBuilder::new("small")?
        .id(error_id)?
        .class("field-error")
        .text(error.as_deref().unwrap_or(""))
        .build();
    let vm = vm.clone();
    on_input(&input, move |e| {
        let raw = event_value(&e).unwrap_or_default();
        vm.edit_draft(|form| set(form, &raw));
        let form = vm.form.borrow();
        if let Some(input) = e.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
            let upper = raw.to_uppercase();
            if input.value() != upper {
                input.set_value(&upper);
            }
        }
        if let Some(target) = get_element_by_id(error_id) {
            set_text_content(&target, error_of(&form).as_deref().unwrap_or(""));
        }
    })?;
    append_child(&field, &input)?;
    append_child(&field, &message)?;
    Ok(field)
}

fn render_fiscal_step(vm: &ListViewModel, wizard: &FormWizard) -> Result<Element, JsValue> {
    let draft = &wizard.draft;
    let step = ElementBuilder::new("div")?.class("form-step-content").build();
    append_child(
        &step,
        &text_field(vm, "Razón social *", &draft.razon_social, "text", |f, v| f.draft.razon_social = v)?,
    )?;
    append_child(
        &step,
        &upper_field(
            vm,
            RFC_LABEL,
            &draft.rfc,
            wizard.rfc_error().map(|e| e.to_string()),
            RFC_ERROR_ID,
            |f, v| f.set_rfc(v),
            |f| f.rfc_error().map(|e| e.to_string()),
        )?,
    )?;
    append_child(
        &step,
        &upper_field(
            vm,
            CURP_LABEL,
            &draft.curp,
            wizard.curp_error().map(|e| e.to_string()),
            CURP_ERROR_ID,
            |f, v| f.set_curp(v),
            |f| f.curp_error().map(|e| e.to_string()),
        )?,
    )?;
    Ok(step)
}

fn render_address_step(vm: &ListViewModel, draft: &FormDraft) -> Result<Element, JsValue> {
    let step = ElementBuilder::new("div")?.class("form-step-content").build();
    append_child(&step, &text_field(vm, "Dirección *", &draft.direccion, "text", |f, v| f.draft.direccion = v)?)?;

    let coords = ElementBuilder::new("div")?.class("form-coordinates").build();
    let lat = draft.ubicacion.map(|c| c.latitud.to_string()).unwrap_or_default();
    let lng = draft.ubicacion.map(|c| c.longitud.to_string()).unwrap_or_default();
    for (label, id, value) in [("Latitud", LAT_INPUT_ID, lat), ("Longitud", LNG_INPUT_ID, lng)] {
        let field = ElementBuilder::new("label")?.class("form-field").text(label).build();
        let input = ElementBuilder::new("input")?
            .id(id)?
            .class("form-input")
            .attr("type", "number")?
            .attr("step", "any")?
            .attr("value", &value)?
            .build();
        let vm = vm.clone();
        on_input(&input, move |_| {
            let lat = input_value_by_id(LAT_INPUT_ID);
            let lng = input_value_by_id(LNG_INPUT_ID);
            vm.edit_draft(|form| form.draft.set_coordinates_text(&lat, &lng));
        })?;
        append_child(&field, &input)?;
        append_child(&coords, &field)?;
    }
    append_child(&step, &coords)?;
    Ok(step)
}

fn render_footer(vm: &ListViewModel, wizard: &FormWizard) -> Result<Element, JsValue> {
    let footer = ElementBuilder::new("div")?.class("modal-footer").build();

    let cancel = ElementBuilder::new("button")?
        .class("btn btn-secondary")
        .flag("disabled", wizard.saving)?
        .text("Cancelar")
        .build();
    {
        let vm = vm.clone();
        on_click(&cancel, move |_| vm.cancel_form())?;
    }
    append_child(&footer, &cancel)?;

    if wizard.step > 1 {
        let back = ElementBuilder::new("button")?
            .class("btn btn-secondary")
            .flag("disabled", wizard.saving)?
            .text("Anterior")
            .build();
        let vm = vm.clone();
        on_click(&back, move |_| vm.previous_form_step())?;
        append_child(&footer, &back)?;
    }

    if wizard.step < MAX_FORM_STEPS {
        let next = ElementBuilder::new("button")?.class("btn btn-primary").text("Siguiente").build();
        let vm = vm.clone();
        on_click(&next, move |_| vm.next_form_step())?;
        append_child(&footer, &next)?;
    } else {
        let label = match (wizard.saving, wizard.is_editing()) {
            (true, _) => "Guardando...",
            (false, true) => "Actualizar",
            (false, false) => "Guardar",
        };
        let save = ElementBuilder::new("button")?
            .class("btn btn-primary")
            .flag("disabled", wizard.saving)?
            .text(label)
            .build();
        let vm = vm.clone();
        on_click(&save, move |_| {
            let vm = vm.clone();
            AppState::spawn(async move { vm.save_form().await });
        })?;
        append_child(&footer, &save)?;
    }

    Ok(footer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_blocking_fiscal_fields_are_marked_required() {
        let mut wizard = FormWizard::new();
        wizard.open_new();
        wizard.go_to_step(2);
        wizard.draft.razon_social = "Miel del Valle".into();
        wizard.set_rfc("mdv900101ab1");
        assert!(wizard.is_step_valid(2), "CURP vacía no bloquea el paso");
        assert!(!CURP_LABEL.ends_with('*'));

        wizard.set_rfc("");
        assert!(!wizard.is_step_valid(2), "RFC vacío bloquea el paso");
        assert!(RFC_LABEL.ends_with('*'));
    }
}
