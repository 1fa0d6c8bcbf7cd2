// ============================================================================
// FILTERS BAR VIEW - Búsqueda, selectores y chips de filtros activos
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, event_value, on_change, on_click, ElementBuilder};
use crate::state::app_state::{AppState, ListViewModel};
use crate::state::list_state::{FilterCriteria, FilterKind, MapFilter, SagarpaFilter, StatusFilter};

/// `<select>` con opciones (valor, etiqueta)
pub fn render_select(
    id: &str,
    class: &str,
    options: &[(&str, &str)],
    current: &str,
    on_select: Rc<dyn Fn(String)>,
) -> Result<Element, JsValue> {
    let select = ElementBuilder::new("select")?.id(id)?.class(class).build();
    for (value, label) in options {
        let option = ElementBuilder::new("option")?
            .attr("value", value)?
            .flag("selected", *value == current)?
            .text(label)
            .build();
        append_child(&select, &option)?;
    }
    on_change(&select, move |e| {
        if let Some(value) = event_value(&e) {
            on_select(value);
        }
    })?;
    Ok(select)
}

/// Copia los criterios actuales, aplica `setter` y relanza la consulta
fn criteria_updater(vm: &ListViewModel, setter: fn(&mut FilterCriteria, &str)) -> Rc<dyn Fn(String)> {
    let vm = vm.clone();
    Rc::new(move |value: String| {
        let mut criteria = vm.list.borrow().criteria.clone();
        setter(&mut criteria, &value);
        let vm = vm.clone();
        AppState::spawn(async move { vm.apply_filters(criteria).await });
    })
}

pub fn render_filters_bar(state: &AppState) -> Result<Element, JsValue> {
    let vm = &state.acopiadores;
    let criteria = vm.list.borrow().criteria.clone();

    let bar = ElementBuilder::new("div")?.class("filters-bar").build();
    let row = ElementBuilder::new("div")?.class("filters-row").build();

    // Búsqueda por nombre: se aplica con Enter o al salir del campo
    let search = ElementBuilder::new("input")?
        .id("filter-search")?
        .class("filter-search")
        .attr("type", "search")?
        .attr("placeholder", "Buscar por nombre...")?
        .attr("value", &criteria.search_text)?
        .build();
    let apply_search = criteria_updater(vm, |c, v| c.search_text = v.to_string());
    on_change(&search, move |e| {
        apply_search(event_value(&e).unwrap_or_default());
    })?;
    append_child(&row, &search)?;

    let status = render_select(
        "filter-status",
        "filter-select",
        &[("all", "Todos los estados"), ("active", "Activos"), ("inactive", "Inactivos")],
        criteria.status.as_str(),
        criteria_updater(vm, |c, v| c.status = StatusFilter::parse(v)),
    )?;
    append_child(&row, &status)?;

    let map_status = render_select(
        "filter-map",
        "filter-select",
        &[("all", "Con y sin ubicación"), ("with-map", "Con ubicación"), ("without-map", "Sin ubicación")],
        criteria.map_status.as_str(),
        criteria_updater(vm, |c, v| c.map_status = MapFilter::parse(v)),
    )?;
    append_child(&row, &map_status)?;

    let sagarpa_status = render_select(
        "filter-sagarpa",
        "filter-select",
        &[("all", "Con y sin ID SAGARPA"), ("with-sagarpa", "Con ID SAGARPA"), ("without-sagarpa", "Sin ID SAGARPA")],
        criteria.sagarpa_status.as_str(),
        criteria_updater(vm, |c, v| c.sagarpa_status = SagarpaFilter::parse(v)),
    )?;
    append_child(&row, &sagarpa_status)?;

    append_child(&bar, &row)?;

    if criteria.has_active_filters() {
        append_child(&bar, &render_active_chips(state, &criteria)?)?;
    }

    Ok(bar)
}

/// Etiquetas de los filtros activos, en el orden en que se muestran
fn active_filter_labels(criteria: &FilterCriteria) -> Vec<(FilterKind, String)> {
    let mut active = Vec::new();
    if !criteria.search_text.trim().is_empty() {
        active.push((FilterKind::SearchText, format!("Búsqueda: {}", criteria.search_text.trim())));
    }
    match criteria.status {
        StatusFilter::All => {}
        StatusFilter::Active => active.push((FilterKind::Status, "Activos".to_string())),
        StatusFilter::Inactive => active.push((FilterKind::Status, "Inactivos".to_string())),
    }
    match criteria.map_status {
        MapFilter::All => {}
        MapFilter::WithMap => active.push((FilterKind::MapStatus, "Con ubicación".to_string())),
        MapFilter::WithoutMap => active.push((FilterKind::MapStatus, "Sin ubicación".to_string())),
    }
    match criteria.sagarpa_status {
        SagarpaFilter::All => {}
        SagarpaFilter::WithSagarpa => active.push((FilterKind::SagarpaStatus, "Con ID SAGARPA".to_string())),
        SagarpaFilter::WithoutSagarpa => active.push((FilterKind::SagarpaStatus, "Sin ID SAGARPA".to_string())),
    }
    active
}

fn render_active_chips(state: &AppState, criteria: &FilterCriteria) -> Result<Element, JsValue> {
    let chips = ElementBuilder::new("div")?.class("filter-chips").build();

    for (kind, label) in active_filter_labels(criteria) {
        let chip = ElementBuilder::new("span")?.class("filter-chip").text(&label).build();
        let remove = ElementBuilder::new("button")?
            .class("filter-chip-remove")
            .attr("title", "Quitar filtro")?
            .text("✕")
            .build();
        let vm = state.acopiadores.clone();
        on_click(&remove, move |_| {
            let vm = vm.clone();
            AppState::spawn(async move { vm.remove_filter(kind).await });
        })?;
        append_child(&chip, &remove)?;
        append_child(&chips, &chip)?;
    }

    let clear = ElementBuilder::new("button")?
        .class("btn-clear-filters")
        .text("Limpiar filtros")
        .build();
    let vm = state.acopiadores.clone();
    on_click(&clear, move |_| {
        let vm = vm.clone();
        AppState::spawn(async move { vm.clear_filters().await });
    })?;
    append_child(&chips, &clear)?;

    Ok(chips)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_chips_without_active_filters() {
        assert!(active_filter_labels(&FilterCriteria::default()).is_empty());
    }

    #[test]
    fn chips_follow_filter_order() {
        let criteria = FilterCriteria {
            search_text: "  Juan ".to_string(),
            status: StatusFilter::Inactive,
            map_status: MapFilter::All,
            sagarpa_status: SagarpaFilter::WithSagarpa,
        };
        let labels = active_filter_labels(&criteria);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0], (FilterKind::SearchText, "Búsqueda: Juan".to_string()));
        assert_eq!(labels[1], (FilterKind::Status, "Inactivos".to_string()));
        assert_eq!(labels[2], (FilterKind::SagarpaStatus, "Con ID SAGARPA".to_string()));
    }
}
