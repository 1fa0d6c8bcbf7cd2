// ============================================================================
// APP VIEW - Página de administración de acopiadores
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, on_click, ElementBuilder};
use crate::state::app_state::AppState;
use crate::views::{
    render_acopiadores_table, render_csf_modal, render_filters_bar, render_form_modal,
    render_map_panel, render_pagination,
};
use crate::views::map_panel::{close_map, is_map_visible, open_map};

/// Renderizar la aplicación completa
pub fn render_app(state: &AppState) -> Result<Element, JsValue> {
    let page = ElementBuilder::new("div")?.class("acopiadores-page").build();

    append_child(&page, &render_header(state)?)?;

    if let Some(banner) = render_error_banner(state)? {
        append_child(&page, &banner)?;
    }

    append_child(&page, &render_filters_bar(state)?)?;
    append_child(&page, &render_acopiadores_table(state)?)?;
    append_child(&page, &render_pagination(state)?)?;

    if let Some(toolbar) = render_map_panel(state)? {
        append_child(&page, &toolbar)?;
    }
    if let Some(form) = render_form_modal(state)? {
        append_child(&page, &form)?;
    }
    if let Some(csf) = render_csf_modal(state)? {
        append_child(&page, &csf)?;
    }

    Ok(page)
}

fn render_header(state: &AppState) -> Result<Element, JsValue> {
    let header = ElementBuilder::new("header")?.class("app-header").build();

    let total = state.acopiadores.list.borrow().page.total_items;
    let title = ElementBuilder::new("h1")?.text("Acopiadores").build();
    append_child(&header, &title)?;
    let count = ElementBuilder::new("span")?
        .class("header-count")
        .text(&format!("{} registrados", total))
        .build();
    append_child(&header, &count)?;

    let actions = ElementBuilder::new("div")?.class("header-actions").build();

    let refresh = ElementBuilder::new("button")?
        .class("btn btn-icon")
        .attr("title", "Recargar")?
        .text("🔄")
        .build();
    {
        let vm = state.acopiadores.clone();
        on_click(&refresh, move |_| {
            let vm = vm.clone();
            AppState::spawn(async move { vm.load().await });
        })?;
    }
    append_child(&actions, &refresh)?;

    let map_open = is_map_visible(state);
    let map = ElementBuilder::new("button")?
        .class(if map_open { "btn btn-secondary active" } else { "btn btn-secondary" })
        .text("🗺️ Mapa")
        .build();
    {
        let state = state.clone();
        on_click(&map, move |_| {
            if *state.show_map_panel.borrow() {
                close_map(&state);
            } else {
                open_map(&state);
            }
        })?;
    }
    append_child(&actions, &map)?;

    let new_button = ElementBuilder::new("button")?
        .class("btn btn-primary")
        .text("➕ Nuevo acopiador")
        .build();
    {
        let vm = state.acopiadores.clone();
        on_click(&new_button, move |_| vm.open_new_form())?;
    }
    append_child(&actions, &new_button)?;

    append_child(&header, &actions)?;
    Ok(header)
}

fn render_error_banner(state: &AppState) -> Result<Option<Element>, JsValue> {
    let error = state.acopiadores.list.borrow().error.clone();
    let Some(message) = error else { return Ok(None) };

    let banner = ElementBuilder::new("div")?.class("error-banner").build();
    let text = ElementBuilder::new("span")?.text(&message).build();
    append_child(&banner, &text)?;

    let dismiss = ElementBuilder::new("button")?.class("btn-close").text("✕").build();
    let vm = state.acopiadores.clone();
    on_click(&dismiss, move |_| vm.clear_error())?;
    append_child(&banner, &dismiss)?;

    Ok(Some(banner))
}
