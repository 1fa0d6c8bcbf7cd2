// ============================================================================
// PAGINATION VIEW - Navegación entre páginas y tamaño de página
// ============================================================================

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::config::CONFIG;
use crate::dom::{append_child, on_click, ElementBuilder};
use crate::state::app_state::AppState;
use crate::state::list_state::PageState;
use crate::views::filters_bar::render_select;

/// Botones de página alrededor de la actual
const PAGE_WINDOW: u32 = 2;

/// Páginas visibles en la barra (ventana alrededor de la actual)
pub fn visible_pages(page: &PageState) -> Vec<u32> {
    if page.total_pages == 0 {
        return Vec::new();
    }
    let first = page.current_page.saturating_sub(PAGE_WINDOW).max(1);
    let last = (page.current_page + PAGE_WINDOW).min(page.total_pages);
    (first..=last).collect()
}

pub fn render_pagination(state: &AppState) -> Result<Element, JsValue> {
    let list = state.acopiadores.list.borrow().clone();
    let page = list.page;
    let bar = ElementBuilder::new("div")?.class("pagination").build();

    let (first, last) = list.displayed_range();
    let summary = ElementBuilder::new("span")?
        .class("pagination-summary")
        .text(&format!("Mostrando {}-{} de {} acopiadores", first, last, page.total_items))
        .build();
    append_child(&bar, &summary)?;

    let controls = ElementBuilder::new("div")?.class("pagination-controls").build();

    let prev = ElementBuilder::new("button")?
        .class("btn-page")
        .flag("disabled", list.loading || page.current_page <= 1)?
        .text("‹ Anterior")
        .build();
    {
        let vm = state.acopiadores.clone();
        on_click(&prev, move |_| {
            let vm = vm.clone();
            AppState::spawn(async move { vm.previous_page().await });
        })?;
    }
    append_child(&controls, &prev)?;

    for number in visible_pages(&page) {
        let button = ElementBuilder::new("button")?
            .class(if number == page.current_page { "btn-page current" } else { "btn-page" })
            .flag("disabled", list.loading)?
            .text(&number.to_string())
            .build();
        let vm = state.acopiadores.clone();
        on_click(&button, move |_| {
            let vm = vm.clone();
            AppState::spawn(async move { vm.go_to_page(number).await });
        })?;
        append_child(&controls, &button)?;
    }

    let next = ElementBuilder::new("button")?
        .class("btn-page")
        .flag("disabled", list.loading || page.current_page >= page.total_pages)?
        .text("Siguiente ›")
        .build();
    {
        let vm = state.acopiadores.clone();
        on_click(&next, move |_| {
            let vm = vm.clone();
            AppState::spawn(async move { vm.next_page().await });
        })?;
    }
    append_child(&controls, &next)?;
    append_child(&bar, &controls)?;

    // Tamaño de página
    let options: Vec<(String, String)> = CONFIG
        .list_config
        .page_size_options
        .iter()
        .map(|size| (size.to_string(), format!("{} por página", size)))
        .collect();
    let option_refs: Vec<(&str, &str)> = options.iter().map(|(v, l)| (v.as_str(), l.as_str())).collect();
    let vm = state.acopiadores.clone();
    let size_select = render_select(
        "page-size",
        "page-size-select",
        &option_refs,
        &page.page_size.to_string(),
        Rc::new(move |value: String| {
            if let Ok(size) = value.parse::<u32>() {
                let vm = vm.clone();
                AppState::spawn(async move { vm.change_page_size(size).await });
            }
        }),
    )?;
    append_child(&bar, &size_select)?;

    Ok(bar)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(current: u32, total: u32) -> PageState {
        PageState { current_page: current, page_size: 10, total_items: u64::from(total) * 10, total_pages: total }
    }

    #[test]
    fn window_is_clamped_to_bounds() {
        assert_eq!(visible_pages(&page(1, 10)), vec![1, 2, 3]);
        assert_eq!(visible_pages(&page(5, 10)), vec![3, 4, 5, 6, 7]);
        assert_eq!(visible_pages(&page(10, 10)), vec![8, 9, 10]);
    }

    #[test]
    fn no_pages_when_empty() {
        assert!(visible_pages(&page(1, 0)).is_empty());
    }
}
