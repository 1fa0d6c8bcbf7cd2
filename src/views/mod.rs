pub mod app;
pub mod filters_bar;
pub mod acopiadores_table;
pub mod pagination;
pub mod form_modal;
pub mod csf_modal;
pub mod map_panel;

pub use app::render_app;
pub use filters_bar::render_filters_bar;
pub use acopiadores_table::render_acopiadores_table;
pub use pagination::render_pagination;
pub use form_modal::render_form_modal;
pub use csf_modal::render_csf_modal;
pub use map_panel::render_map_panel;
