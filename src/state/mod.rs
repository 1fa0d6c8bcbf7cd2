// ============================================================================
// STATE MODULE - Estado explícito con transiciones puras
// ============================================================================

pub mod list_state;
pub mod form_state;
pub mod inline_edit;
pub mod csf_state;
pub mod map_state;
pub mod app_state;

pub use app_state::AppState;
