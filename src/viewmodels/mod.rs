pub mod acopiadores_viewmodel;
pub mod csf_viewmodel;
pub mod map_viewmodel;

pub use acopiadores_viewmodel::AcopiadoresViewModel;
pub use csf_viewmodel::CsfViewModel;
pub use map_viewmodel::{MapViewModel, MAP_CONTAINER_ID};
