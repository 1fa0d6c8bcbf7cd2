// Módulo de mapas: trait común + implementación web (Google Maps)

pub mod traits;
pub mod web;

pub use traits::{LatLng, MapError, MapMarker, MapRenderer};
pub use web::WebMapRenderer;
