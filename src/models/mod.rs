pub mod acopiador;
pub mod api;

pub use acopiador::{Acopiador, AcopiadorCoordinates, Coordinates, CreateAcopiadorRequest, UpdateAcopiadorRequest};
pub use api::{AcopiadoresPage, ApiResponse};
