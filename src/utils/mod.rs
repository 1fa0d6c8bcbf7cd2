// Utils compartidos

pub mod constants;
pub mod validation;
pub mod maps_ffi;

pub use constants::*;
pub use validation::*;
