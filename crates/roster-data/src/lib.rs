// Operations
mod operations;
pub use operations::*;

mod errors;
pub use errors::*;

// Models
mod people;
pub use people::*;

// Backends
mod memory;
pub use memory::*;

pub mod facade;
