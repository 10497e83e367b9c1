//! Command implementations

mod describe;
mod validate;

pub use describe::describe;
pub use validate::validate;
